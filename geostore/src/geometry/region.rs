//! Regions the coverer can refine cells against.

use std::f64::consts::PI;

use geo::{Area, BoundingRect, Contains, Intersects, Line, LineString, Polygon, Rect};
use smallvec::{smallvec, SmallVec};

use crate::cell::LatLng;
use crate::errors::{ErrorKind, GeoError, GeoResult};

/// Mean earth radius used to turn metres into angles.
pub const EARTH_RADIUS_METERS: f64 = 6_371_010.0;

/// Slack added around disc bounds so points on a cell edge are never lost to rounding.
const BOUNDARY_PADDING_DEGREES: f64 = 1e-9;

/// A closed latitude/longitude rectangle, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngRect {
    pub lat_lo: f64,
    pub lat_hi: f64,
    pub lng_lo: f64,
    pub lng_hi: f64,
}

impl LatLngRect {
    pub fn new(lat_lo: f64, lat_hi: f64, lng_lo: f64, lng_hi: f64) -> Self {
        LatLngRect {
            lat_lo,
            lat_hi,
            lng_lo,
            lng_hi,
        }
    }

    /// The whole globe.
    pub fn full() -> Self {
        LatLngRect::new(-90.0, 90.0, -180.0, 180.0)
    }

    pub fn intersects(&self, other: &LatLngRect) -> bool {
        self.lat_lo <= other.lat_hi
            && other.lat_lo <= self.lat_hi
            && self.lng_lo <= other.lng_hi
            && other.lng_lo <= self.lng_hi
    }

    pub fn contains(&self, other: &LatLngRect) -> bool {
        self.lat_lo <= other.lat_lo
            && other.lat_hi <= self.lat_hi
            && self.lng_lo <= other.lng_lo
            && other.lng_hi <= self.lng_hi
    }

    pub fn contains_point(&self, point: LatLng) -> bool {
        (self.lat_lo..=self.lat_hi).contains(&point.lat())
            && (self.lng_lo..=self.lng_hi).contains(&point.lng())
    }

    pub(crate) fn to_geo_rect(self) -> Rect<f64> {
        Rect::new(
            geo::Coord {
                x: self.lng_lo,
                y: self.lat_lo,
            },
            geo::Coord {
                x: self.lng_hi,
                y: self.lat_hi,
            },
        )
    }
}

/// Something a [`RegionCoverer`](crate::geometry::RegionCoverer) can cover.
pub trait Region {
    /// Whether the region might overlap a cell with these bounds.
    fn intersects_cell(&self, bounds: &LatLngRect) -> bool;

    /// Whether the region fully contains a cell with these bounds.
    fn contains_cell(&self, bounds: &LatLngRect) -> bool;
}

/// A spherical cap: every point within `radius_meters` of `center` along the
/// great circle.
///
/// Cells are tested by their great-circle distance to the center. The cap's
/// bounding rectangles are kept as a prefilter. Their latitude extent is
/// exact and their longitude extent uses the cap's widest point; a cap
/// reaching a pole spans every longitude, and a cap crossing the antimeridian
/// is split in two rectangles.
#[derive(Debug, Clone)]
pub struct DiscRegion {
    center: LatLng,
    radius_meters: f64,
    angle: f64,
    rects: SmallVec<[LatLngRect; 2]>,
}

impl DiscRegion {
    /// # Errors
    /// Returns `InvalidRadius` when `radius_meters` is negative, NaN or infinite.
    pub fn new(center: LatLng, radius_meters: f64) -> GeoResult<Self> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            log::error!("Search radius must be a finite non-negative number, got: {}", radius_meters);
            return Err(GeoError::new(
                &format!("Search radius must be a finite non-negative number, got: {}", radius_meters),
                ErrorKind::InvalidRadius,
            ));
        }

        let angle = radius_meters / EARTH_RADIUS_METERS;
        let lat_lo = center.lat() - angle.to_degrees() - BOUNDARY_PADDING_DEGREES;
        let lat_hi = center.lat() + angle.to_degrees() + BOUNDARY_PADDING_DEGREES;

        let rects = if lat_lo <= -90.0 || lat_hi >= 90.0 {
            smallvec![LatLngRect::new(lat_lo.max(-90.0), lat_hi.min(90.0), -180.0, 180.0)]
        } else {
            let ratio = angle.sin() / center.lat().to_radians().cos();
            let half_width = if ratio >= 1.0 {
                180.0
            } else {
                ratio.asin().to_degrees() + BOUNDARY_PADDING_DEGREES
            };
            longitude_spans(center.lng(), half_width)
                .into_iter()
                .map(|(lng_lo, lng_hi)| LatLngRect::new(lat_lo, lat_hi, lng_lo, lng_hi))
                .collect()
        };

        Ok(DiscRegion {
            center,
            radius_meters,
            angle,
            rects,
        })
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    pub fn rects(&self) -> &[LatLngRect] {
        &self.rects
    }
}

fn longitude_spans(lng: f64, half_width: f64) -> SmallVec<[(f64, f64); 2]> {
    if half_width >= 180.0 {
        return smallvec![(-180.0, 180.0)];
    }
    let lo = lng - half_width;
    let hi = lng + half_width;
    if lo < -180.0 {
        smallvec![(lo + 360.0, 180.0), (-180.0, hi)]
    } else if hi > 180.0 {
        smallvec![(lo, 180.0), (-180.0, hi - 360.0)]
    } else {
        smallvec![(lo, hi)]
    }
}

impl Region for DiscRegion {
    fn intersects_cell(&self, bounds: &LatLngRect) -> bool {
        self.rects.iter().any(|rect| rect.intersects(bounds))
            && angle_to_rect(self.center.lat(), self.center.lng(), bounds)
                <= self.angle + BOUNDARY_PADDING_DEGREES.to_radians()
    }

    fn contains_cell(&self, bounds: &LatLngRect) -> bool {
        if !self.rects.iter().any(|rect| rect.contains(bounds)) {
            return false;
        }
        // the point of the cell farthest from the center is the one nearest its antipode
        let antipode_lng = if self.center.lng() <= 0.0 {
            self.center.lng() + 180.0
        } else {
            self.center.lng() - 180.0
        };
        PI - angle_to_rect(-self.center.lat(), antipode_lng, bounds) <= self.angle
    }
}

/// Central angle in radians between two points given in degrees.
fn central_angle(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (delta_lng / 2.0).sin().powi(2);
    2.0 * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Smallest central angle in radians between a point and any point of `rect`.
///
/// Inside the rectangle's longitude span the nearest point shares the
/// point's meridian. Outside it the nearest point lies on one of the two
/// meridian edges, either at a corner or at the foot of the perpendicular
/// great circle.
fn angle_to_rect(lat: f64, lng: f64, rect: &LatLngRect) -> f64 {
    if (rect.lng_lo..=rect.lng_hi).contains(&lng) {
        return (lat - lat.clamp(rect.lat_lo, rect.lat_hi)).abs().to_radians();
    }

    let mut nearest = f64::MAX;
    for edge_lng in [rect.lng_lo, rect.lng_hi] {
        nearest = nearest
            .min(central_angle(lat, lng, rect.lat_lo, edge_lng))
            .min(central_angle(lat, lng, rect.lat_hi, edge_lng));

        let delta_lng = (edge_lng - lng).to_radians();
        let foot_lat = lat
            .to_radians()
            .sin()
            .atan2(lat.to_radians().cos() * delta_lng.cos())
            .to_degrees();
        if (rect.lat_lo..=rect.lat_hi).contains(&foot_lat) {
            nearest = nearest.min(central_angle(lat, lng, foot_lat, edge_lng));
        }
    }
    nearest
}

/// A simple polygon given by one ring of vertices.
///
/// The ring is treated as a planar loop in latitude/longitude space; it may be
/// open or closed and in either orientation.
#[derive(Debug, Clone)]
pub struct PolygonRegion {
    polygon: Polygon<f64>,
    bounds: LatLngRect,
}

impl PolygonRegion {
    /// # Errors
    /// Returns `InvalidGeometry` when the ring has fewer than 3 distinct
    /// vertices, encloses no area, or crosses itself.
    pub fn new(ring: &[LatLng]) -> GeoResult<Self> {
        let mut vertices: Vec<LatLng> = Vec::with_capacity(ring.len());
        for vertex in ring {
            if vertices.last() != Some(vertex) {
                vertices.push(*vertex);
            }
        }
        while vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }

        if vertices.len() < 3 {
            return Err(invalid_ring(&format!(
                "Polygon ring needs at least 3 distinct vertices, got {}",
                vertices.len()
            )));
        }

        let exterior: LineString<f64> = vertices.iter().map(|v| v.to_coord()).collect();
        let polygon = Polygon::new(exterior, vec![]);

        if polygon.unsigned_area() <= 0.0 {
            return Err(invalid_ring("Polygon ring encloses no area"));
        }
        if !is_simple_loop(&vertices) {
            return Err(invalid_ring("Polygon ring intersects itself"));
        }

        let bounds = match polygon.bounding_rect() {
            Some(rect) => LatLngRect::new(rect.min().y, rect.max().y, rect.min().x, rect.max().x),
            None => return Err(invalid_ring("Polygon ring has no bounds")),
        };

        Ok(PolygonRegion { polygon, bounds })
    }

    pub fn bounds(&self) -> LatLngRect {
        self.bounds
    }
}

fn invalid_ring(message: &str) -> GeoError {
    log::error!("{}", message);
    GeoError::new(message, ErrorKind::InvalidGeometry)
}

/// Checks that no two non-adjacent edges of the closed ring touch.
fn is_simple_loop(vertices: &[LatLng]) -> bool {
    let n = vertices.len();
    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| Line::new(vertices[i].to_coord(), vertices[(i + 1) % n].to_coord()))
        .collect();

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }
    true
}

impl Region for PolygonRegion {
    fn intersects_cell(&self, bounds: &LatLngRect) -> bool {
        self.bounds.intersects(bounds) && self.polygon.intersects(&bounds.to_geo_rect())
    }

    fn contains_cell(&self, bounds: &LatLngRect) -> bool {
        self.bounds.contains(bounds) && self.polygon.contains(&bounds.to_geo_rect().to_polygon())
    }
}
