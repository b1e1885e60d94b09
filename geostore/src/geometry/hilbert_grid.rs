use crate::cell::hilbert::{position_to_xy, xy_to_position, GRID_SIZE};
use crate::cell::{CellId, LatLng, MAX_LEVEL};
use crate::errors::GeoResult;
use crate::geometry::coverer::{RegionCoverer, DEFAULT_MAX_CELLS};
use crate::geometry::region::{DiscRegion, LatLngRect, PolygonRegion, Region};
use crate::geometry::CellGeometry;

const LNG_STEP: f64 = 360.0 / GRID_SIZE as f64;
const LAT_STEP: f64 = 180.0 / GRID_SIZE as f64;

/// Hierarchical cells over an equirectangular projection of the globe.
///
/// Longitude and latitude are each split into `2^30` steps. The level-0 cell
/// is the whole globe and every cell has four children, so a level-`k` cell
/// spans `360 / 2^k` degrees of longitude and `180 / 2^k` of latitude. Cells
/// are numbered along a Hilbert curve, which keeps each cell's descendants
/// contiguous and nearby cells close in id order.
///
/// # Examples
///
/// ```rust
/// use geostore::{CellGeometry, HilbertGrid, LatLng};
///
/// let grid = HilbertGrid::new();
/// let point = LatLng::new(52.52, 13.405).unwrap();
/// let cell = grid.ancestor_at_level(grid.cell_for_point(point), 12).unwrap();
/// assert!(grid.cell_bounds(cell).contains_point(point));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HilbertGrid {
    max_cells: usize,
}

impl Default for HilbertGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl HilbertGrid {
    pub fn new() -> Self {
        HilbertGrid {
            max_cells: DEFAULT_MAX_CELLS,
        }
    }

    /// Grid whose coverings stop refining once they would exceed `max_cells`
    /// cells (unless the minimum level requires more).
    pub fn with_max_cells(max_cells: usize) -> Self {
        HilbertGrid {
            max_cells: max_cells.max(1),
        }
    }

    pub fn max_cells(&self) -> usize {
        self.max_cells
    }

    /// Latitude/longitude extent of a cell.
    pub fn cell_bounds(&self, cell: CellId) -> LatLngRect {
        let span_bits = u32::from(MAX_LEVEL - cell.level());
        let size = 1u64 << span_bits;
        let (x, y) = position_to_xy(cell.prefix() << (2 * span_bits));
        let x0 = x & !(size - 1);
        let y0 = y & !(size - 1);

        LatLngRect::new(
            -90.0 + y0 as f64 * LAT_STEP,
            -90.0 + (y0 + size) as f64 * LAT_STEP,
            -180.0 + x0 as f64 * LNG_STEP,
            -180.0 + (x0 + size) as f64 * LNG_STEP,
        )
    }

    /// Covers any region with cells of this grid.
    pub fn cover_region<R: Region + ?Sized>(
        &self,
        region: &R,
        min_level: u8,
        max_level: u8,
    ) -> GeoResult<Vec<CellId>> {
        let coverer = RegionCoverer::new(min_level, max_level, self.max_cells)?;
        Ok(coverer.covering(region, |cell| self.cell_bounds(cell)))
    }
}

fn grid_step(value: f64, origin: f64, step: f64) -> u64 {
    // saturating cast clamps the low end, min() the high end
    (((value - origin) / step).floor() as u64).min(GRID_SIZE - 1)
}

impl CellGeometry for HilbertGrid {
    fn max_level(&self) -> u8 {
        MAX_LEVEL
    }

    fn cell_for_point(&self, point: LatLng) -> CellId {
        let x = grid_step(point.lng(), -180.0, LNG_STEP);
        let y = grid_step(point.lat(), -90.0, LAT_STEP);
        CellId::from_position(xy_to_position(x, y))
    }

    fn cover_polygon(&self, ring: &[LatLng], min_level: u8, max_level: u8) -> GeoResult<Vec<CellId>> {
        let region = PolygonRegion::new(ring)?;
        let covering = self.cover_region(&region, min_level, max_level)?;
        log::trace!(
            "Covered {}-vertex polygon with {} cells in levels [{}, {}]",
            ring.len(),
            covering.len(),
            min_level,
            max_level
        );
        Ok(covering)
    }

    fn cover_disc(
        &self,
        center: LatLng,
        radius_meters: f64,
        min_level: u8,
        max_level: u8,
    ) -> GeoResult<Vec<CellId>> {
        let region = DiscRegion::new(center, radius_meters)?;
        let covering = self.cover_region(&region, min_level, max_level)?;
        log::trace!(
            "Covered disc {} r={}m with {} cells in levels [{}, {}]",
            center,
            radius_meters,
            covering.len(),
            min_level,
            max_level
        );
        Ok(covering)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::geometry::EARTH_RADIUS_METERS;
    use rand::Rng;

    fn ll(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn haversine_meters(a: LatLng, b: LatLng) -> f64 {
        let d_lat = (b.lat() - a.lat()).to_radians();
        let d_lng = (b.lng() - a.lng()).to_radians();
        let h = (d_lat / 2.0).sin().powi(2)
            + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METERS * h.sqrt().asin()
    }

    #[test]
    fn test_root_bounds_are_the_globe() {
        let grid = HilbertGrid::new();
        assert_eq!(grid.cell_bounds(CellId::root()), LatLngRect::full());
    }

    #[test]
    fn test_point_cell_bounds_contain_point_at_every_level() {
        let grid = HilbertGrid::new();
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let point = ll(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0));
            let leaf = grid.cell_for_point(point);
            assert!(leaf.is_valid());
            for level in [0, 1, 5, 12, 20, MAX_LEVEL] {
                let cell = grid.ancestor_at_level(leaf, level).unwrap();
                assert!(grid.cell_bounds(cell).contains_point(point), "{} not in {}", point, cell);
            }
        }
    }

    #[test]
    fn test_extreme_corners_map_to_valid_leaves() {
        let grid = HilbertGrid::new();
        for (lat, lng) in [(90.0, 180.0), (-90.0, -180.0), (90.0, -180.0), (-90.0, 180.0)] {
            let cell = grid.cell_for_point(ll(lat, lng));
            assert!(cell.is_valid());
            assert_eq!(cell.level(), MAX_LEVEL);
        }
    }

    #[test]
    fn test_children_tile_parent() {
        let grid = HilbertGrid::new();
        let parent = grid
            .ancestor_at_level(grid.cell_for_point(ll(48.85, 2.35)), 9)
            .unwrap();
        let bounds = grid.cell_bounds(parent);
        let area: f64 = parent
            .children()
            .iter()
            .map(|child| {
                let b = grid.cell_bounds(*child);
                assert!(bounds.contains(&b));
                (b.lat_hi - b.lat_lo) * (b.lng_hi - b.lng_lo)
            })
            .sum();
        let parent_area = (bounds.lat_hi - bounds.lat_lo) * (bounds.lng_hi - bounds.lng_lo);
        assert!((area - parent_area).abs() < 1e-12);
    }

    #[test]
    fn test_descendant_range_matches_children() {
        let grid = HilbertGrid::new();
        let cell = grid
            .ancestor_at_level(grid.cell_for_point(ll(-33.86, 151.2)), 10)
            .unwrap();
        let (first, last) = grid.descendant_range(cell, 11).unwrap();
        let children = cell.children();
        assert_eq!(first, children[0]);
        assert_eq!(last, children[3]);
        assert!(grid.descendant_range(cell, 9).is_err());
    }

    #[test]
    fn test_disc_covering_contains_every_point_in_disc() {
        let grid = HilbertGrid::new();
        let center = ll(40.7128, -74.0060);
        let radius = 2_500.0;
        let covering = grid.cover_disc(center, radius, 0, 14).unwrap();
        assert!(!covering.is_empty());
        assert!(covering.len() <= DEFAULT_MAX_CELLS);

        let mut rng = rand::thread_rng();
        let mut checked = 0;
        while checked < 500 {
            let point = ll(
                center.lat() + rng.gen_range(-0.03..0.03),
                center.lng() + rng.gen_range(-0.04..0.04),
            );
            if haversine_meters(center, point) > radius {
                continue;
            }
            let leaf = grid.cell_for_point(point);
            assert!(covering.iter().any(|cell| cell.contains(leaf)), "{} escaped covering", point);
            checked += 1;
        }
    }

    #[test]
    fn test_small_disc_covers_own_cell() {
        let grid = HilbertGrid::new();
        let point = ll(52.52, 13.405);
        let own = grid.ancestor_at_level(grid.cell_for_point(point), 12).unwrap();
        let covering = grid.cover_disc(point, 10.0, 0, 12).unwrap();
        assert!(covering.iter().any(|cell| cell.contains(own)));
        assert!(covering.iter().all(|cell| cell.level() <= 12));
    }

    #[test]
    fn test_disc_covering_respects_level_range() {
        let grid = HilbertGrid::new();
        let covering = grid.cover_disc(ll(10.0, 10.0), 50_000.0, 6, 8).unwrap();
        assert!(covering.iter().all(|cell| (6..=8).contains(&cell.level())));

        let err = grid.cover_disc(ll(10.0, 10.0), 10.0, 8, 6).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidLevel);
        assert!(grid.cover_disc(ll(10.0, 10.0), -5.0, 0, 6).is_err());
    }

    #[test]
    fn test_max_cells_bounds_covering_size() {
        let coarse = HilbertGrid::with_max_cells(4);
        let fine = HilbertGrid::with_max_cells(64);
        let center = ll(35.0, 139.0);
        let a = coarse.cover_disc(center, 30_000.0, 0, 16).unwrap();
        let b = fine.cover_disc(center, 30_000.0, 0, 16).unwrap();
        assert!(a.len() <= 4);
        assert!(b.len() <= 64);
        assert_eq!(coarse.max_cells(), 4);
    }

    #[test]
    fn test_polygon_covering_at_single_level() {
        let grid = HilbertGrid::new();
        let ring = [ll(52.50, 13.38), ll(52.50, 13.42), ll(52.53, 13.42), ll(52.53, 13.38)];
        let covering = grid.cover_polygon(&ring, 12, 12).unwrap();
        assert!(!covering.is_empty());
        assert!(covering.iter().all(|cell| cell.level() == 12));

        let inside = grid.ancestor_at_level(grid.cell_for_point(ll(52.515, 13.40)), 12).unwrap();
        assert!(covering.contains(&inside));
        let outside = grid.ancestor_at_level(grid.cell_for_point(ll(53.5, 13.40)), 12).unwrap();
        assert!(!covering.contains(&outside));
    }

    #[test]
    fn test_polygon_covering_rejects_bad_ring() {
        let grid = HilbertGrid::new();
        let err = grid
            .cover_polygon(&[ll(0.0, 0.0), ll(1.0, 1.0)], 10, 10)
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidGeometry);
    }
}
