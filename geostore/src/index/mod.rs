//! Geospatial indexes over the cell stores.
//!
//! Two strategies map points and polygons onto cells:
//!
//! - [`OrderedGeoIndex`] stores every entry at one `storage_level` in an
//!   [`OrderedStore`](crate::store::OrderedStore). A search covering cell
//!   coarser than that level becomes a range scan over its descendants.
//! - [`FlatGeoIndex`] replicates every point at each level of
//!   `[min_level, max_level]` in a [`FlatStore`](crate::store::FlatStore), so a
//!   search is a set of exact lookups.
//!
//! Both implement [`SpatialIndex`]; [`GeoIndex`] picks one at construction.
//!
//! Every operation validates its whole input and computes every cell it will
//! touch before the first store mutation, so a failed call changes nothing.

mod flat_index;
mod geo_index;
mod ordered_index;

pub use flat_index::FlatGeoIndex;
pub use geo_index::GeoIndex;
pub use ordered_index::OrderedGeoIndex;

use std::collections::HashSet;

use crate::cell::CellId;
use crate::errors::{ErrorKind, GeoError, GeoResult};
use crate::IndexValue;

/// Capability shared by every index strategy.
pub trait SpatialIndex<V: IndexValue>: Send + Sync {
    /// Registers `value` at a point.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` when the point is out of range.
    fn add_point(&self, value: V, lat: f64, lng: f64) -> GeoResult<()>;

    /// Registers `value` over every cell covering the polygon `ring` of
    /// `(lat, lng)` vertices.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` for an out-of-range vertex and
    /// `InvalidGeometry` for a ring that is not a simple loop. Nothing is
    /// stored on error.
    fn add_polygon(&self, value: V, ring: &[(f64, f64)]) -> GeoResult<()>;

    /// Values whose registered cells might intersect the disc of
    /// `radius_meters` around `(lat, lng)`.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` or `InvalidRadius` for bad input.
    fn search(&self, lat: f64, lng: f64, radius_meters: f64) -> GeoResult<HashSet<V>>;

    /// Storage counters of the underlying store.
    fn stats(&self) -> IndexStats;
}

/// Storage counters of an index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexStats {
    /// Cells holding at least one value.
    pub cell_count: usize,
    /// Distinct (cell, value) pairs.
    pub entry_count: usize,
}

pub(crate) fn validate_radius(radius_meters: f64) -> GeoResult<()> {
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        log::error!("Search radius must be a finite non-negative number, got: {}", radius_meters);
        return Err(GeoError::new(
            &format!("Search radius must be a finite non-negative number, got: {}", radius_meters),
            ErrorKind::InvalidRadius,
        ));
    }
    Ok(())
}

pub(crate) fn contract_violation(what: &str, cell: CellId, min_level: u8, max_level: u8) -> GeoError {
    log::error!(
        "Geometry returned {} cell {} outside levels [{}, {}]",
        what,
        cell,
        min_level,
        max_level
    );
    GeoError::new(
        &format!(
            "Geometry returned {} cell {} outside levels [{}, {}]",
            what, cell, min_level, max_level
        ),
        ErrorKind::InternalError,
    )
}

#[cfg(test)]
pub(crate) mod test_geometry {
    use crate::cell::{CellId, LatLng};
    use crate::errors::GeoResult;
    use crate::geometry::{CellGeometry, HilbertGrid};

    /// Delegates to a [`HilbertGrid`] but answers every covering with a fixed
    /// cell list, to exercise how indexes treat unexpected levels.
    pub struct FixedCovering {
        pub grid: HilbertGrid,
        pub cells: Vec<CellId>,
    }

    impl CellGeometry for FixedCovering {
        fn max_level(&self) -> u8 {
            self.grid.max_level()
        }

        fn cell_for_point(&self, point: LatLng) -> CellId {
            self.grid.cell_for_point(point)
        }

        fn cover_polygon(&self, _: &[LatLng], _: u8, _: u8) -> GeoResult<Vec<CellId>> {
            Ok(self.cells.clone())
        }

        fn cover_disc(&self, _: LatLng, _: f64, _: u8, _: u8) -> GeoResult<Vec<CellId>> {
            Ok(self.cells.clone())
        }
    }
}
