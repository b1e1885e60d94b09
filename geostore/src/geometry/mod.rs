//! Geometry collaborator: coordinate to cell conversion and region coverings.
//!
//! The indexes never do geodesy themselves. They ask a [`CellGeometry`] for
//! the cell of a point, for ancestors and descendant ranges, and for the cell
//! sets covering a polygon or a query disc. [`HilbertGrid`] is the bundled
//! implementation; any other hierarchical cell system with the contiguous
//! descendant property can be plugged in.

mod coverer;
mod hilbert_grid;
mod region;

pub use coverer::{normalize_cells, RegionCoverer, DEFAULT_MAX_CELLS};
pub use hilbert_grid::HilbertGrid;
pub use region::{DiscRegion, LatLngRect, PolygonRegion, Region, EARTH_RADIUS_METERS};

use crate::cell::{CellId, LatLng};
use crate::errors::GeoResult;

/// Contract between the indexes and the cell system they store into.
///
/// Coverings are conservative: a covering cell means "might intersect", never
/// exact containment.
pub trait CellGeometry: Send + Sync {
    /// Finest level this geometry produces.
    fn max_level(&self) -> u8;

    /// Finest-resolution cell containing `point`.
    fn cell_for_point(&self, point: LatLng) -> CellId;

    /// Ancestor of `cell` at `level`.
    ///
    /// # Errors
    /// Fails with `InvalidLevel` when `level` is finer than `cell`.
    fn ancestor_at_level(&self, cell: CellId, level: u8) -> GeoResult<CellId> {
        cell.parent(level)
    }

    /// Inclusive id bounds of all level-`level` descendants of `cell`.
    ///
    /// # Errors
    /// Fails with `InvalidLevel` when `level` is coarser than `cell`.
    fn descendant_range(&self, cell: CellId, level: u8) -> GeoResult<(CellId, CellId)> {
        Ok((cell.child_begin(level)?, cell.child_last(level)?))
    }

    /// Minimal cell set, each level within `[min_level, max_level]`, whose union
    /// contains the polygon described by `ring`.
    ///
    /// # Errors
    /// Fails with `InvalidGeometry` for rings that are not simple loops and with
    /// `InvalidLevel` for an invalid level range.
    fn cover_polygon(&self, ring: &[LatLng], min_level: u8, max_level: u8) -> GeoResult<Vec<CellId>>;

    /// Minimal cell set, each level within `[min_level, max_level]`, whose union
    /// contains the disc of `radius_meters` around `center`.
    ///
    /// # Errors
    /// Fails with `InvalidRadius` for negative or non-finite radii and with
    /// `InvalidLevel` for an invalid level range.
    fn cover_disc(
        &self,
        center: LatLng,
        radius_meters: f64,
        min_level: u8,
        max_level: u8,
    ) -> GeoResult<Vec<CellId>>;
}
