use std::collections::HashSet;
use std::sync::Arc;

use crate::cell::{CellId, LatLng};
use crate::config::IndexStrategy;
use crate::errors::GeoResult;
use crate::geometry::CellGeometry;
use crate::index::{contract_violation, validate_radius, IndexStats, SpatialIndex};
use crate::store::{CellMultimap, FlatStore};
use crate::IndexValue;

/// Index replicating points across a level range in a hash-keyed store.
///
/// A point is stored under its ancestor at every level of
/// `[min_level, max_level]`, so any search covering within that range finds
/// it by exact lookup. Polygons are stored once per covering cell, without
/// replication.
pub struct FlatGeoIndex<V: IndexValue> {
    min_level: u8,
    max_level: u8,
    geometry: Arc<dyn CellGeometry>,
    store: FlatStore<V>,
}

impl<V: IndexValue> FlatGeoIndex<V> {
    /// Creates an empty index replicating over `[min_level, max_level]`.
    ///
    /// # Errors
    /// Returns `InvalidLevel` for an inverted range or a level finer than
    /// the geometry supports.
    pub fn new(min_level: u8, max_level: u8, geometry: Arc<dyn CellGeometry>) -> GeoResult<Self> {
        IndexStrategy::Flat { min_level, max_level }.validate(geometry.max_level())?;
        log::debug!("Created flat geo index over levels [{}, {}]", min_level, max_level);
        Ok(FlatGeoIndex {
            min_level,
            max_level,
            geometry,
            store: FlatStore::new(),
        })
    }

    pub fn min_level(&self) -> u8 {
        self.min_level
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn store(&self) -> &FlatStore<V> {
        &self.store
    }

    /// Brings a covering cell into `[min_level, max_level]`.
    fn lookup_cell(&self, cell: CellId, what: &str) -> GeoResult<CellId> {
        if cell.level() < self.min_level {
            return Err(contract_violation(what, cell, self.min_level, self.max_level));
        }
        if cell.level() > self.max_level {
            return self.geometry.ancestor_at_level(cell, self.max_level);
        }
        Ok(cell)
    }
}

impl<V: IndexValue> SpatialIndex<V> for FlatGeoIndex<V> {
    fn add_point(&self, value: V, lat: f64, lng: f64) -> GeoResult<()> {
        let point = LatLng::new(lat, lng)?;
        let leaf = self.geometry.cell_for_point(point);
        let cells = (self.min_level..=self.max_level)
            .map(|level| self.geometry.ancestor_at_level(leaf, level))
            .collect::<GeoResult<Vec<_>>>()?;

        for cell in &cells {
            self.store.add(*cell, value.clone());
        }
        log::trace!("Added point {} under {} cells", point, cells.len());
        Ok(())
    }

    fn add_polygon(&self, value: V, ring: &[(f64, f64)]) -> GeoResult<()> {
        let ring = LatLng::ring(ring)?;
        let covering = self
            .geometry
            .cover_polygon(&ring, self.min_level, self.max_level)?;
        let cells = covering
            .into_iter()
            .map(|cell| self.lookup_cell(cell, "polygon"))
            .collect::<GeoResult<Vec<_>>>()?;

        for cell in &cells {
            self.store.add(*cell, value.clone());
        }
        log::trace!("Added {}-vertex polygon over {} cells", ring.len(), cells.len());
        Ok(())
    }

    fn search(&self, lat: f64, lng: f64, radius_meters: f64) -> GeoResult<HashSet<V>> {
        let center = LatLng::new(lat, lng)?;
        validate_radius(radius_meters)?;
        let covering = self
            .geometry
            .cover_disc(center, radius_meters, self.min_level, self.max_level)?;

        let mut result = HashSet::new();
        for cell in &covering {
            let cell = self.lookup_cell(*cell, "search")?;
            self.store.collect_into(cell, &mut result);
        }

        log::trace!(
            "Searched ({}, {}) r={}m: {} lookups, {} values",
            lat,
            lng,
            radius_meters,
            covering.len(),
            result.len()
        );
        Ok(result)
    }

    fn stats(&self) -> IndexStats {
        IndexStats {
            cell_count: self.store.cell_count(),
            entry_count: self.store.entry_count(),
        }
    }
}
