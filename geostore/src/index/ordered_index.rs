use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use crate::cell::{CellId, LatLng};
use crate::config::IndexStrategy;
use crate::errors::GeoResult;
use crate::geometry::CellGeometry;
use crate::index::{contract_violation, validate_radius, IndexStats, SpatialIndex};
use crate::store::{CellMultimap, OrderedCellMultimap, OrderedStore};
use crate::IndexValue;

/// Index storing every entry at one level in an ordered store.
///
/// A point costs one entry. A search asks for a disc covering no finer than
/// `storage_level`; covering cells at that level are exact lookups and
/// coarser ones are range scans over their contiguous descendant ids.
pub struct OrderedGeoIndex<V: IndexValue> {
    storage_level: u8,
    geometry: Arc<dyn CellGeometry>,
    store: OrderedStore<V>,
}

impl<V: IndexValue> OrderedGeoIndex<V> {
    /// Creates an empty index storing at `storage_level`.
    ///
    /// # Errors
    /// Returns `InvalidLevel` when `storage_level` is finer than the
    /// geometry supports.
    pub fn new(storage_level: u8, geometry: Arc<dyn CellGeometry>) -> GeoResult<Self> {
        IndexStrategy::Ordered { storage_level }.validate(geometry.max_level())?;
        log::debug!("Created ordered geo index at level {}", storage_level);
        Ok(OrderedGeoIndex {
            storage_level,
            geometry,
            store: OrderedStore::new(),
        })
    }

    pub fn storage_level(&self) -> u8 {
        self.storage_level
    }

    pub fn store(&self) -> &OrderedStore<V> {
        &self.store
    }

    fn storage_cell(&self, lat: f64, lng: f64) -> GeoResult<CellId> {
        let point = LatLng::new(lat, lng)?;
        let leaf = self.geometry.cell_for_point(point);
        self.geometry.ancestor_at_level(leaf, self.storage_level)
    }
}

impl<V: IndexValue> SpatialIndex<V> for OrderedGeoIndex<V> {
    fn add_point(&self, value: V, lat: f64, lng: f64) -> GeoResult<()> {
        let cell = self.storage_cell(lat, lng)?;
        self.store.add(cell, value);
        log::trace!("Added point ({}, {}) at cell {}", lat, lng, cell);
        Ok(())
    }

    fn add_polygon(&self, value: V, ring: &[(f64, f64)]) -> GeoResult<()> {
        let ring = LatLng::ring(ring)?;
        let level = self.storage_level;
        let covering = self.geometry.cover_polygon(&ring, level, level)?;

        let mut cells = Vec::with_capacity(covering.len());
        for cell in covering {
            match cell.level().cmp(&level) {
                Ordering::Equal => cells.push(cell),
                Ordering::Greater => cells.push(self.geometry.ancestor_at_level(cell, level)?),
                Ordering::Less => return Err(contract_violation("polygon", cell, level, level)),
            }
        }

        for cell in &cells {
            self.store.add(*cell, value.clone());
        }
        log::trace!("Added {}-vertex polygon over {} cells", ring.len(), cells.len());
        Ok(())
    }

    fn search(&self, lat: f64, lng: f64, radius_meters: f64) -> GeoResult<HashSet<V>> {
        let center = LatLng::new(lat, lng)?;
        validate_radius(radius_meters)?;
        let level = self.storage_level;
        let covering = self.geometry.cover_disc(center, radius_meters, 0, level)?;

        let mut result = HashSet::new();
        let mut scans = 0;
        for cell in &covering {
            match cell.level().cmp(&level) {
                Ordering::Equal => self.store.collect_into(*cell, &mut result),
                Ordering::Less => {
                    let (first, last) = self.geometry.descendant_range(*cell, level)?;
                    self.store.collect_range_into(first, last, &mut result);
                    scans += 1;
                }
                Ordering::Greater => {
                    let ancestor = self.geometry.ancestor_at_level(*cell, level)?;
                    self.store.collect_into(ancestor, &mut result);
                }
            }
        }

        log::trace!(
            "Searched ({}, {}) r={}m: {} covering cells, {} range scans, {} values",
            lat,
            lng,
            radius_meters,
            covering.len(),
            scans,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::geometry::HilbertGrid;
    use crate::index::test_geometry::FixedCovering;

    fn index(level: u8) -> OrderedGeoIndex<&'static str> {
        OrderedGeoIndex::new(level, Arc::new(HilbertGrid::new())).unwrap()
    }

    #[test]
    fn test_cafe_example() {
        let index = index(12);
        index.add_point("cafe", 52.52, 13.405).unwrap();
        assert_eq!(index.search(52.52, 13.405, 10.0).unwrap(), HashSet::from(["cafe"]));
        assert!(index.search(10.0, 10.0, 10.0).unwrap().is_empty());
    }

    #[test]
    fn test_point_costs_one_entry() {
        let index = index(12);
        index.add_point("a", 1.0, 1.0).unwrap();
        index.add_point("a", 1.0, 1.0).unwrap();
        index.add_point("b", 1.0, 1.0).unwrap();
        assert_eq!(index.stats(), IndexStats { cell_count: 1, entry_count: 2 });
    }

    #[test]
    fn test_large_radius_uses_range_scans() {
        let index = index(14);
        index.add_point("paris", 48.8566, 2.3522).unwrap();
        index.add_point("versailles", 48.8049, 2.1204).unwrap();
        index.add_point("tokyo", 35.6762, 139.6503).unwrap();

        let found = index.search(48.8566, 2.3522, 30_000.0).unwrap();
        assert_eq!(found, HashSet::from(["paris", "versailles"]));
    }

    #[test]
    fn test_level_zero_finds_everything() {
        let index = index(0);
        index.add_point("north", 80.0, 0.0).unwrap();
        index.add_point("south", -80.0, 170.0).unwrap();
        assert_eq!(index.search(0.0, 0.0, 1.0).unwrap().len(), 2);
        assert_eq!(index.stats().cell_count, 1);
    }

    #[test]
    fn test_polygon_is_found_inside() {
        let index = index(12);
        let ring = [(52.40, 13.20), (52.40, 13.60), (52.60, 13.60), (52.60, 13.20)];
        index.add_polygon("berlin", &ring).unwrap();
        assert!(index.stats().entry_count > 1);
        assert!(index.search(52.515, 13.40, 50.0).unwrap().contains("berlin"));
        assert!(index.search(53.5, 13.40, 50.0).unwrap().is_empty());
    }

    #[test]
    fn test_bad_input_changes_nothing() {
        let index = index(12);
        assert_eq!(
            index.add_point("x", 91.0, 0.0).unwrap_err().kind(),
            &ErrorKind::InvalidCoordinate
        );
        let bad_vertex = [(0.0, 0.0), (0.0, 1.0), (1.0, 200.0)];
        assert_eq!(
            index.add_polygon("x", &bad_vertex).unwrap_err().kind(),
            &ErrorKind::InvalidCoordinate
        );
        let bow_tie = [(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)];
        assert_eq!(
            index.add_polygon("x", &bow_tie).unwrap_err().kind(),
            &ErrorKind::InvalidGeometry
        );
        assert_eq!(index.stats(), IndexStats::default());

        assert_eq!(
            index.search(0.0, 0.0, -1.0).unwrap_err().kind(),
            &ErrorKind::InvalidRadius
        );
        assert_eq!(
            index.search(0.0, f64::NAN, 1.0).unwrap_err().kind(),
            &ErrorKind::InvalidCoordinate
        );
    }

    #[test]
    fn test_level_beyond_geometry_is_rejected() {
        let result = OrderedGeoIndex::<u32>::new(31, Arc::new(HilbertGrid::new()));
        assert_eq!(result.err().map(|e| e.kind().clone()), Some(ErrorKind::InvalidLevel));
    }

    #[test]
    fn test_finer_covering_cells_resolve_to_storage_ancestor() {
        let grid = HilbertGrid::new();
        let point = LatLng::new(52.52, 13.405).unwrap();
        let leaf = grid.cell_for_point(point);
        let geometry = FixedCovering {
            grid,
            cells: vec![leaf.parent(20).unwrap()],
        };
        let index = OrderedGeoIndex::new(12, Arc::new(geometry)).unwrap();
        index.add_point("cafe", 52.52, 13.405).unwrap();
        assert_eq!(index.search(0.0, 0.0, 1.0).unwrap(), HashSet::from(["cafe"]));
    }

    #[test]
    fn test_coarser_polygon_cell_is_a_contract_violation() {
        let geometry = FixedCovering {
            grid: HilbertGrid::new(),
            cells: vec![CellId::root()],
        };
        let index = OrderedGeoIndex::new(12, Arc::new(geometry)).unwrap();
        let ring = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)];
        let err = index.add_polygon("x", &ring).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InternalError);
        assert_eq!(index.stats().entry_count, 0);
    }
}
