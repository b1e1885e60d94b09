use std::collections::HashSet;
use std::sync::Arc;

use crate::builder::GeoIndexBuilder;
use crate::config::IndexStrategy;
use crate::errors::GeoResult;
use crate::geometry::{CellGeometry, HilbertGrid};
use crate::index::{FlatGeoIndex, IndexStats, OrderedGeoIndex, SpatialIndex};
use crate::IndexValue;

/// A geospatial index whose strategy is chosen at construction.
///
/// `GeoIndex` is cheap to clone: clones share the same underlying index, so
/// one instance can be handed to many threads.
///
/// # Examples
///
/// ```rust
/// use geostore::{GeoIndex, SpatialIndex};
///
/// let index = GeoIndex::ordered(12).unwrap();
/// index.add_point("cafe", 52.52, 13.405).unwrap();
///
/// let found = index.search(52.52, 13.405, 10.0).unwrap();
/// assert!(found.contains("cafe"));
/// assert!(index.search(10.0, 10.0, 10.0).unwrap().is_empty());
/// ```
pub struct GeoIndex<V: IndexValue> {
    /// The pointer to implementation. Uses Arc for cheap cloning and thread safety.
    inner: Arc<GeoIndexInner<V>>,
}

struct GeoIndexInner<V: IndexValue> {
    strategy: IndexStrategy,
    index: Box<dyn SpatialIndex<V>>,
}

impl<V: IndexValue> Clone for GeoIndex<V> {
    fn clone(&self) -> Self {
        GeoIndex {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: IndexValue> GeoIndex<V> {
    /// Ordered index at `storage_level` over the default [`HilbertGrid`].
    pub fn ordered(storage_level: u8) -> GeoResult<Self> {
        Self::with_geometry(IndexStrategy::Ordered { storage_level }, Arc::new(HilbertGrid::new()))
    }

    /// Flat index over `[min_level, max_level]` on the default [`HilbertGrid`].
    pub fn flat(min_level: u8, max_level: u8) -> GeoResult<Self> {
        Self::with_geometry(
            IndexStrategy::Flat { min_level, max_level },
            Arc::new(HilbertGrid::new()),
        )
    }

    /// Fluent builder for indexes with a custom geometry or covering budget.
    pub fn builder() -> GeoIndexBuilder<V> {
        GeoIndexBuilder::new()
    }

    /// Index for `strategy` over any cell geometry.
    ///
    /// # Errors
    /// Returns `InvalidLevel` when the strategy's levels do not fit the geometry.
    pub fn with_geometry(strategy: IndexStrategy, geometry: Arc<dyn CellGeometry>) -> GeoResult<Self> {
        let index: Box<dyn SpatialIndex<V>> = match strategy {
            IndexStrategy::Ordered { storage_level } => {
                Box::new(OrderedGeoIndex::new(storage_level, geometry)?)
            }
            IndexStrategy::Flat { min_level, max_level } => {
                Box::new(FlatGeoIndex::new(min_level, max_level, geometry)?)
            }
        };
        Ok(GeoIndex {
            inner: Arc::new(GeoIndexInner { strategy, index }),
        })
    }

    pub fn strategy(&self) -> IndexStrategy {
        self.inner.strategy
    }
}

impl<V: IndexValue> SpatialIndex<V> for GeoIndex<V> {
    fn add_point(&self, value: V, lat: f64, lng: f64) -> GeoResult<()> {
        self.inner.index.add_point(value, lat, lng)
    }

    fn add_polygon(&self, value: V, ring: &[(f64, f64)]) -> GeoResult<()> {
        self.inner.index.add_polygon(value, ring)
    }

    fn search(&self, lat: f64, lng: f64, radius_meters: f64) -> GeoResult<HashSet<V>> {
        self.inner.index.search(lat, lng, radius_meters)
    }

    fn stats(&self) -> IndexStats {
        self.inner.index.stats()
    }
}

impl<V: IndexValue> std::fmt::Debug for GeoIndex<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoIndex")
            .field("strategy", &self.inner.strategy)
            .field("stats", &self.stats())
            .finish()
    }
}
