use std::marker::PhantomData;
use std::sync::Arc;

use crate::config::IndexStrategy;
use crate::errors::{ErrorKind, GeoError, GeoResult};
use crate::geometry::{CellGeometry, HilbertGrid};
use crate::index::GeoIndex;
use crate::IndexValue;

/// Builder for creating and configuring a [`GeoIndex`].
///
/// `GeoIndexBuilder` provides a fluent API for choosing the strategy and the
/// cell geometry before the index is created. It captures the first
/// configuration error and returns it from [`build`](Self::build).
///
/// # Examples
///
/// ```rust
/// use geostore::{GeoIndex, SpatialIndex};
///
/// let index = GeoIndex::builder()
///     .flat(10, 12)
///     .max_cells(16)
///     .build()
///     .unwrap();
/// index.add_point("cafe", 52.52, 13.405).unwrap();
///
/// // errors surface at build time
/// assert!(GeoIndex::<&str>::builder().max_cells(0).ordered(12).build().is_err());
/// ```
pub struct GeoIndexBuilder<V: IndexValue> {
    error: Option<GeoError>,
    strategy: Option<IndexStrategy>,
    geometry: Option<Arc<dyn CellGeometry>>,
    max_cells: Option<usize>,
    _values: PhantomData<fn() -> V>,
}

impl<V: IndexValue> Default for GeoIndexBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: IndexValue> GeoIndexBuilder<V> {
    pub fn new() -> Self {
        GeoIndexBuilder {
            error: None,
            strategy: None,
            geometry: None,
            max_cells: None,
            _values: PhantomData,
        }
    }

    /// Stores every entry at `storage_level` and answers coarse search cells
    /// with range scans.
    pub fn ordered(self, storage_level: u8) -> Self {
        self.strategy(IndexStrategy::Ordered { storage_level })
    }

    /// Replicates every point over `[min_level, max_level]` and answers
    /// searches with exact lookups only.
    pub fn flat(self, min_level: u8, max_level: u8) -> Self {
        self.strategy(IndexStrategy::Flat { min_level, max_level })
    }

    /// Sets the strategy. Choosing a strategy twice is a configuration error.
    pub fn strategy(mut self, strategy: IndexStrategy) -> Self {
        if self.error.is_none() {
            match self.strategy {
                Some(existing) => {
                    self.error = Some(configuration_error(&format!(
                        "Index strategy already set to {}, cannot change it to {}",
                        existing, strategy
                    )));
                }
                None => self.strategy = Some(strategy),
            }
        }
        self
    }

    /// Uses a custom cell geometry instead of the bundled [`HilbertGrid`].
    pub fn geometry<G: CellGeometry + 'static>(mut self, geometry: G) -> Self {
        if self.error.is_none() {
            if self.max_cells.is_some() {
                self.error = Some(configuration_error(
                    "max_cells only applies to the bundled grid, not to a custom geometry",
                ));
            } else {
                self.geometry = Some(Arc::new(geometry));
            }
        }
        self
    }

    /// Caps the number of cells in a covering of the bundled grid.
    pub fn max_cells(mut self, max_cells: usize) -> Self {
        if self.error.is_none() {
            if max_cells == 0 {
                self.error = Some(configuration_error("max_cells must be at least 1"));
            } else if self.geometry.is_some() {
                self.error = Some(configuration_error(
                    "max_cells only applies to the bundled grid, not to a custom geometry",
                ));
            } else {
                self.max_cells = Some(max_cells);
            }
        }
        self
    }

    /// Creates the index.
    ///
    /// # Errors
    /// Returns the first error captured while configuring, then
    /// `InvalidConfiguration` when no strategy was chosen, then any level
    /// error from validating the strategy against the geometry.
    pub fn build(self) -> GeoResult<GeoIndex<V>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let strategy = self
            .strategy
            .ok_or_else(|| configuration_error("No index strategy chosen, call ordered() or flat()"))?;
        let geometry: Arc<dyn CellGeometry> = match (self.geometry, self.max_cells) {
            (Some(geometry), _) => geometry,
            (None, Some(max_cells)) => Arc::new(HilbertGrid::with_max_cells(max_cells)),
            (None, None) => Arc::new(HilbertGrid::new()),
        };
        GeoIndex::with_geometry(strategy, geometry)
    }
}

fn configuration_error(message: &str) -> GeoError {
    log::error!("{}", message);
    GeoError::new(message, ErrorKind::InvalidConfiguration)
}
