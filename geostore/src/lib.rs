//! # geostore - Embedded Concurrent Geospatial Index
//!
//! geostore maps points and polygons to application values and answers "which
//! values might lie within this distance of here" queries. Everything is held
//! in memory in concurrent cell stores, and every operation runs on the
//! caller's thread.
//!
//! ## Key Features
//!
//! - **Two strategies**: an ordered index that stores one entry per point and
//!   range-scans coarse cells, and a flat index that replicates points over a
//!   level range and answers with exact lookups only
//! - **Concurrent**: lock-free skip list and sharded hash map stores; indexes
//!   are `Send + Sync` and [`GeoIndex`] clones share one index
//! - **Pluggable geometry**: indexes talk to a [`CellGeometry`]; the bundled
//!   [`HilbertGrid`] orders cells along a Hilbert curve
//! - **Conservative results**: searches return every value whose cells might
//!   intersect the query disc
//!
//! ## Quick Start
//!
//! ```rust
//! use geostore::{GeoIndex, SpatialIndex};
//!
//! # fn main() -> Result<(), geostore::errors::GeoError> {
//! let index = GeoIndex::ordered(12)?;
//! index.add_point("cafe", 52.52, 13.405)?;
//! index.add_polygon("park", &[(52.51, 13.36), (52.51, 13.38), (52.52, 13.38)])?;
//!
//! let nearby = index.search(52.52, 13.405, 10.0)?;
//! assert!(nearby.contains("cafe"));
//! assert!(index.search(10.0, 10.0, 10.0)?.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cell`] - Cell identifiers, coordinates and Hilbert curve math
//! - [`geometry`] - The geometry contract, the bundled grid and region coverings
//! - [`store`] - Concurrent cell multimaps
//! - [`index`] - Ordered and flat indexes and the [`GeoIndex`] facade
//! - [`config`] - Strategy configuration
//! - [`builder`] - Fluent index builder
//! - [`errors`] - Error types and result definitions

use std::hash::Hash;

pub mod builder;
pub mod cell;
pub mod config;
pub mod errors;
pub mod geometry;
pub mod index;
pub mod store;

pub use builder::GeoIndexBuilder;
pub use cell::{CellId, LatLng, MAX_LEVEL};
pub use config::IndexStrategy;
pub use errors::{ErrorKind, GeoError, GeoResult};
pub use geometry::{CellGeometry, HilbertGrid};
pub use index::{FlatGeoIndex, GeoIndex, IndexStats, OrderedGeoIndex, SpatialIndex};

/// Values an index can hold.
///
/// Implemented for every type that is hashable, cloneable and shareable
/// across threads.
pub trait IndexValue: Eq + Hash + Clone + Send + Sync + 'static {}

impl<T> IndexValue for T where T: Eq + Hash + Clone + Send + Sync + 'static {}
