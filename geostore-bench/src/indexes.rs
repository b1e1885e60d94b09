//! Index factory functions for benchmarks

use geostore::{GeoIndex, GeoResult, SpatialIndex};

use crate::config::StrategyKind;

/// Create an empty index for the given strategy
pub fn create_index(kind: StrategyKind) -> GeoResult<GeoIndex<u64>> {
    GeoIndex::builder().strategy(kind.strategy()).build()
}

/// Create an index preloaded with `points`, values being their positions
pub fn create_loaded_index(kind: StrategyKind, points: &[(f64, f64)]) -> GeoResult<GeoIndex<u64>> {
    let index = create_index(kind)?;
    for (i, &(lat, lng)) in points.iter().enumerate() {
        index.add_point(i as u64, lat, lng)?;
    }
    let stats = index.stats();
    log::info!(
        "Loaded {} index with {} points: {} cells, {} entries",
        kind,
        points.len(),
        stats.cell_count,
        stats.entry_count
    );
    Ok(index)
}

/// Install the benchmark logger once; honors `RUST_LOG`
pub fn init_logging() {
    let _ = env_logger::builder().is_test(false).try_init();
}
