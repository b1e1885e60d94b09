//! Benchmark configuration

use geostore::IndexStrategy;

/// Search radius used by the search benchmarks, in meters
pub const SEARCH_RADIUS_METERS: f64 = 10_000.0;

/// Storage level of the ordered index
pub const ORDERED_LEVEL: u8 = 12;

/// Level range of the flat index
pub const FLAT_MIN_LEVEL: u8 = 10;
pub const FLAT_MAX_LEVEL: u8 = 12;

/// Threads used by the mixed concurrent workload
pub const WORKLOAD_THREADS: usize = 8;

/// Index strategy under benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    /// Single storage level, range scans for coarse cells
    Ordered,
    /// Replicated over a level range, exact lookups only
    Flat,
}

impl StrategyKind {
    pub fn all() -> [StrategyKind; 2] {
        [StrategyKind::Ordered, StrategyKind::Flat]
    }

    pub fn strategy(&self) -> IndexStrategy {
        match self {
            StrategyKind::Ordered => IndexStrategy::Ordered {
                storage_level: ORDERED_LEVEL,
            },
            StrategyKind::Flat => IndexStrategy::Flat {
                min_level: FLAT_MIN_LEVEL,
                max_level: FLAT_MAX_LEVEL,
            },
        }
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StrategyKind::Ordered => write!(f, "ordered"),
            StrategyKind::Flat => write!(f, "flat"),
        }
    }
}

/// Configuration for benchmark runs
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of points preloaded into an index before searching
    pub point_counts: Vec<usize>,
    /// Number of random keys preloaded into a raw store
    pub key_counts: Vec<usize>,
    /// Search radius in meters
    pub radius_meters: f64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            point_counts: vec![10_000, 100_000],
            key_counts: vec![10_000, 1_000_000],
            radius_meters: SEARCH_RADIUS_METERS,
        }
    }
}

impl BenchmarkConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quick config with smaller counts for fast runs
    pub fn quick() -> Self {
        Self {
            point_counts: vec![1_000],
            key_counts: vec![10_000],
            ..Default::default()
        }
    }

    /// Reads `GEOSTORE_BENCH_QUICK` to pick between the full and quick configs
    pub fn from_env() -> Self {
        match std::env::var("GEOSTORE_BENCH_QUICK") {
            Ok(value) if value != "0" => Self::quick(),
            _ => Self::new(),
        }
    }
}
