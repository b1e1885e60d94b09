//! Data generators for benchmarks

use geostore::cell::hilbert::GRID_SIZE;
use geostore::CellId;
use rand::Rng;

/// Latitude band for generated points; keeps discs away from the poles
const MAX_ABS_LAT: f64 = 80.0;

/// Generate `(lat, lng)` points spread uniformly over the globe
pub fn generate_points(count: usize) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            (
                rng.gen_range(-MAX_ABS_LAT..MAX_ABS_LAT),
                rng.gen_range(-180.0..180.0),
            )
        })
        .collect()
}

/// Generate points clustered around a few centers, the way real venues are
pub fn generate_clustered_points(count: usize, clusters: usize) -> Vec<(f64, f64)> {
    let mut rng = rand::thread_rng();
    let centers = generate_points(clusters.max(1));
    (0..count)
        .map(|i| {
            let (lat, lng) = centers[i % centers.len()];
            (
                (lat + rng.gen_range(-0.5..0.5)).clamp(-90.0, 90.0),
                (lng + rng.gen_range(-0.5..0.5)).clamp(-180.0, 180.0),
            )
        })
        .collect()
}

/// Generate small square rings of roughly `size_degrees` around random points
pub fn generate_rings(count: usize, size_degrees: f64) -> Vec<Vec<(f64, f64)>> {
    generate_points(count)
        .into_iter()
        .map(|(lat, lng)| {
            let half = size_degrees / 2.0;
            let (lng_lo, lng_hi) = ((lng - half).max(-180.0), (lng + half).min(180.0));
            vec![
                (lat - half, lng_lo),
                (lat - half, lng_hi),
                (lat + half, lng_hi),
                (lat + half, lng_lo),
            ]
        })
        .collect()
}

/// Generate random cells at `level`, for raw store benchmarks
pub fn generate_cells(count: usize, level: u8) -> Vec<CellId> {
    let mut rng = rand::thread_rng();
    (0..count)
        .filter_map(|_| {
            let position = rng.gen_range(0..GRID_SIZE * GRID_SIZE);
            CellId::from_position(position).parent(level).ok()
        })
        .collect()
}
