use geostore::errors::GeoResult;
use geostore::{GeoIndex, IndexStrategy, SpatialIndex};
use geostore_int_test::test_util::{random_point, square_ring};
use std::sync::Arc;
use std::thread;

const POINT_COUNT: usize = 1_000_000;
const POLYGON_COUNT: usize = 10_000;
const SEARCH_COUNT: usize = 100_000;
const SEARCH_RADIUS_METERS: f64 = 10_000.0;
const THREADS: usize = 8;

fn main() -> GeoResult<()> {
    env_logger::init();
    println!("Starting stress test...");

    let strategies = [
        IndexStrategy::Ordered { storage_level: 12 },
        IndexStrategy::Flat {
            min_level: 10,
            max_level: 12,
        },
    ];
    for strategy in strategies {
        stress(strategy)?;
    }
    Ok(())
}

fn stress(strategy: IndexStrategy) -> GeoResult<()> {
    println!("\n== {} ==", strategy);
    let index: GeoIndex<u64> = GeoIndex::builder().strategy(strategy).build()?;

    let start = std::time::Instant::now();
    let per_thread = POINT_COUNT / THREADS;
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let index = index.clone();
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for i in 0..per_thread {
                    let (lat, lng) = random_point(&mut rng);
                    index.add_point((t * per_thread + i) as u64, lat, lng)?;
                }
                Ok::<_, geostore::GeoError>(())
            })
        })
        .collect();
    join_all(handles)?;
    let stats = index.stats();
    println!(
        "Inserted {} points on {} threads in {:?} ({} cells, {} entries)",
        POINT_COUNT,
        THREADS,
        start.elapsed(),
        stats.cell_count,
        stats.entry_count
    );

    let start = std::time::Instant::now();
    let mut rng = rand::thread_rng();
    for i in 0..POLYGON_COUNT {
        let ring = square_ring(random_point(&mut rng), 0.05);
        index.add_polygon((POINT_COUNT + i) as u64, &ring)?;
    }
    println!("Inserted {} polygons in {:?}", POLYGON_COUNT, start.elapsed());

    let start = std::time::Instant::now();
    let found = Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let per_thread = SEARCH_COUNT / THREADS;
    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let index = index.clone();
            let found = Arc::clone(&found);
            thread::spawn(move || {
                let mut rng = rand::thread_rng();
                for _ in 0..per_thread {
                    let (lat, lng) = random_point(&mut rng);
                    let values = index.search(lat, lng, SEARCH_RADIUS_METERS)?;
                    found.fetch_add(values.len(), std::sync::atomic::Ordering::Relaxed);
                }
                Ok::<_, geostore::GeoError>(())
            })
        })
        .collect();
    join_all(handles)?;
    println!(
        "Ran {} searches of {} m on {} threads in {:?}, {} values found",
        SEARCH_COUNT,
        SEARCH_RADIUS_METERS,
        THREADS,
        start.elapsed(),
        found.load(std::sync::atomic::Ordering::Relaxed)
    );
    Ok(())
}

fn join_all(handles: Vec<thread::JoinHandle<GeoResult<()>>>) -> GeoResult<()> {
    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => {
                return Err(geostore::GeoError::new(
                    "Stress worker panicked",
                    geostore::ErrorKind::InternalError,
                ))
            }
        }
    }
    Ok(())
}
