use geostore::errors::GeoResult;
use geostore::geometry::EARTH_RADIUS_METERS;
use geostore::{GeoIndex, SpatialIndex};
use rand::Rng;
use std::backtrace::Backtrace;
use std::time::Instant;

/// Level shared by both indexes of a [`TestContext`].
pub const TEST_LEVEL: u8 = 10;

/// Latitude band where small discs never reach a pole.
pub const MAX_TEST_LAT: f64 = 55.0;

/// Longitude band where small discs never cross the antimeridian.
pub const MAX_TEST_LNG: f64 = 170.0;

/// Runs a test between a setup and a teardown step, reporting failures and
/// panics with the backtrace of the failing run.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> GeoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> GeoResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> GeoResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => after(ctx).map_err(|e| (format!("After run failed: {:?}", e), backtrace.to_string())),
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", start_time.elapsed());
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed. Error: {}", error);
}

/// An ordered and a flat index at the same single level, fed the same data.
#[derive(Clone)]
pub struct TestContext {
    ordered: GeoIndex<u64>,
    flat: GeoIndex<u64>,
}

impl TestContext {
    pub fn new(ordered: GeoIndex<u64>, flat: GeoIndex<u64>) -> Self {
        Self { ordered, flat }
    }

    pub fn ordered(&self) -> GeoIndex<u64> {
        self.ordered.clone()
    }

    pub fn flat(&self) -> GeoIndex<u64> {
        self.flat.clone()
    }

    pub fn indexes(&self) -> [GeoIndex<u64>; 2] {
        [self.ordered(), self.flat()]
    }

    /// Adds the point to both indexes.
    pub fn add_point(&self, value: u64, lat: f64, lng: f64) -> GeoResult<()> {
        self.ordered.add_point(value, lat, lng)?;
        self.flat.add_point(value, lat, lng)
    }

    /// Adds the polygon to both indexes.
    pub fn add_polygon(&self, value: u64, ring: &[(f64, f64)]) -> GeoResult<()> {
        self.ordered.add_polygon(value, ring)?;
        self.flat.add_polygon(value, ring)
    }
}

pub fn create_test_context() -> GeoResult<TestContext> {
    let ordered = GeoIndex::builder().ordered(TEST_LEVEL).build()?;
    let flat = GeoIndex::builder().flat(TEST_LEVEL, TEST_LEVEL).build()?;
    Ok(TestContext::new(ordered, flat))
}

/// Context whose flat index replicates over several levels.
pub fn create_replicated_test_context() -> GeoResult<TestContext> {
    let ordered = GeoIndex::builder().ordered(TEST_LEVEL).build()?;
    let flat = GeoIndex::builder().flat(TEST_LEVEL - 4, TEST_LEVEL).build()?;
    Ok(TestContext::new(ordered, flat))
}

pub fn cleanup(ctx: TestContext) -> GeoResult<()> {
    for index in ctx.indexes() {
        log::debug!("{:?}", index);
    }
    Ok(())
}

/// Random point inside the test latitude and longitude bands.
pub fn random_point<R: Rng>(rng: &mut R) -> (f64, f64) {
    (
        rng.gen_range(-MAX_TEST_LAT..MAX_TEST_LAT),
        rng.gen_range(-MAX_TEST_LNG..MAX_TEST_LNG),
    )
}

/// Great-circle distance in meters.
pub fn haversine_meters(a: (f64, f64), b: (f64, f64)) -> f64 {
    let d_lat = (b.0 - a.0).to_radians();
    let d_lng = (b.1 - a.1).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.0.to_radians().cos() * b.0.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * h.sqrt().min(1.0).asin()
}

/// Point `distance_meters` from `origin` along `bearing_degrees`.
pub fn destination(origin: (f64, f64), bearing_degrees: f64, distance_meters: f64) -> (f64, f64) {
    let angle = distance_meters / EARTH_RADIUS_METERS;
    let bearing = bearing_degrees.to_radians();
    let lat1 = origin.0.to_radians();
    let lng1 = origin.1.to_radians();

    let lat2 = (lat1.sin() * angle.cos() + lat1.cos() * angle.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * angle.sin() * lat1.cos()).atan2(angle.cos() - lat1.sin() * lat2.sin());

    let lng = (lng2.to_degrees() + 540.0) % 360.0 - 180.0;
    (lat2.to_degrees(), lng)
}

/// Square ring of `half_degrees` around a center.
pub fn square_ring(center: (f64, f64), half_degrees: f64) -> Vec<(f64, f64)> {
    let (lat, lng) = center;
    vec![
        (lat - half_degrees, lng - half_degrees),
        (lat - half_degrees, lng + half_degrees),
        (lat + half_degrees, lng + half_degrees),
        (lat + half_degrees, lng - half_degrees),
    ]
}
