use geostore::errors::ErrorKind;
use geostore::{GeoIndex, GeoIndexBuilder, IndexStats, IndexStrategy, SpatialIndex};
use geostore_int_test::test_util::{cleanup, create_test_context, run_test};

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_invalid_levels_are_rejected_at_construction() {
    let cases = [
        GeoIndex::<u64>::flat(12, 10).err(),
        GeoIndex::<u64>::flat(10, 31).err(),
        GeoIndex::<u64>::ordered(31).err(),
        GeoIndexBuilder::<u64>::new()
            .strategy(IndexStrategy::Flat { min_level: 5, max_level: 4 })
            .build()
            .err(),
    ];
    for err in cases {
        assert_eq!(err.map(|e| e.kind().clone()), Some(ErrorKind::InvalidLevel));
    }
}

#[test]
fn test_missing_strategy_is_a_configuration_error() {
    let err = GeoIndexBuilder::<u64>::new().max_cells(8).build().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidConfiguration);
}

#[test]
fn test_invalid_coordinates_change_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            for (lat, lng) in [(90.5, 0.0), (-91.0, 0.0), (0.0, 180.1), (0.0, -200.0), (f64::NAN, 0.0)] {
                for index in ctx.indexes() {
                    let err = index.add_point(1, lat, lng).unwrap_err();
                    assert_eq!(err.kind(), &ErrorKind::InvalidCoordinate);
                    let err = index.search(lat, lng, 10.0).unwrap_err();
                    assert_eq!(err.kind(), &ErrorKind::InvalidCoordinate);
                }
            }
            for index in ctx.indexes() {
                assert_eq!(index.stats(), IndexStats::default());
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_invalid_radius() {
    run_test(
        create_test_context,
        |ctx| {
            for index in ctx.indexes() {
                for radius in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
                    let err = index.search(0.0, 0.0, radius).unwrap_err();
                    assert_eq!(err.kind(), &ErrorKind::InvalidRadius);
                }
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_malformed_polygons_are_all_or_nothing() {
    run_test(
        create_test_context,
        |ctx| {
            let malformed: Vec<(Vec<(f64, f64)>, ErrorKind)> = vec![
                // fewer than three distinct points
                (vec![(1.0, 1.0), (2.0, 2.0)], ErrorKind::InvalidGeometry),
                (vec![(1.0, 1.0), (1.0, 1.0), (1.0, 1.0), (1.0, 1.0)], ErrorKind::InvalidGeometry),
                // collinear, zero area
                (vec![(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)], ErrorKind::InvalidGeometry),
                // self-intersecting
                (
                    vec![(0.0, 0.0), (0.0, 2.0), (2.0, 0.0), (2.0, 2.0), (1.0, -1.0)],
                    ErrorKind::InvalidGeometry,
                ),
                // one bad vertex among good ones
                (vec![(0.0, 0.0), (0.0, 1.0), (95.0, 1.0)], ErrorKind::InvalidCoordinate),
            ];

            for (ring, kind) in malformed {
                for index in ctx.indexes() {
                    let err = index.add_polygon(9, &ring).unwrap_err();
                    assert_eq!(err.kind(), &kind, "ring {:?}", ring);
                }
            }
            for index in ctx.indexes() {
                assert_eq!(index.stats(), IndexStats::default());
                assert!(index.search(0.5, 0.5, 100_000.0)?.is_empty());
            }
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_error_display_and_kind() {
    let err = GeoIndex::<u64>::ordered(40).unwrap_err();
    assert!(err.to_string().contains("40"));
    assert_eq!(err.kind().to_string(), "Invalid level");
}
