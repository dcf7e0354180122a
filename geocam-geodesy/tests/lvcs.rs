use approx::assert_relative_eq;
use geocam_geodesy::{AngUnit, CsName, LenUnit, Lvcs, LvcsError};
use quickcheck_macros::quickcheck;

const ANG_UNITS: [AngUnit; 2] = [AngUnit::Deg, AngUnit::Radians];
const LEN_UNITS: [LenUnit; 2] = [LenUnit::Meters, LenUnit::Feet];

fn origin_lvcs(cs_name: CsName, ang_unit: AngUnit, len_unit: LenUnit) -> Lvcs {
    Lvcs::new(
        ang_unit.from_radians(34f64.to_radians()),
        ang_unit.from_radians((-118f64).to_radians()),
        len_unit.from_meters(150.0),
        cs_name,
        ang_unit,
        len_unit,
    )
    .unwrap()
}

#[test]
fn scenario_near_los_angeles() {
    let lvcs = Lvcs::new(34.0, -118.0, 0.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters).unwrap();
    let local = lvcs
        .global_to_local(-118.0001, 34.0001, 10.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    assert!((-9.4..-9.0).contains(&local.x), "x = {}", local.x);
    assert!((10.9..11.3).contains(&local.y), "y = {}", local.y);
    assert_relative_eq!(local.z, 10.0, epsilon = 1e-9);

    let global = lvcs
        .local_to_global(local.x, local.y, local.z, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    assert_relative_eq!(global.lon, -118.0001, epsilon = 1e-6);
    assert_relative_eq!(global.lat, 34.0001, epsilon = 1e-6);
    assert_relative_eq!(global.elev, 10.0, epsilon = 1e-3);
}

#[test]
fn round_trip_every_datum_and_unit() {
    for cs_name in CsName::ALL {
        for ang_unit in ANG_UNITS {
            for len_unit in LEN_UNITS {
                let lvcs = origin_lvcs(cs_name, ang_unit, len_unit)
                    .with_transform(len_unit.from_meters(12.0), len_unit.from_meters(-7.0), ang_unit.from_radians(0.3));
                for input_cs in CsName::ALL {
                    let (x, y, z) = (
                        len_unit.from_meters(850.0),
                        len_unit.from_meters(-420.0),
                        len_unit.from_meters(35.0),
                    );
                    let global = lvcs
                        .local_to_global(x, y, z, input_cs, AngUnit::Deg, LenUnit::Meters)
                        .unwrap();
                    let local = lvcs
                        .global_to_local(
                            global.lon,
                            global.lat,
                            global.elev,
                            input_cs,
                            AngUnit::Deg,
                            LenUnit::Meters,
                        )
                        .unwrap();
                    let tolerance = len_unit.from_meters(1e-3);
                    assert_relative_eq!(local.x, x, epsilon = tolerance);
                    assert_relative_eq!(local.y, y, epsilon = tolerance);
                    assert_relative_eq!(local.z, z, epsilon = tolerance);
                }
            }
        }
    }
}

#[test]
fn geodetic_round_trip_every_datum_and_unit() {
    let nearby = [(-117.996, 34.003, 120.0), (-118.004, 33.998, 175.0), (-118.0, 34.0, 150.0)];
    for cs_name in CsName::ALL {
        for ang_unit in ANG_UNITS {
            for len_unit in LEN_UNITS {
                let lvcs = origin_lvcs(cs_name, ang_unit, len_unit);
                for input_cs in CsName::ALL {
                    for &(lon, lat, elev) in &nearby {
                        let (lon, lat) = (
                            ang_unit.from_radians(f64::to_radians(lon)),
                            ang_unit.from_radians(f64::to_radians(lat)),
                        );
                        let elev = len_unit.from_meters(elev);
                        let local = lvcs
                            .global_to_local(lon, lat, elev, input_cs, ang_unit, len_unit)
                            .unwrap();
                        let global = lvcs
                            .local_to_global(local.x, local.y, local.z, input_cs, ang_unit, len_unit)
                            .unwrap();
                        assert_relative_eq!(
                            ang_unit.to_degrees(global.lon),
                            ang_unit.to_degrees(lon),
                            epsilon = 1e-8
                        );
                        assert_relative_eq!(
                            ang_unit.to_degrees(global.lat),
                            ang_unit.to_degrees(lat),
                            epsilon = 1e-8
                        );
                        assert_relative_eq!(global.elev, elev, epsilon = 1e-6);
                    }
                }
            }
        }
    }
}

#[test]
fn datums_disagree_by_tens_of_meters() {
    let lvcs = origin_lvcs(CsName::Wgs84, AngUnit::Deg, LenUnit::Meters);
    let as_wgs84 = lvcs
        .global_to_local(-118.0, 34.0, 150.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    let as_nad27 = lvcs
        .global_to_local(-118.0, 34.0, 150.0, CsName::Nad27n, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    let shift = (as_nad27 - as_wgs84).norm();
    assert!(shift > 10.0 && shift < 500.0, "shift {}", shift);
}

#[test]
fn utm_frame_is_metric_grid() {
    let lvcs = origin_lvcs(CsName::Utm, AngUnit::Deg, LenUnit::Meters);
    let geographic = origin_lvcs(CsName::Wgs84, AngUnit::Deg, LenUnit::Meters);
    let a = lvcs
        .global_to_local(-117.995, 34.004, 150.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    let b = geographic
        .global_to_local(-117.995, 34.004, 150.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
        .unwrap();
    // Grid and tangent-plane offsets agree to within convergence and scale distortion.
    assert!((a - b).norm() < 0.02 * b.coords.norm() + 1.0, "{} vs {}", a, b);
}

#[test]
fn invalid_scale_is_rejected() {
    let lvcs = origin_lvcs(CsName::Wgs84, AngUnit::Deg, LenUnit::Meters);
    assert!(matches!(
        lvcs.with_scale(1e-7, 0.0),
        Err(LvcsError::InvalidScale { .. })
    ));
    assert!(matches!(
        lvcs.with_scale(f64::NAN, 1e-7),
        Err(LvcsError::InvalidScale { .. })
    ));
}

#[quickcheck]
fn local_round_trip(x: i16, y: i16, z: i16, theta: u8) -> bool {
    let lvcs = Lvcs::new(-33.9, 151.2, 40.0, CsName::Wgs72, AngUnit::Deg, LenUnit::Meters)
        .unwrap()
        .with_transform(3.0, -4.0, f64::from(theta));
    let (x, y, z) = (f64::from(x) / 4.0, f64::from(y) / 4.0, f64::from(z) / 64.0);
    let global = lvcs
        .local_to_global(x, y, z, CsName::Wgs84, AngUnit::Radians, LenUnit::Feet)
        .unwrap();
    let local = lvcs
        .global_to_local(
            global.lon,
            global.lat,
            global.elev,
            CsName::Wgs84,
            AngUnit::Radians,
            LenUnit::Feet,
        )
        .unwrap();
    (local.x - x).abs() < 1e-4 && (local.y - y).abs() < 1e-4 && (local.z - z).abs() < 1e-4
}
