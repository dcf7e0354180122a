use geocam_geodesy::{AngUnit, CsName, LenUnit, Lvcs, LvcsError};
use std::io::Cursor;

fn sample() -> Lvcs {
    Lvcs::new(
        0.62,
        -2.05,
        310.0,
        CsName::Nad27n,
        AngUnit::Radians,
        LenUnit::Feet,
    )
    .unwrap()
    .with_transform(120.5, -33.25, 0.125)
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.lvcs");
    let lvcs = sample();
    lvcs.write(&path).unwrap();
    assert_eq!(Lvcs::read(&path).unwrap(), lvcs);
}

#[test]
fn stream_round_trip() {
    let lvcs = sample();
    let mut buffer = Vec::new();
    lvcs.write_to(&mut buffer).unwrap();
    let back = Lvcs::read_from(Cursor::new(buffer)).unwrap();
    assert_eq!(back, lvcs);
    assert_eq!(back.writes(), lvcs.writes());
}

#[test]
fn utm_system_round_trips_with_cached_origin() {
    let lvcs = Lvcs::new(45.5, 9.2, 120.0, CsName::Utm, AngUnit::Deg, LenUnit::Meters).unwrap();
    let back: Lvcs = lvcs.writes().parse().unwrap();
    assert_eq!(back.utm_origin(), lvcs.utm_origin());
    assert_eq!(back.utm_origin().map(|o| o.zone), Some(32));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Lvcs::read(dir.path().join("absent.lvcs")),
        Err(LvcsError::Io(_))
    ));
}
