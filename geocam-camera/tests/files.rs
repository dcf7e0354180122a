use approx::assert_relative_eq;
use geocam_camera::{
    CameraError, LocalRationalCamera, RationalCamera, ScaleOffset, RPC_TERMS,
};
use geocam_core::nalgebra::Point3;
use geocam_core::{Camera, ProjectionError};
use geocam_geodesy::{AngUnit, CsName, LenUnit, Lvcs};

/// A camera over Los Angeles whose image axes follow longitude and latitude, with a little
/// height parallax and a curved denominator.
fn la_rational() -> RationalCamera {
    let mut coefficients = [[0.0; RPC_TERMS]; 4];
    coefficients[0][1] = 1.0;
    coefficients[0][3] = 0.02;
    coefficients[1][0] = 1.0;
    coefficients[1][7] = 0.001;
    coefficients[2][2] = -1.0;
    coefficients[2][3] = 0.01;
    coefficients[3][0] = 1.0;
    RationalCamera::new(
        coefficients,
        [
            ScaleOffset::new(0.05, -118.0),
            ScaleOffset::new(0.05, 34.0),
            ScaleOffset::new(500.0, 0.0),
            ScaleOffset::new(10_000.0, 10_000.0),
            ScaleOffset::new(10_000.0, 10_000.0),
        ],
    )
    .unwrap()
}

fn la_lvcs() -> Lvcs {
    Lvcs::new(34.0, -118.0, 0.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters).unwrap()
}

#[test]
fn rpc_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.rpc");
    let camera = la_rational();
    camera.write(&path).unwrap();
    assert_eq!(RationalCamera::read(&path).unwrap(), camera);
}

#[test]
fn truncated_rpc_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.rpc");
    let text = la_rational().to_rpc_string();
    let truncated: String = text.lines().take(40).map(|l| format!("{}\n", l)).collect();
    std::fs::write(&path, truncated).unwrap();
    assert!(matches!(
        RationalCamera::read(&path),
        Err(CameraError::Parse { .. })
    ));
    assert!(matches!(
        RationalCamera::read(dir.path().join("absent.rpc")),
        Err(CameraError::Io(_))
    ));
}

#[test]
fn local_rational_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.lrpc");
    let camera = LocalRationalCamera::new(la_rational(), la_lvcs().with_transform(10.0, 20.0, 5.0));
    camera.write(&path).unwrap();
    let back = LocalRationalCamera::read(&path).unwrap();
    assert_eq!(back, camera);
    let text = camera.to_string();
    assert!(text.contains("\nlvcs\nwgs84\n"));
}

#[test]
fn local_rational_without_lvcs_is_rejected() {
    let text = la_rational().to_rpc_string();
    assert!(matches!(
        LocalRationalCamera::parse(&text),
        Err(CameraError::Parse { .. })
    ));
    let text = format!("{}lvcs\nmars\nmeters degrees\n0 0 0\n", la_rational());
    assert!(matches!(
        LocalRationalCamera::parse(&text),
        Err(CameraError::Lvcs(_))
    ));
}

#[test]
fn local_projection_goes_through_lvcs() {
    let camera = LocalRationalCamera::new(la_rational(), la_lvcs());
    let local = Point3::new(-9.2, 11.1, 10.0);
    let global = camera.local_to_lonlat(local).unwrap();
    assert_relative_eq!(global.x, -118.0001, epsilon = 1e-5);
    assert_relative_eq!(global.y, 34.0001, epsilon = 1e-5);
    assert_relative_eq!(global.z, 10.0, epsilon = 1e-9);
    assert_eq!(
        camera.project(local).unwrap(),
        camera.rational().project(global).unwrap()
    );
    // At the origin every normalized coordinate is zero.
    assert_relative_eq!(
        camera.project(Point3::origin()).unwrap(),
        geocam_core::nalgebra::Point2::new(10_000.0, 10_000.0),
        epsilon = 1e-6
    );
}

#[test]
fn singular_denominator_surfaces() {
    let mut coefficients = *la_rational().coefficients();
    coefficients[1] = [0.0; RPC_TERMS];
    let camera = RationalCamera::new(coefficients, *la_rational().scale_offsets()).unwrap();
    assert!(matches!(
        camera.project(Point3::new(-118.0, 34.0, 0.0)),
        Err(ProjectionError::SingularDenominator { .. })
    ));
}
