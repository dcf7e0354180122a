use approx::assert_relative_eq;
use geocam_camera::{AffineCamera, CalibrationMatrix, PerspectiveCamera, ProjectiveCamera};
use geocam_core::nalgebra::{Matrix3x4, Point2, Point3, RowVector4, Vector3};
use geocam_core::{Camera, HomgPoint3, HomogeneousCamera, Rotation3D};
use quickcheck_macros::quickcheck;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn small(n: i16) -> f64 {
    f64::from(n) / 1024.0
}

#[quickcheck]
fn projective_project_is_dehomogenized_product(x: i16, y: i16, z: i16) -> bool {
    #[rustfmt::skip]
    let matrix = Matrix3x4::new(
        900.0, 2.0,   410.0, 30.0,
        0.0,   880.0, 300.0, -12.0,
        0.01,  0.02,  1.0,   100.0,
    );
    let camera = ProjectiveCamera::new(matrix).unwrap();
    let point = Point3::new(small(x), small(y), small(z));
    let h = camera.project_homogeneous(HomgPoint3::from_point(point));
    let expected = Point2::new(h.x / h.z, h.y / h.z);
    let image = camera.project(point).unwrap();
    (image - expected).norm() <= 1e-9 * expected.coords.norm()
}

#[quickcheck]
fn affine_third_row_stays_exact(a: i16, b: i16, c: i16, s: i16) -> bool {
    let s = if s == 0 { 3.0 } else { f64::from(s) };
    #[rustfmt::skip]
    let matrix = Matrix3x4::new(
        f64::from(a) + 1000.0, 1.0,                    0.5, 7.0,
        0.25,                  f64::from(b) + 1000.0,  1.0, f64::from(c),
        0.0,                   0.0,                    0.0, s,
    );
    let camera = AffineCamera::new(matrix).unwrap();
    camera.matrix().row(2) == RowVector4::new(0.0, 0.0, 0.0, 1.0)
}

#[test]
fn random_perspective_cameras_agree_with_pinhole_model() {
    let mut rng = SmallRng::seed_from_u64(0);
    for _ in 0..100 {
        let k = CalibrationMatrix::new(rng.gen_range(200.0..2000.0), Point2::new(640.0, 480.0))
            .and_then(|k| k.with_skew(rng.gen_range(-1.0..1.0)))
            .unwrap();
        let rotation = Rotation3D::from_euler_angles(
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-0.5..0.5),
            rng.gen_range(-3.0..3.0),
        );
        let center = Point3::new(
            rng.gen_range(-10.0..10.0),
            rng.gen_range(-10.0..10.0),
            -50.0,
        );
        let camera = PerspectiveCamera::from_center(k, rotation, center).unwrap();

        let world = center
            + camera.principal_axis().into_inner() * rng.gen_range(5.0..100.0)
            + Vector3::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0), 0.0);
        let in_camera = rotation.rotate(world - center);
        let normalized = Point2::new(in_camera.x / in_camera.z, in_camera.y / in_camera.z);
        let expected = k.matrix() * normalized.to_homogeneous();
        assert_relative_eq!(
            camera.project(world).unwrap(),
            Point2::new(expected.x, expected.y),
            epsilon = 1e-6
        );
    }
}

#[test]
fn affine_camera_as_projective_keeps_projection() {
    let mut rng = SmallRng::seed_from_u64(7);
    let camera = AffineCamera::from_rows(
        RowVector4::new(1.8, -0.2, 0.1, 1200.0),
        RowVector4::new(0.15, 1.9, -0.4, 900.0),
    )
    .unwrap();
    let projective = ProjectiveCamera::from(camera);
    for _ in 0..50 {
        let x = Point3::new(
            rng.gen_range(-500.0..500.0),
            rng.gen_range(-500.0..500.0),
            rng.gen_range(0.0..50.0),
        );
        assert_relative_eq!(
            camera.project(x).unwrap(),
            projective.project(x).unwrap(),
            epsilon = 1e-9
        );
    }
    assert_eq!(AffineCamera::try_from(projective).unwrap(), camera);
}
