use crate::{CalibrationMatrix, CameraError, ProjectiveCamera};
use core::fmt;
use geocam_core::nalgebra::{Matrix3x4, Point2, Point3, Unit, Vector3};
use geocam_core::{Camera, HomgPoint2, HomgPoint3, HomogeneousCamera, ProjectionError, Rotation3D};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A calibrated pinhole camera `P = K [R | t]`.
///
/// `R` and `t` take world points into the camera frame, where the camera looks down `+z`. The
/// projection matrix is derived once on construction.
///
/// ```
/// use geocam_camera::{CalibrationMatrix, PerspectiveCamera};
/// use geocam_core::nalgebra::{Point2, Point3};
/// use geocam_core::{Camera, Rotation3D};
///
/// let k = CalibrationMatrix::new(1000.0, Point2::new(500.0, 400.0)).unwrap();
/// let camera = PerspectiveCamera::from_center(k, Rotation3D::identity(), Point3::new(0.0, 0.0, -10.0)).unwrap();
/// let image = camera.project(Point3::new(1.0, 0.0, 0.0)).unwrap();
/// assert!((image - Point2::new(600.0, 400.0)).norm() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PerspectiveCamera {
    calibration: CalibrationMatrix,
    rotation: Rotation3D,
    translation: Vector3<f64>,
    projective: ProjectiveCamera,
}

impl PerspectiveCamera {
    pub fn new(
        calibration: CalibrationMatrix,
        rotation: Rotation3D,
        translation: Vector3<f64>,
    ) -> Result<Self, CameraError> {
        let mut extrinsics = Matrix3x4::zeros();
        extrinsics
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&rotation.matrix());
        extrinsics.set_column(3, &translation);
        let projective = ProjectiveCamera::new(calibration.matrix() * extrinsics)?;
        Ok(Self {
            calibration,
            rotation,
            translation,
            projective,
        })
    }

    /// Places the camera with its optical center at `center` in world coordinates.
    pub fn from_center(
        calibration: CalibrationMatrix,
        rotation: Rotation3D,
        center: Point3<f64>,
    ) -> Result<Self, CameraError> {
        let translation = -rotation.rotate(center.coords);
        Self::new(calibration, rotation, translation)
    }

    pub fn calibration(&self) -> &CalibrationMatrix {
        &self.calibration
    }

    pub fn rotation(&self) -> Rotation3D {
        self.rotation
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.translation
    }

    /// The optical center `C = -R^T t` in world coordinates.
    pub fn camera_center(&self) -> Point3<f64> {
        Point3::from(-self.rotation.inverse().rotate(self.translation))
    }

    /// The world direction the camera looks along.
    pub fn principal_axis(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.rotation.inverse().rotate(Vector3::z()))
    }

    pub fn as_projective(&self) -> &ProjectiveCamera {
        &self.projective
    }

    pub fn matrix(&self) -> &Matrix3x4<f64> {
        self.projective.matrix()
    }
}

impl HomogeneousCamera for PerspectiveCamera {
    fn project_homogeneous(&self, point: HomgPoint3) -> HomgPoint2 {
        self.projective.project_homogeneous(point)
    }
}

impl Camera for PerspectiveCamera {
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        self.projective.project(point)
    }
}

impl From<PerspectiveCamera> for ProjectiveCamera {
    fn from(camera: PerspectiveCamera) -> Self {
        camera.projective
    }
}

impl fmt::Display for PerspectiveCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.projective, f)
    }
}
