use crate::projective::{validate_projection, write_matrix};
use crate::{CameraError, ProjectiveCamera};
use core::fmt;
use geocam_core::nalgebra::{Matrix3x4, Point2, Point3, RowVector4, Unit, Vector3};
use geocam_core::{Camera, HomgPoint2, HomgPoint3, HomogeneousCamera, ProjectionError, Ray3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A parallel projection camera.
///
/// This is a [`ProjectiveCamera`] whose third row is exactly `(0, 0, 0, 1)`, so every finite
/// world point maps to a finite image point without a division:
///
/// ```text
/// u = r0 . (x, y, z, 1)
/// v = r1 . (x, y, z, 1)
/// ```
///
/// Points at infinity stay at infinity, which makes the image of a direction the direction in
/// which it moves the image.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct AffineCamera {
    matrix: Matrix3x4<f64>,
}

impl AffineCamera {
    /// Creates an affine camera from a 3x4 matrix.
    ///
    /// A third row of `(0, 0, 0, s)` with `s != 0` is normalized by dividing the whole matrix
    /// by `s`. Any other third row is not a parallel projection.
    pub fn new(matrix: Matrix3x4<f64>) -> Result<Self, CameraError> {
        let last = matrix.row(2);
        let scale = last[3];
        if last[0] != 0.0 || last[1] != 0.0 || last[2] != 0.0 || scale == 0.0 {
            return Err(CameraError::NotAffine([last[0], last[1], last[2], last[3]]));
        }
        let mut matrix = matrix / scale;
        matrix.set_row(2, &RowVector4::new(0.0, 0.0, 0.0, 1.0));
        validate_projection(&matrix)?;
        Ok(Self { matrix })
    }

    /// Builds the camera from the two rows producing `u` and `v`.
    pub fn from_rows(u_row: RowVector4<f64>, v_row: RowVector4<f64>) -> Result<Self, CameraError> {
        let mut matrix = Matrix3x4::zeros();
        matrix.set_row(0, &u_row);
        matrix.set_row(1, &v_row);
        matrix[(2, 3)] = 1.0;
        Self::new(matrix)
    }

    pub fn matrix(&self) -> &Matrix3x4<f64> {
        &self.matrix
    }

    /// The direction of the parallel projection rays.
    ///
    /// Every world point along this direction lands on the same pixel. The sign is chosen so that
    /// the direction, the `u` axis and the `v` axis form a right handed system.
    pub fn viewing_direction(&self) -> Unit<Vector3<f64>> {
        let u: Vector3<f64> = self.matrix.fixed_view::<1, 3>(0, 0).transpose();
        let v: Vector3<f64> = self.matrix.fixed_view::<1, 3>(1, 0).transpose();
        Unit::new_normalize(u.cross(&v))
    }

    /// The same camera without the parallel projection guarantee.
    pub fn as_projective(&self) -> ProjectiveCamera {
        // The matrix was validated on construction.
        ProjectiveCamera::from_validated(self.matrix)
    }

    /// The parallel ray of world points that project onto `image`.
    pub fn backproject(&self, image: Point2<f64>) -> Result<Ray3, ProjectionError> {
        self.as_projective().backproject(&HomgPoint2::from_point(image))
    }
}

impl HomogeneousCamera for AffineCamera {
    fn project_homogeneous(&self, point: HomgPoint3) -> HomgPoint2 {
        HomgPoint2(self.matrix * point.0)
    }
}

impl Camera for AffineCamera {
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        let u = self.matrix.fixed_view::<2, 3>(0, 0) * point.coords
            + self.matrix.fixed_view::<2, 1>(0, 3);
        if u.iter().all(|n| n.is_finite()) {
            Ok(Point2::from(u))
        } else {
            Err(ProjectionError::NonFinite)
        }
    }
}

impl From<AffineCamera> for ProjectiveCamera {
    fn from(camera: AffineCamera) -> Self {
        camera.as_projective()
    }
}

impl TryFrom<ProjectiveCamera> for AffineCamera {
    type Error = CameraError;

    fn try_from(camera: ProjectiveCamera) -> Result<Self, CameraError> {
        Self::new(*camera.matrix())
    }
}

impl fmt::Display for AffineCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_matrix(f, &self.matrix)
    }
}
