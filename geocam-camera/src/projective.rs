use crate::CameraError;
use core::fmt;
use float_ord::FloatOrd;
use geocam_core::nalgebra::{Matrix3, Matrix3x4, Point2, Point3};
use geocam_core::{Camera, HomgPoint2, HomgPoint3, HomogeneousCamera, ProjectionError, Ray3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Smallest ratio of the smallest to the largest singular value for a matrix to count as rank 3.
pub const RANK_EPSILON: f64 = 1e-12;

/// A general pinhole camera described by a 3x4 projection matrix `P`.
///
/// A world point `X` maps to the homogeneous image point `P * X`.
///
/// ```
/// use geocam_camera::ProjectiveCamera;
/// use geocam_core::nalgebra::{Matrix3x4, Point2, Point3};
/// use geocam_core::Camera;
///
/// #[rustfmt::skip]
/// let camera = ProjectiveCamera::new(Matrix3x4::new(
///     100.0, 0.0,   50.0, 0.0,
///     0.0,   100.0, 40.0, 0.0,
///     0.0,   0.0,   1.0,  0.0,
/// )).unwrap();
/// assert_eq!(camera.project(Point3::new(1.0, 2.0, 10.0)).unwrap(), Point2::new(60.0, 60.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ProjectiveCamera {
    matrix: Matrix3x4<f64>,
}

impl ProjectiveCamera {
    /// Wraps a projection matrix after checking that it has rank 3.
    pub fn new(matrix: Matrix3x4<f64>) -> Result<Self, CameraError> {
        validate_projection(&matrix)?;
        Ok(Self { matrix })
    }

    pub(crate) fn from_validated(matrix: Matrix3x4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix3x4<f64> {
        &self.matrix
    }

    /// The optical center as the right null vector of `P`.
    ///
    /// Cameras performing a parallel projection have their center at infinity, so the result
    /// is a direction (`w = 0`) for them.
    pub fn camera_center(&self) -> HomgPoint3 {
        let column_minor = |skip: usize| {
            let mut minor = Matrix3::zeros();
            for (to, from) in (0..4).filter(|&c| c != skip).enumerate() {
                minor.set_column(to, &self.matrix.column(from));
            }
            minor.determinant()
        };
        HomgPoint3::new(
            column_minor(0),
            -column_minor(1),
            column_minor(2),
            -column_minor(3),
        )
    }

    /// The ray of world points that project onto `image`.
    ///
    /// For a finite camera center `C` the ray starts at `C` and runs along `M⁻¹ x`, where `M` is
    /// the left 3x3 block of `P`. For a parallel projection it starts at the pseudo-inverse
    /// point `P⁺ x` and runs along the center direction.
    pub fn backproject(&self, image: &HomgPoint2) -> Result<Ray3, ProjectionError> {
        let no_ray =
            || ProjectionError::Domain(format!("{:?} does not back-project to a ray", image.0));
        let center = self.camera_center();
        match center.point() {
            Some(origin) => {
                let m = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
                let inverse = m.try_inverse().ok_or_else(no_ray)?;
                Ray3::new(origin, inverse * image.0).ok_or_else(no_ray)
            }
            None => {
                if image.is_ideal(f64::EPSILON) {
                    return Err(ProjectionError::AtInfinity(*image));
                }
                let p = &self.matrix;
                let pseudo_inverse =
                    p.transpose() * (p * p.transpose()).try_inverse().ok_or_else(no_ray)?;
                let origin = HomgPoint3(pseudo_inverse * image.0)
                    .point()
                    .ok_or(ProjectionError::AtInfinity(*image))?;
                Ray3::new(origin, center.0.xyz()).ok_or_else(no_ray)
            }
        }
    }
}

/// Checks that a projection matrix is finite, has no zero row and has rank 3.
pub(crate) fn validate_projection(matrix: &Matrix3x4<f64>) -> Result<(), CameraError> {
    if matrix.iter().any(|n| !n.is_finite()) {
        return Err(CameraError::InvalidMatrix(
            "matrix contains non-finite entries".into(),
        ));
    }
    if let Some(row) = (0..3).find(|&r| matrix.row(r).iter().all(|&n| n == 0.0)) {
        return Err(CameraError::InvalidMatrix(format!("row {} is zero", row)));
    }
    let singular_values = matrix.singular_values();
    let largest = singular_values
        .iter()
        .copied()
        .max_by_key(|&s| FloatOrd(s))
        .unwrap_or(0.0);
    let smallest = singular_values
        .iter()
        .copied()
        .min_by_key(|&s| FloatOrd(s))
        .unwrap_or(0.0);
    if !(smallest > RANK_EPSILON * largest) {
        return Err(CameraError::InvalidMatrix(format!(
            "matrix is rank deficient (singular values {} .. {})",
            smallest, largest
        )));
    }
    Ok(())
}

impl HomogeneousCamera for ProjectiveCamera {
    fn project_homogeneous(&self, point: HomgPoint3) -> HomgPoint2 {
        HomgPoint2(self.matrix * point.0)
    }
}

impl Camera for ProjectiveCamera {
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        self.project_homogeneous(HomgPoint3::from_point(point))
            .dehomogenize()
    }
}

impl fmt::Display for ProjectiveCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_matrix(f, &self.matrix)
    }
}

/// Writes a 3x4 matrix one row per line with space separated entries.
pub(crate) fn write_matrix(f: &mut fmt::Formatter<'_>, matrix: &Matrix3x4<f64>) -> fmt::Result {
    for row in matrix.row_iter() {
        let mut entries = row.iter();
        if let Some(first) = entries.next() {
            write!(f, "{}", first)?;
        }
        for entry in entries {
            write!(f, " {}", entry)?;
        }
        writeln!(f)?;
    }
    Ok(())
}
