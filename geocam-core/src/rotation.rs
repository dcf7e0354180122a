use crate::RotationError;
use core::ops::{Mul, MulAssign};
use derive_more::{AsRef, Deref, From, Into};
use nalgebra::{Matrix3, Quaternion, Rotation3, Unit, UnitQuaternion, Vector3, Vector4};
use num_traits::Float;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Maximum Frobenius norm of `R·Rᵗ - I` accepted by [`Rotation3D::from_matrix`].
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// A 3d rotation, stored as a unit quaternion.
///
/// The matrix form returned by [`Rotation3D::matrix`] is always orthonormal with a determinant
/// of `+1`; reflections cannot be represented. Composition is quaternion multiplication, so
/// `(a * b).matrix() == a.matrix() * b.matrix()`.
///
/// ```
/// use geocam_core::Rotation3D;
/// use geocam_core::nalgebra::{Matrix3, Vector3};
///
/// let a = Rotation3D::from_euler_angles(0.1, -0.4, 1.2);
/// let b = Rotation3D::from_scaled_axis(Vector3::new(0.3, 0.2, -0.1));
/// let m = (a * b).matrix();
/// assert!((m - a.matrix() * b.matrix()).norm() < 1e-12);
/// assert!((m * m.transpose() - Matrix3::identity()).norm() < 1e-12);
/// assert!((m.determinant() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, AsRef, Deref, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Rotation3D(pub UnitQuaternion<f64>);

impl Rotation3D {
    pub fn identity() -> Self {
        Self(UnitQuaternion::identity())
    }

    /// Builds a rotation from a quaternion given as `[x, y, z, w]` (vector part first).
    ///
    /// The quaternion is normalized, so any non-zero scale is accepted.
    pub fn from_quaternion(q: Vector4<f64>) -> Result<Self, RotationError> {
        if q.iter().any(|n| !n.is_finite()) {
            return Err(RotationError::NonFinite);
        }
        if q.norm_squared() <= f64::epsilon() {
            return Err(RotationError::ZeroQuaternion);
        }
        Ok(Self(UnitQuaternion::from_quaternion(Quaternion::from(q))))
    }

    /// Builds a rotation from a 3x3 matrix.
    ///
    /// The matrix must be orthonormal to within [`ORTHONORMAL_TOLERANCE`] and have a positive
    /// determinant.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Result<Self, RotationError> {
        if matrix.iter().any(|n| !n.is_finite()) {
            return Err(RotationError::NonFinite);
        }
        let deviation = (matrix * matrix.transpose() - Matrix3::identity()).norm();
        if deviation > ORTHONORMAL_TOLERANCE {
            return Err(RotationError::NotOrthonormal { deviation });
        }
        let determinant = matrix.determinant();
        if determinant <= 0.0 {
            return Err(RotationError::Reflection { determinant });
        }
        let rotation = Rotation3::from_matrix_unchecked(*matrix);
        Ok(Self(UnitQuaternion::from_rotation_matrix(&rotation)))
    }

    pub fn from_axis_angle(axis: &Unit<Vector3<f64>>, angle: f64) -> Self {
        Self(UnitQuaternion::from_axis_angle(axis, angle))
    }

    /// The exponential map: the axis is the direction of `w` and the angle is its norm.
    pub fn from_scaled_axis(w: Vector3<f64>) -> Self {
        Self(UnitQuaternion::from_scaled_axis(w))
    }

    /// Roll, pitch and yaw about the x, y and z axes, applied in that order.
    pub fn from_euler_angles(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self(UnitQuaternion::from_euler_angles(roll, pitch, yaw))
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        self.0.to_rotation_matrix().into_inner()
    }

    /// The quaternion as `[x, y, z, w]`.
    pub fn quaternion(&self) -> Vector4<f64> {
        self.0.into_inner().coords
    }

    pub fn angle(&self) -> f64 {
        self.0.angle()
    }

    #[must_use]
    pub fn inverse(self) -> Self {
        Self(self.0.inverse())
    }

    pub fn rotate(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.0 * v
    }
}

impl Default for Rotation3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Rotation3<f64>> for Rotation3D {
    fn from(rotation: Rotation3<f64>) -> Self {
        Self(UnitQuaternion::from_rotation_matrix(&rotation))
    }
}

impl Mul for Rotation3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl MulAssign for Rotation3D {
    fn mul_assign(&mut self, rhs: Self) {
        self.0 *= rhs.0;
    }
}

impl Mul<Vector3<f64>> for Rotation3D {
    type Output = Vector3<f64>;

    fn mul(self, rhs: Vector3<f64>) -> Vector3<f64> {
        self.rotate(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use quickcheck_macros::quickcheck;

    fn small(n: i16) -> f64 {
        f64::from(n) / 4096.0
    }

    #[quickcheck]
    fn matrix_is_orthonormal(x: i16, y: i16, z: i16, w: i16) -> bool {
        let q = Vector4::new(small(x), small(y), small(z), small(w));
        match Rotation3D::from_quaternion(q) {
            Ok(r) => {
                let m = r.matrix();
                (m * m.transpose() - Matrix3::identity()).norm() < 1e-9
                    && (m.determinant() - 1.0).abs() < 1e-9
            }
            Err(e) => e == RotationError::ZeroQuaternion,
        }
    }

    #[quickcheck]
    fn composition_matches_matrix_product(a: (i16, i16, i16), b: (i16, i16, i16)) -> bool {
        let ra = Rotation3D::from_scaled_axis(Vector3::new(small(a.0), small(a.1), small(a.2)));
        let rb = Rotation3D::from_scaled_axis(Vector3::new(small(b.0), small(b.1), small(b.2)));
        ((ra * rb).matrix() - ra.matrix() * rb.matrix()).norm() < 1e-9
    }

    #[test]
    fn matrix_round_trip() {
        let r = Rotation3D::from_euler_angles(0.3, -1.1, 2.5);
        let back = Rotation3D::from_matrix(&r.matrix()).unwrap();
        assert_relative_eq!(back.matrix(), r.matrix(), epsilon = 1e-12);
    }

    #[test]
    fn quaternion_is_normalized() {
        let r = Rotation3D::from_quaternion(Vector4::new(0.0, 0.0, 2.0, 2.0)).unwrap();
        assert_relative_eq!(r.quaternion().norm(), 1.0, epsilon = 1e-15);
        assert_relative_eq!(r.angle(), core::f64::consts::FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn rejects_reflection() {
        let m = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        assert!(matches!(
            Rotation3D::from_matrix(&m),
            Err(RotationError::Reflection { .. })
        ));
    }

    #[test]
    fn rejects_scaled_matrix() {
        let m = Matrix3::identity() * 2.0;
        assert!(matches!(
            Rotation3D::from_matrix(&m),
            Err(RotationError::NotOrthonormal { .. })
        ));
    }

    #[test]
    fn inverse_undoes_rotation() {
        let r = Rotation3D::from_euler_angles(0.7, 0.1, -0.2);
        let v = Vector3::new(1.0, -2.0, 0.5);
        assert_relative_eq!(r.inverse().rotate(r * v), v, epsilon = 1e-12);
    }
}
