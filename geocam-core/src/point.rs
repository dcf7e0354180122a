use crate::ProjectionError;
use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use nalgebra::{Point2, Point3, Vector2, Vector3, Vector4};
use num_traits::Float;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A homogeneous 2d image point `(x, y, w)`, defined up to a non-zero scale.
///
/// A point with `w = 0` lies on the line at infinity. This is what a parallel ray produces when
/// it is projected through a camera.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct HomgPoint2(pub Vector3<f64>);

impl HomgPoint2 {
    pub fn new(x: f64, y: f64, w: f64) -> Self {
        Self(Vector3::new(x, y, w))
    }

    pub fn from_point(point: Point2<f64>) -> Self {
        Self(point.to_homogeneous())
    }

    /// A point at infinity in the given image direction.
    pub fn from_direction(direction: Vector2<f64>) -> Self {
        Self(direction.push(0.0))
    }

    /// Retrieve the homogeneous vector.
    pub fn homogeneous(self) -> Vector3<f64> {
        self.0
    }

    /// Checks if the point lies on the line at infinity, relative to the magnitude of its
    /// euclidean part.
    pub fn is_ideal(self, epsilon: f64) -> bool {
        self.0.z.abs() <= epsilon * self.0.xy().norm()
    }

    /// Divides out the scale to get an euclidean image point.
    ///
    /// Fails with [`ProjectionError::AtInfinity`] for ideal points and with
    /// [`ProjectionError::NonFinite`] if the result overflows.
    pub fn dehomogenize(self) -> Result<Point2<f64>, ProjectionError> {
        if self.0.iter().any(|n| !n.is_finite()) {
            return Err(ProjectionError::NonFinite);
        }
        if self.0.z == 0.0 || self.is_ideal(f64::epsilon()) {
            return Err(ProjectionError::AtInfinity(self));
        }
        let point = Point2::new(self.0.x / self.0.z, self.0.y / self.0.z);
        if point.coords.iter().all(|n| n.is_finite()) {
            Ok(point)
        } else {
            Err(ProjectionError::NonFinite)
        }
    }
}

/// A homogeneous 3d point `(x, y, z, w)`, defined up to a non-zero scale.
///
/// Points with `w = 0` are directions (points at infinity), such as the direction of the sun or
/// the viewing direction of an affine camera.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct HomgPoint3(pub Vector4<f64>);

impl HomgPoint3 {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self(Vector4::new(x, y, z, w))
    }

    /// Convert the euclidean 3d point into homogeneous coordinates.
    pub fn from_point(point: Point3<f64>) -> Self {
        Self(point.to_homogeneous())
    }

    /// A point at infinity in the given direction.
    pub fn from_direction(direction: Vector3<f64>) -> Self {
        Self(direction.push(0.0))
    }

    /// Retrieve the homogeneous vector.
    pub fn homogeneous(self) -> Vector4<f64> {
        self.0
    }

    /// Retrieve the euclidean 3d point by normalizing the homogeneous coordinate.
    ///
    /// This fails for points at infinity, or when the division overflows.
    pub fn point(self) -> Option<Point3<f64>> {
        Point3::from_homogeneous(self.0).filter(|p| p.coords.iter().all(|n| n.is_finite()))
    }

    pub fn is_ideal(self, epsilon: f64) -> bool {
        self.0.w.abs() <= epsilon * self.0.xyz().norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dehomogenize_scales_out_w() {
        let p = HomgPoint2::new(4.0, -6.0, 2.0).dehomogenize().unwrap();
        assert_relative_eq!(p, Point2::new(2.0, -3.0));
    }

    #[test]
    fn dehomogenize_rejects_tiny_w() {
        let p = HomgPoint2::new(1.0e10, 0.0, 1.0e-20);
        assert!(matches!(p.dehomogenize(), Err(ProjectionError::AtInfinity(_))));
    }

    #[test]
    fn dehomogenize_rejects_nan() {
        let p = HomgPoint2::new(f64::NAN, 0.0, 1.0);
        assert_eq!(p.dehomogenize(), Err(ProjectionError::NonFinite));
    }

    #[test]
    fn points_and_vectors_stay_affine() {
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(0.5, 1.0, -1.0);
        let v: Vector3<f64> = a - b;
        assert_relative_eq!(v, Vector3::new(0.5, 1.0, 4.0));
        assert_relative_eq!(b + v, a);
        assert_relative_eq!((v + v).norm(), 2.0 * v.norm());
    }
}
