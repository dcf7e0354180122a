use nalgebra::{Point3, Unit, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A half line in 3d starting at `origin` and running along a unit `direction`.
///
/// This is what an image point back-projects to: the set of world points that a camera maps onto
/// that pixel.
///
/// ```
/// use geocam_core::nalgebra::{Point3, Vector3};
/// use geocam_core::Ray3;
///
/// let ray = Ray3::new(Point3::new(1.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 4.0)).unwrap();
/// assert_eq!(ray.at(2.0), Point3::new(1.0, 0.0, 2.0));
/// assert!(Ray3::new(Point3::origin(), Vector3::zeros()).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ray3 {
    origin: Point3<f64>,
    direction: Unit<Vector3<f64>>,
}

impl Ray3 {
    /// Creates a ray, normalizing `direction`.
    ///
    /// Returns `None` when `direction` is zero or anything is non-finite.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Option<Self> {
        if origin.coords.iter().chain(direction.iter()).any(|n| !n.is_finite()) {
            return None;
        }
        let direction = Unit::try_new(direction, 0.0)?;
        Some(Self { origin, direction })
    }

    /// The ray from `from` through `to`. `None` if they coincide.
    pub fn from_points(from: Point3<f64>, to: Point3<f64>) -> Option<Self> {
        Self::new(from, to - from)
    }

    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    pub fn direction(&self) -> Unit<Vector3<f64>> {
        self.direction
    }

    /// The point `t` units along the ray.
    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Distance from `point` to the line carrying the ray.
    pub fn distance_to_line(&self, point: Point3<f64>) -> f64 {
        let offset = point - self.origin;
        (offset - self.direction.into_inner() * offset.dot(&self.direction)).norm()
    }
}
