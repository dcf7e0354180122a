use geocam_core::nalgebra::{Point3, Vector3};
use rand::Rng;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// An axis aligned box in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BoundingBox3 {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox3 {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// The smallest box containing all `points`, or `None` if there are none.
    pub fn from_points(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |bbox, p| {
            Self::new(bbox.min.inf(&p), bbox.max.sup(&p))
        }))
    }

    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    pub fn center(&self) -> Point3<f64> {
        self.min + self.extent() / 2.0
    }

    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Whether the box is finite with a positive extent along every axis.
    pub fn has_volume(&self) -> bool {
        let finite = self
            .min
            .iter()
            .chain(self.max.iter())
            .all(|n| n.is_finite());
        finite && self.extent().iter().all(|&e| e > 0.0)
    }

    /// Draws a point uniformly from the box.
    pub fn sample(&self, rng: &mut impl Rng) -> Point3<f64> {
        let extent = self.extent();
        Point3::new(
            rng.gen::<f64>() * extent.x + self.min.x,
            rng.gen::<f64>() * extent.y + self.min.y,
            rng.gen::<f64>() * extent.z + self.min.z,
        )
    }
}
