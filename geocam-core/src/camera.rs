use crate::{HomgPoint2, HomgPoint3, ProjectionError};
use nalgebra::{Point2, Point3, Vector2, Vector3};

/// The capability shared by every camera model: mapping world geometry to image coordinates.
///
/// What a "world point" means is up to the model. Projective cameras take points in their own
/// euclidean frame, rational cameras take `(longitude, latitude, elevation)` and local rational
/// cameras take coordinates in their local vertical coordinate system.
pub trait Camera {
    /// Projects a world point into the image.
    ///
    /// This fails rather than returning a meaningless coordinate when the point lands at
    /// infinity or the model is numerically singular there.
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError>;

    /// Projects the coordinates of a vector as if they were a point.
    fn project_vector(&self, vector: Vector3<f64>) -> Result<Vector2<f64>, ProjectionError> {
        self.project(Point3::from(vector)).map(|p| p.coords)
    }

    /// Convenience form of [`Camera::project`] returning `(u, v)`.
    fn project_xyz(&self, x: f64, y: f64, z: f64) -> Result<(f64, f64), ProjectionError> {
        self.project(Point3::new(x, y, z)).map(|p| (p.x, p.y))
    }
}

/// Cameras that are linear in homogeneous coordinates.
///
/// Such cameras can project points at infinity, which is useful for vanishing points and for
/// the viewing direction of parallel projections.
pub trait HomogeneousCamera: Camera {
    fn project_homogeneous(&self, point: HomgPoint3) -> HomgPoint2;
}

