use geocam_camera::CameraError;
use geocam_core::nalgebra::Point3;
use geocam_core::ProjectionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RectifyError {
    #[error("bounding box {min} .. {max} does not enclose a volume")]
    DegenerateBoundingBox { min: Point3<f64>, max: Point3<f64> },
    #[error("{world} world points but {image} image points")]
    MismatchedLengths { world: usize, image: usize },
    #[error("need at least {required} correspondences, got {got}")]
    InsufficientCorrespondences { required: usize, got: usize },
    /// The world points are (nearly) coplanar, so the affine camera is underdetermined.
    #[error("world points do not span 3d space (singular value ratio {ratio:e})")]
    RankDeficient { ratio: f64 },
    /// The fitted camera maps everything onto a line or a point.
    #[error("fitted camera is degenerate (singular value ratio {ratio:e})")]
    DegenerateProjection { ratio: f64 },
    #[error(transparent)]
    Projection(#[from] ProjectionError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("least squares solve failed: {0}")]
    SvdFailed(&'static str),
}
