use geocam_core::RotationError;
use geocam_geodesy::LvcsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CameraError {
    /// The matrix cannot describe a camera (rank deficient, zero row or non-finite entries).
    #[error("invalid camera matrix: {0}")]
    InvalidMatrix(String),
    #[error("third row {0:?} is not (0, 0, 0, s) with s != 0")]
    NotAffine([f64; 4]),
    #[error("invalid calibration matrix: {0}")]
    InvalidCalibration(String),
    /// A 2-D transform that must be inverted has (almost) zero determinant.
    #[error("transform is singular (determinant {determinant:e})")]
    SingularTransform { determinant: f64 },
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("failed to access camera file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Lvcs(#[from] LvcsError),
    #[error(transparent)]
    Rotation(#[from] RotationError),
}

impl CameraError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        CameraError::Parse {
            line,
            message: message.into(),
        }
    }
}
