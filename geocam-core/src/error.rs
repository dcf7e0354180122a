use crate::HomgPoint2;
use thiserror::Error;

/// Reasons a camera could not map a world point to a finite image point.
///
/// These are numerical-domain failures. They are distinct from successful projections so that
/// callers never receive an unannounced `NaN` or a coordinate computed from a near-zero divisor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// The point projects onto the line at infinity. The homogeneous image point is kept.
    #[error("point projects to infinity ({0:?})")]
    AtInfinity(HomgPoint2),
    /// A rational polynomial denominator evaluated to (almost) zero.
    #[error("rational polynomial denominator {value:e} is below the singularity threshold")]
    SingularDenominator { value: f64 },
    #[error("projection produced a non-finite image coordinate")]
    NonFinite,
    /// The input point lies outside the domain in which the camera is defined.
    #[error("point is outside the camera domain: {0}")]
    Domain(String),
}

/// Reasons a [`Rotation3D`](crate::Rotation3D) could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum RotationError {
    #[error("matrix is not orthonormal (deviation {deviation:e})")]
    NotOrthonormal { deviation: f64 },
    #[error("matrix has determinant {determinant}, which is a reflection")]
    Reflection { determinant: f64 },
    #[error("quaternion has zero norm")]
    ZeroQuaternion,
    #[error("rotation contains non-finite values")]
    NonFinite,
}
