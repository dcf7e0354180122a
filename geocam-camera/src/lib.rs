//! Camera models relating 3d world positions to 2d image positions.
//!
//! Every model implements [`geocam_core::Camera`]. The linear ones also implement
//! [`geocam_core::HomogeneousCamera`] and can project points at infinity.
//!
//! | model                   | world coordinates                      |
//! |-------------------------|----------------------------------------|
//! | [`ProjectiveCamera`]    | euclidean                              |
//! | [`AffineCamera`]        | euclidean, parallel projection         |
//! | [`PerspectiveCamera`]   | euclidean, calibrated `K [R \| t]`     |
//! | [`RationalCamera`]      | longitude, latitude, height            |
//! | [`LocalRationalCamera`] | local vertical coordinate system       |
//! | [`GeoCamera`]           | longitude, latitude of a map raster    |
//!
//! Rational cameras are read from and written to the RPC text format; see
//! [`RationalCamera::parse`].

mod affine;
mod calibration;
mod error;
mod geo;
mod local_rational;
mod perspective;
mod projective;
mod rational;
mod rpc;

pub use affine::*;
pub use calibration::*;
pub use error::*;
pub use geo::*;
pub use local_rational::*;
pub use perspective::*;
pub use projective::*;
pub use rational::*;
