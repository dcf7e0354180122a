//! # geocam core
//!
//! Common types and abstractions shared by all of the geocam crates. Every crate that
//! produces or consumes a camera depends on this one: the homogeneous point types, the
//! [`Ray3`] an image point back-projects to, the [`Rotation3D`] used by perspective cameras,
//! and the [`Camera`] capability trait that all camera models implement.
//!
//! Plain euclidean geometry is expressed with [`nalgebra`] types, which are re-exported so that
//! downstream crates agree on a single version:
//!
//! * [`Point2`](nalgebra::Point2) / [`Point3`](nalgebra::Point3) are affine points.
//!   Subtracting two points yields a vector, but points cannot be added to each other.
//! * [`Vector2`](nalgebra::Vector2) / [`Vector3`](nalgebra::Vector3) are linear and support
//!   addition, subtraction and `norm`.
//!
//! ## Projection
//!
//! All cameras map a 3d world point to a 2d image point. Some of them (projective, affine and
//! perspective) are linear in homogeneous coordinates:
//!
//! ```text
//!   [u']   [p00 p01 p02 p03]   [x]
//!   [v'] = [p10 p11 p12 p13] * [y]
//!   [w']   [p20 p21 p22 p23]   [z]
//!                              [1]
//! ```
//!
//! and the image point is `(u'/w', v'/w')`. When `w'` vanishes the world point lies on the
//! plane through the optical center parallel to the image, and it projects to the line at
//! infinity. Rather than silently dividing by zero, this is reported through
//! [`ProjectionError::AtInfinity`], which still carries the homogeneous result.
//!
//! ```
//! use geocam_core::nalgebra::{Point3, Vector3};
//! use geocam_core::{HomgPoint2, HomgPoint3, ProjectionError};
//!
//! let ideal = HomgPoint2::new(1.0, 2.0, 0.0);
//! assert!(matches!(ideal.dehomogenize(), Err(ProjectionError::AtInfinity(_))));
//!
//! let direction = HomgPoint3::from_direction(Vector3::new(0.0, 0.0, 1.0));
//! assert!(direction.point().is_none());
//! assert_eq!(HomgPoint3::from_point(Point3::new(1.0, 2.0, 3.0)).point(), Some(Point3::new(1.0, 2.0, 3.0)));
//! ```

mod camera;
mod error;
mod point;
mod ray;
mod rotation;

pub use camera::*;
pub use error::*;
pub use nalgebra;
pub use point::*;
pub use ray::*;
pub use rotation::*;
