//! # `geocam`
//!
//! Batteries-included camera models and geodetic frames for photogrammetry and remote sensing.
//!
//! This crate re-exports the geocam crates in one place. It is convenient for scripts and for
//! discovering what is available; applications can depend on the individual crates instead.
//!
//! The basic types (points, rotations, the [`Camera`] trait and [`nalgebra`]) are in the root
//! of the crate.
//!
//! ## Modules
//! * [`geodesy`] - datums, local vertical coordinate systems and UTM
//! * [`camera`] - projective, affine, perspective, rational and geo cameras
//! * [`rectify`] - affine approximation of a camera over a bounded region
//!
//! ```
//! use geocam::camera::{LocalRationalCamera, RationalCamera, ScaleOffset, RPC_TERMS};
//! use geocam::geodesy::{AngUnit, CsName, LenUnit, Lvcs};
//! use geocam::nalgebra::Point3;
//! use geocam::rectify::{AffineRectification, BoundingBox3};
//! use geocam::Camera;
//!
//! let mut coefficients = [[0.0; RPC_TERMS]; 4];
//! coefficients[0][1] = 1.0;
//! coefficients[1][0] = 1.0;
//! coefficients[2][2] = -1.0;
//! coefficients[2][3] = 0.05;
//! coefficients[3][0] = 1.0;
//! let rational = RationalCamera::new(
//!     coefficients,
//!     [
//!         ScaleOffset::new(0.05, -118.0),
//!         ScaleOffset::new(0.05, 34.0),
//!         ScaleOffset::new(500.0, 0.0),
//!         ScaleOffset::new(10_000.0, 10_000.0),
//!         ScaleOffset::new(10_000.0, 10_000.0),
//!     ],
//! )
//! .unwrap();
//! let lvcs = Lvcs::new(34.0, -118.0, 0.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters).unwrap();
//! let camera = LocalRationalCamera::new(rational, lvcs);
//!
//! let scene = BoundingBox3::new(Point3::new(-200.0, -200.0, 0.0), Point3::new(200.0, 200.0, 50.0));
//! let affine = AffineRectification::new()
//!     .compute_affine_camera_seeded(&camera, &scene, 25, 7)
//!     .unwrap();
//! let x = Point3::new(35.0, -80.0, 12.0);
//! assert!((affine.project(x).unwrap() - camera.project(x).unwrap()).norm() < 0.5);
//! ```

pub use geocam_core::*;

/// Geodetic datums, local vertical coordinate systems and UTM
pub mod geodesy {
    pub use geocam_geodesy::*;
}

/// Camera models
#[cfg(feature = "geocam-camera")]
pub mod camera {
    pub use geocam_camera::*;
}

/// Approximating cameras with affine cameras
#[cfg(feature = "geocam-rectify")]
pub mod rectify {
    pub use geocam_rectify::*;
}
