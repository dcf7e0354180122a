//! Conversions between geodetic coordinates and the planar frames cameras work in.
//!
//! * [`Lvcs`] is a local vertical coordinate system: a Cartesian frame anchored at a geodetic
//!   origin, with `x` pointing east, `y` north and `z` up. It converts between
//!   `(longitude, latitude, elevation)` in any supported datum and local `(x, y, z)`.
//! * [`Utm`] projects WGS84 geodetic coordinates to Universal Transverse Mercator and back.
//! * [`Ellipsoid`] and [`Datum`] hold the reference surfaces behind [`CsName`].
//!
//! ```
//! use geocam_geodesy::{AngUnit, CsName, LenUnit, Lvcs};
//!
//! let lvcs = Lvcs::new(34.0, -118.0, 0.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters).unwrap();
//! let local = lvcs
//!     .global_to_local(-118.0001, 34.0001, 10.0, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
//!     .unwrap();
//! let global = lvcs
//!     .local_to_global(local.x, local.y, local.z, CsName::Wgs84, AngUnit::Deg, LenUnit::Meters)
//!     .unwrap();
//! assert!((global.lon + 118.0001).abs() < 1e-9);
//! assert!((global.lat - 34.0001).abs() < 1e-9);
//! assert!((global.elev - 10.0).abs() < 1e-6);
//! ```

mod datum;
mod encoding;
mod error;
mod lvcs;
mod units;
mod utm;

pub use datum::*;
pub use error::*;
pub use lvcs::*;
pub use units::*;
pub use utm::*;
