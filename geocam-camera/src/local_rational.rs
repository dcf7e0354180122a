use crate::rpc::parse_rpc_lines;
use crate::{CameraError, RationalCamera};
use core::fmt;
use core::str::FromStr;
use geocam_core::nalgebra::{Point2, Point3};
use geocam_core::{Camera, ProjectionError};
use geocam_geodesy::{AngUnit, CsName, LenUnit, Lvcs};
use std::fs;
use std::path::Path;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Line separating the RPC body from the LVCS in the text format.
const LVCS_MARKER: &str = "lvcs";

/// A [`RationalCamera`] that takes points in a local vertical coordinate system.
///
/// Local `(x, y, z)` (in the length unit of the LVCS) is converted to WGS84 longitude, latitude
/// and height in degrees and meters, which is then projected by the rational polynomials.
///
/// The text format is the RPC body followed by a line containing `lvcs` and then the LVCS
/// encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct LocalRationalCamera {
    rational: RationalCamera,
    lvcs: Lvcs,
}

impl LocalRationalCamera {
    pub fn new(rational: RationalCamera, lvcs: Lvcs) -> Self {
        Self { rational, lvcs }
    }

    pub fn rational(&self) -> &RationalCamera {
        &self.rational
    }

    pub fn rational_mut(&mut self) -> &mut RationalCamera {
        &mut self.rational
    }

    pub fn lvcs(&self) -> &Lvcs {
        &self.lvcs
    }

    pub fn set_lvcs(&mut self, lvcs: Lvcs) {
        self.lvcs = lvcs;
    }

    /// Converts local coordinates to the `(longitude, latitude, height)` the polynomials expect.
    pub fn local_to_lonlat(&self, point: Point3<f64>) -> Result<Point3<f64>, ProjectionError> {
        let global = self
            .lvcs
            .local_to_global(
                point.x,
                point.y,
                point.z,
                CsName::Wgs84,
                AngUnit::Deg,
                LenUnit::Meters,
            )
            .map_err(|e| ProjectionError::Domain(e.to_string()))?;
        Ok(Point3::new(global.lon, global.lat, global.elev))
    }

    pub fn parse(text: &str) -> Result<Self, CameraError> {
        let mut lines = text.lines().enumerate().map(|(i, line)| (i + 1, line));
        let rpc_lines = lines
            .by_ref()
            .take_while(|(_, line)| !line.trim().eq_ignore_ascii_case(LVCS_MARKER));
        let rational = parse_rpc_lines(rpc_lines)?;
        let rest: Vec<&str> = lines.map(|(_, line)| line).collect();
        if rest.is_empty() {
            return Err(CameraError::parse(
                text.lines().count(),
                format!("missing `{}` section", LVCS_MARKER),
            ));
        }
        let lvcs = Lvcs::reads(&rest.join("\n"))?;
        Ok(Self::new(rational, lvcs))
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        log::debug!("reading local rational camera from {}", path.display());
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
        let path = path.as_ref();
        log::debug!("writing local rational camera to {}", path.display());
        fs::write(path, self.to_string())?;
        Ok(())
    }
}

impl Camera for LocalRationalCamera {
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        let global = self.local_to_lonlat(point)?;
        log::trace!("local {} is geodetic {}", point, global);
        self.rational.project(global)
    }
}

impl fmt::Display for LocalRationalCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rational)?;
        writeln!(f, "{}", LVCS_MARKER)?;
        write!(f, "{}", self.lvcs)
    }
}

impl FromStr for LocalRationalCamera {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, CameraError> {
        Self::parse(s)
    }
}
