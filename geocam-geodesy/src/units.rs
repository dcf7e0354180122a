use crate::LvcsError;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

pub const FEET_TO_METERS: f64 = 0.3048;

/// Unit of geodetic angles (latitude, longitude and the LVCS rotation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum AngUnit {
    Radians,
    #[default]
    Deg,
}

impl AngUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngUnit::Radians => angle,
            AngUnit::Deg => angle.to_radians(),
        }
    }

    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngUnit::Radians => radians,
            AngUnit::Deg => radians.to_degrees(),
        }
    }

    pub fn to_degrees(self, angle: f64) -> f64 {
        match self {
            AngUnit::Radians => angle.to_degrees(),
            AngUnit::Deg => angle,
        }
    }
}

impl fmt::Display for AngUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AngUnit::Radians => "radians",
            AngUnit::Deg => "degrees",
        })
    }
}

impl FromStr for AngUnit {
    type Err = LvcsError;

    fn from_str(s: &str) -> Result<Self, LvcsError> {
        match s.to_ascii_lowercase().as_str() {
            "radians" | "radian" | "rad" => Ok(AngUnit::Radians),
            "degrees" | "degree" | "deg" => Ok(AngUnit::Deg),
            _ => Err(LvcsError::UnknownUnit(s.to_owned())),
        }
    }
}

/// Unit of lengths (elevations and local Cartesian coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum LenUnit {
    Feet,
    #[default]
    Meters,
}

impl LenUnit {
    pub fn to_meters(self, length: f64) -> f64 {
        match self {
            LenUnit::Feet => length * FEET_TO_METERS,
            LenUnit::Meters => length,
        }
    }

    pub fn from_meters(self, meters: f64) -> f64 {
        match self {
            LenUnit::Feet => meters / FEET_TO_METERS,
            LenUnit::Meters => meters,
        }
    }
}

impl fmt::Display for LenUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LenUnit::Feet => "feet",
            LenUnit::Meters => "meters",
        })
    }
}

impl FromStr for LenUnit {
    type Err = LvcsError;

    fn from_str(s: &str) -> Result<Self, LvcsError> {
        match s.to_ascii_lowercase().as_str() {
            "feet" | "foot" | "ft" => Ok(LenUnit::Feet),
            "meters" | "meter" | "metres" | "metre" | "m" => Ok(LenUnit::Meters),
            _ => Err(LvcsError::UnknownUnit(s.to_owned())),
        }
    }
}

/// The coordinate system a geodetic position is expressed in.
///
/// `Utm` positions are WGS84 geodetic; an LVCS using `Utm` lays its local frame out on the UTM
/// grid of the zone containing its origin instead of scaling latitude and longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CsName {
    #[default]
    Wgs84,
    Nad27n,
    Wgs72,
    Utm,
}

impl CsName {
    pub const ALL: [CsName; 4] = [CsName::Wgs84, CsName::Nad27n, CsName::Wgs72, CsName::Utm];

    pub fn as_str(self) -> &'static str {
        match self {
            CsName::Wgs84 => "wgs84",
            CsName::Nad27n => "nad27n",
            CsName::Wgs72 => "wgs72",
            CsName::Utm => "utm",
        }
    }
}

impl fmt::Display for CsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CsName {
    type Err = LvcsError;

    fn from_str(s: &str) -> Result<Self, LvcsError> {
        CsName::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| LvcsError::UnknownCsName(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in CsName::ALL {
            assert_eq!(name.to_string().parse::<CsName>().unwrap(), name);
        }
        assert!(matches!(
            "nad83".parse::<CsName>(),
            Err(LvcsError::UnknownCsName(_))
        ));
    }

    #[test]
    fn feet_convert_exactly() {
        assert_eq!(LenUnit::Feet.to_meters(1.0), 0.3048);
        assert_eq!(LenUnit::Meters.from_meters(12.5), 12.5);
        assert_eq!("FEET".parse::<LenUnit>().unwrap(), LenUnit::Feet);
        assert_eq!("degrees".parse::<AngUnit>().unwrap(), AngUnit::Deg);
    }
}
