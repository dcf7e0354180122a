//! Plain text persistence for [`Lvcs`].
//!
//! The encoding is whitespace separated and read as a token stream:
//!
//! ```text
//! cs_name
//! len_unit ang_unit
//! origin_lat origin_lon origin_elev
//! lat_scale lon_scale
//! lox loy theta
//! ```
//!
//! The scale and transform lines are optional on input and default to zero, which measures the
//! scale at the origin and leaves the local frame untransformed.

use crate::{AngUnit, CsName, LenUnit, Lvcs, LvcsError};
use core::fmt;
use core::str::FromStr;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

impl Lvcs {
    /// Reads an LVCS from a file written by [`Lvcs::write`].
    pub fn read(path: impl AsRef<Path>) -> Result<Self, LvcsError> {
        let path = path.as_ref();
        log::debug!("reading LVCS from {}", path.display());
        Self::read_from(BufReader::new(File::open(path)?))
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), LvcsError> {
        let path = path.as_ref();
        log::debug!("writing LVCS to {}", path.display());
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn read_from(mut reader: impl BufRead) -> Result<Self, LvcsError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::reads(&text)
    }

    pub fn write_to(&self, mut writer: impl Write) -> Result<(), LvcsError> {
        write!(writer, "{}", self)?;
        Ok(())
    }

    /// Parses the text encoding.
    pub fn reads(text: &str) -> Result<Self, LvcsError> {
        let mut tokens = text.split_whitespace();
        let mut required = |what: &str| {
            tokens
                .next()
                .ok_or_else(|| LvcsError::Parse(format!("missing {}", what)))
        };

        let cs_name: CsName = required("coordinate system name")?.parse()?;
        let len_unit: LenUnit = required("length unit")?.parse()?;
        let ang_unit: AngUnit = required("angle unit")?.parse()?;
        let origin = [
            parse_number(required("origin latitude")?)?,
            parse_number(required("origin longitude")?)?,
            parse_number(required("origin elevation")?)?,
        ];

        let rest = tokens
            .map(parse_number)
            .collect::<Result<Vec<f64>, LvcsError>>()?;
        let (scale, transform) = match rest.as_slice() {
            [] => ([0.0; 2], [0.0; 3]),
            &[lat_scale, lon_scale] => ([lat_scale, lon_scale], [0.0; 3]),
            &[lat_scale, lon_scale, lox, loy, theta] => {
                ([lat_scale, lon_scale], [lox, loy, theta])
            }
            other => {
                return Err(LvcsError::Parse(format!(
                    "expected 0, 2 or 5 numbers after the origin, found {}",
                    other.len()
                )))
            }
        };

        Lvcs::from_parts(cs_name, len_unit, ang_unit, origin, scale, transform)
    }

    /// The text encoding, identical to the [`Display`](fmt::Display) output.
    pub fn writes(&self) -> String {
        self.to_string()
    }
}

fn parse_number(token: &str) -> Result<f64, LvcsError> {
    token
        .parse::<f64>()
        .map_err(|e| LvcsError::Parse(format!("`{}` is not a number: {}", token, e)))
}

impl fmt::Display for Lvcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = self.origin();
        let (lat_scale, lon_scale) = self.scale();
        let (lox, loy, theta) = self.transform();
        writeln!(f, "{}", self.cs_name())?;
        writeln!(f, "{} {}", self.len_unit(), self.ang_unit())?;
        writeln!(f, "{} {} {}", origin.lat, origin.lon, origin.elev)?;
        writeln!(f, "{} {}", lat_scale, lon_scale)?;
        writeln!(f, "{} {} {}", lox, loy, theta)
    }
}

impl FromStr for Lvcs {
    type Err = LvcsError;

    fn from_str(s: &str) -> Result<Self, LvcsError> {
        Self::reads(s)
    }
}
