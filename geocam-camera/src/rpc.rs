//! The RPC text format.
//!
//! Every non-blank line is a `KEY: value [unit]` pair. Keys are case insensitive and the unit is
//! ignored on input:
//!
//! ```text
//! LINE_OFF: 15834.0 pixels
//! SAMP_OFF: 13464.0 pixels
//! LAT_OFF: 34.0718 degrees
//! LONG_OFF: -117.9421 degrees
//! HEIGHT_OFF: 105.0 meters
//! LINE_SCALE: 15834.0 pixels
//! ...
//! LINE_NUM_COEFF_1: 0.0011
//! ...
//! SAMP_DEN_COEFF_20: 0.0
//! ```
//!
//! All ten scale/offset keys and all eighty coefficients are required. Other keys (such as the
//! `ERR_BIAS` and `ERR_RAND` accuracy estimates found in vendor files) are skipped.

use crate::{CameraError, RationalCamera, RpcCoordinate, RpcPolynomial, ScaleOffset, RPC_TERMS};
use core::fmt;
use core::str::FromStr;
use std::fs;
use std::path::Path;

impl RpcCoordinate {
    fn offset_key(self) -> &'static str {
        match self {
            RpcCoordinate::Longitude => "LONG_OFF",
            RpcCoordinate::Latitude => "LAT_OFF",
            RpcCoordinate::Height => "HEIGHT_OFF",
            RpcCoordinate::Sample => "SAMP_OFF",
            RpcCoordinate::Line => "LINE_OFF",
        }
    }

    fn scale_key(self) -> &'static str {
        match self {
            RpcCoordinate::Longitude => "LONG_SCALE",
            RpcCoordinate::Latitude => "LAT_SCALE",
            RpcCoordinate::Height => "HEIGHT_SCALE",
            RpcCoordinate::Sample => "SAMP_SCALE",
            RpcCoordinate::Line => "LINE_SCALE",
        }
    }

    fn unit(self) -> &'static str {
        match self {
            RpcCoordinate::Longitude | RpcCoordinate::Latitude => "degrees",
            RpcCoordinate::Height => "meters",
            RpcCoordinate::Sample | RpcCoordinate::Line => "pixels",
        }
    }
}

impl RpcPolynomial {
    fn key_prefix(self) -> &'static str {
        match self {
            RpcPolynomial::LineNumerator => "LINE_NUM_COEFF_",
            RpcPolynomial::LineDenominator => "LINE_DEN_COEFF_",
            RpcPolynomial::SampleNumerator => "SAMP_NUM_COEFF_",
            RpcPolynomial::SampleDenominator => "SAMP_DEN_COEFF_",
        }
    }
}

/// The order scale/offset keys are written in.
const SCALE_OFFSET_ORDER: [RpcCoordinate; 5] = [
    RpcCoordinate::Line,
    RpcCoordinate::Sample,
    RpcCoordinate::Latitude,
    RpcCoordinate::Longitude,
    RpcCoordinate::Height,
];

/// The order polynomials are written in.
const POLYNOMIAL_ORDER: [RpcPolynomial; 4] = [
    RpcPolynomial::LineNumerator,
    RpcPolynomial::LineDenominator,
    RpcPolynomial::SampleNumerator,
    RpcPolynomial::SampleDenominator,
];

#[derive(Default)]
struct RpcFields {
    offsets: [Option<f64>; 5],
    scales: [Option<f64>; 5],
    coefficients: [[Option<f64>; RPC_TERMS]; 4],
}

impl RpcFields {
    /// Finds the slot a key is stored in, or `None` for keys that are skipped.
    fn slot(&mut self, key: &str) -> Result<Option<&mut Option<f64>>, String> {
        for (index, coordinate) in RpcCoordinate::ALL.iter().enumerate() {
            if key == coordinate.offset_key() {
                return Ok(Some(&mut self.offsets[index]));
            }
            if key == coordinate.scale_key() {
                return Ok(Some(&mut self.scales[index]));
            }
        }
        for (index, polynomial) in RpcPolynomial::ALL.iter().enumerate() {
            if let Some(number) = key.strip_prefix(polynomial.key_prefix()) {
                let term = number
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=RPC_TERMS).contains(n))
                    .ok_or_else(|| format!("coefficient index `{}` is not in 1..=20", number))?;
                return Ok(Some(&mut self.coefficients[index][term - 1]));
            }
        }
        Ok(None)
    }

    fn finish(self, last_line: usize) -> Result<RationalCamera, CameraError> {
        let missing = |key: String| CameraError::parse(last_line, format!("missing `{}`", key));
        let mut scale_offsets = [ScaleOffset::default(); 5];
        for (index, coordinate) in RpcCoordinate::ALL.iter().enumerate() {
            scale_offsets[index] = ScaleOffset::new(
                self.scales[index].ok_or_else(|| missing(coordinate.scale_key().into()))?,
                self.offsets[index].ok_or_else(|| missing(coordinate.offset_key().into()))?,
            );
        }
        let mut coefficients = [[0.0; RPC_TERMS]; 4];
        for (index, polynomial) in RpcPolynomial::ALL.iter().enumerate() {
            for term in 0..RPC_TERMS {
                coefficients[index][term] = self.coefficients[index][term]
                    .ok_or_else(|| missing(format!("{}{}", polynomial.key_prefix(), term + 1)))?;
            }
        }
        RationalCamera::new(coefficients, scale_offsets)
    }
}

impl RationalCamera {
    /// Parses the RPC text format.
    pub fn parse(text: &str) -> Result<Self, CameraError> {
        parse_rpc_lines(text.lines().enumerate().map(|(i, line)| (i + 1, line)))
    }

    /// Loads a camera from an RPC text file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, CameraError> {
        let path = path.as_ref();
        log::debug!("reading rational camera from {}", path.display());
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Renders the camera in the RPC text format.
    pub fn to_rpc_string(&self) -> String {
        self.to_string()
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), CameraError> {
        let path = path.as_ref();
        log::debug!("writing rational camera to {}", path.display());
        fs::write(path, self.to_rpc_string())?;
        Ok(())
    }
}

/// Parses numbered lines of the RPC text format.
pub(crate) fn parse_rpc_lines<'a>(
    lines: impl Iterator<Item = (usize, &'a str)>,
) -> Result<RationalCamera, CameraError> {
    let mut fields = RpcFields::default();
    let mut last_line = 0;
    for (number, line) in lines {
        last_line = number;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (key, rest) = line
            .split_once(':')
            .ok_or_else(|| CameraError::parse(number, format!("expected `KEY: value`, found `{}`", line)))?;
        let key = key.trim().to_ascii_uppercase();
        let slot = match fields.slot(&key).map_err(|e| CameraError::parse(number, e))? {
            Some(slot) => slot,
            None => {
                log::trace!("skipping RPC key {} on line {}", key, number);
                continue;
            }
        };
        if slot.is_some() {
            return Err(CameraError::parse(number, format!("duplicate `{}`", key)));
        }
        let value = rest
            .split_whitespace()
            .next()
            .ok_or_else(|| CameraError::parse(number, format!("`{}` has no value", key)))?;
        let value = value.parse::<f64>().map_err(|e| {
            CameraError::parse(number, format!("`{}` is not a number: {}", value, e))
        })?;
        *slot = Some(value);
    }
    fields.finish(last_line)
}

impl fmt::Display for RationalCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for coordinate in SCALE_OFFSET_ORDER {
            let so = self.scale_offset(coordinate);
            writeln!(f, "{}: {} {}", coordinate.offset_key(), so.offset, coordinate.unit())?;
        }
        for coordinate in SCALE_OFFSET_ORDER {
            let so = self.scale_offset(coordinate);
            writeln!(f, "{}: {} {}", coordinate.scale_key(), so.scale, coordinate.unit())?;
        }
        for polynomial in POLYNOMIAL_ORDER {
            for (term, c) in self.polynomial(polynomial).iter().enumerate() {
                writeln!(f, "{}{}: {}", polynomial.key_prefix(), term + 1, c)?;
            }
        }
        Ok(())
    }
}

impl FromStr for RationalCamera {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, CameraError> {
        Self::parse(s)
    }
}
