use crate::CameraError;
use geocam_core::nalgebra::{Point2, Point3};
use geocam_core::{Camera, ProjectionError};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Denominators with a smaller magnitude (in normalized space) are treated as singular.
pub const DENOMINATOR_EPSILON: f64 = 1e-12;

/// Number of coefficients in a full cubic polynomial of three variables.
pub const RPC_TERMS: usize = 20;

/// Maps a coordinate to and from the roughly `[-1, 1]` range the polynomials are fitted in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ScaleOffset {
    pub scale: f64,
    pub offset: f64,
}

impl ScaleOffset {
    pub fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub fn normalize(&self, value: f64) -> f64 {
        (value - self.offset) / self.scale
    }

    pub fn denormalize(&self, value: f64) -> f64 {
        value * self.scale + self.offset
    }
}

impl Default for ScaleOffset {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}

/// The coordinates a [`RationalCamera`] normalizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RpcCoordinate {
    Longitude,
    Latitude,
    Height,
    Sample,
    Line,
}

impl RpcCoordinate {
    pub const ALL: [RpcCoordinate; 5] = [
        RpcCoordinate::Longitude,
        RpcCoordinate::Latitude,
        RpcCoordinate::Height,
        RpcCoordinate::Sample,
        RpcCoordinate::Line,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// The four polynomials of a [`RationalCamera`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum RpcPolynomial {
    SampleNumerator,
    SampleDenominator,
    LineNumerator,
    LineDenominator,
}

impl RpcPolynomial {
    pub const ALL: [RpcPolynomial; 4] = [
        RpcPolynomial::SampleNumerator,
        RpcPolynomial::SampleDenominator,
        RpcPolynomial::LineNumerator,
        RpcPolynomial::LineDenominator,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// A rational polynomial camera (RPC), the standard sensor model delivered with satellite
/// imagery.
///
/// Ground positions are `(longitude, latitude, height)` in degrees and meters. After normalizing
/// each of them with its [`ScaleOffset`], the image position is
///
/// ```text
/// sample = SampleNumerator(L, P, H) / SampleDenominator(L, P, H)
/// line   = LineNumerator(L, P, H)   / LineDenominator(L, P, H)
/// ```
///
/// denormalized with the sample and line [`ScaleOffset`]s. Each polynomial is a full cubic with
/// its 20 coefficients in the RPC00B order
/// `1, L, P, H, LP, LH, PH, L², P², H², PLH, L³, LP², LH², L²P, P³, PH², L²H, P²H, H³`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RationalCamera {
    coefficients: [[f64; RPC_TERMS]; 4],
    scale_offsets: [ScaleOffset; 5],
}

impl RationalCamera {
    /// Creates a camera from the polynomials (in [`RpcPolynomial::ALL`] order) and the scale
    /// offsets (in [`RpcCoordinate::ALL`] order).
    pub fn new(
        coefficients: [[f64; RPC_TERMS]; 4],
        scale_offsets: [ScaleOffset; 5],
    ) -> Result<Self, CameraError> {
        if coefficients.iter().flatten().any(|n| !n.is_finite()) {
            return Err(CameraError::InvalidMatrix(
                "rational polynomial coefficients must be finite".into(),
            ));
        }
        for (coordinate, so) in RpcCoordinate::ALL.iter().zip(&scale_offsets) {
            if so.scale == 0.0 || !so.scale.is_finite() || !so.offset.is_finite() {
                return Err(CameraError::InvalidMatrix(format!(
                    "{:?} scale {} and offset {} must be finite with a non-zero scale",
                    coordinate, so.scale, so.offset
                )));
            }
        }
        Ok(Self {
            coefficients,
            scale_offsets,
        })
    }

    pub fn coefficients(&self) -> &[[f64; RPC_TERMS]; 4] {
        &self.coefficients
    }

    pub fn polynomial(&self, polynomial: RpcPolynomial) -> &[f64; RPC_TERMS] {
        &self.coefficients[polynomial.index()]
    }

    pub fn scale_offsets(&self) -> &[ScaleOffset; 5] {
        &self.scale_offsets
    }

    pub fn scale_offset(&self, coordinate: RpcCoordinate) -> ScaleOffset {
        self.scale_offsets[coordinate.index()]
    }

    /// The `(sample, line)` offsets.
    pub fn image_offset(&self) -> (f64, f64) {
        (
            self.scale_offset(RpcCoordinate::Sample).offset,
            self.scale_offset(RpcCoordinate::Line).offset,
        )
    }

    /// Replaces the `(sample, line)` offsets.
    ///
    /// Subtracting the corner of a crop from the current offsets yields the camera of the
    /// cropped image.
    pub fn set_image_offset(&mut self, sample: f64, line: f64) {
        self.scale_offsets[RpcCoordinate::Sample.index()].offset = sample;
        self.scale_offsets[RpcCoordinate::Line.index()].offset = line;
    }

    /// Projects `(longitude, latitude, height)` to `(sample, line)`.
    pub fn project_lonlat(
        &self,
        lon: f64,
        lat: f64,
        height: f64,
    ) -> Result<Point2<f64>, ProjectionError> {
        let l = self.scale_offset(RpcCoordinate::Longitude).normalize(lon);
        let p = self.scale_offset(RpcCoordinate::Latitude).normalize(lat);
        let h = self.scale_offset(RpcCoordinate::Height).normalize(height);
        let terms = monomials(l, p, h);
        let evaluate = |polynomial: RpcPolynomial| {
            self.polynomial(polynomial)
                .iter()
                .zip(&terms)
                .map(|(c, t)| c * t)
                .sum::<f64>()
        };

        let ratio = |numerator, denominator| {
            let den = evaluate(denominator);
            if !(den.abs() >= DENOMINATOR_EPSILON) {
                return Err(ProjectionError::SingularDenominator { value: den });
            }
            Ok(evaluate(numerator) / den)
        };
        let sample = ratio(RpcPolynomial::SampleNumerator, RpcPolynomial::SampleDenominator)?;
        let line = ratio(RpcPolynomial::LineNumerator, RpcPolynomial::LineDenominator)?;

        let image = Point2::new(
            self.scale_offset(RpcCoordinate::Sample).denormalize(sample),
            self.scale_offset(RpcCoordinate::Line).denormalize(line),
        );
        if image.coords.iter().all(|n| n.is_finite()) {
            Ok(image)
        } else {
            Err(ProjectionError::NonFinite)
        }
    }
}

impl Camera for RationalCamera {
    /// Projects a point given as `(longitude, latitude, height)`.
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        self.project_lonlat(point.x, point.y, point.z)
    }
}

/// The cubic monomials in RPC00B order.
fn monomials(l: f64, p: f64, h: f64) -> [f64; RPC_TERMS] {
    [
        1.0,
        l,
        p,
        h,
        l * p,
        l * h,
        p * h,
        l * l,
        p * p,
        h * h,
        p * l * h,
        l * l * l,
        l * p * p,
        l * h * h,
        l * l * p,
        p * p * p,
        p * h * h,
        l * l * h,
        p * p * h,
        h * h * h,
    ]
}
