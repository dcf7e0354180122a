use crate::CameraError;
use geocam_core::nalgebra::{Matrix3, Point2, Vector2};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Intrinsic parameters of a perspective camera, as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters).
///
/// ```text
///     [fx  s   u0]
/// K = [0   fy  v0]
///     [0   0   1 ]
/// ```
///
/// Focal lengths are always positive and every parameter is finite. The `with_*` setters check
/// this on each change.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CalibrationMatrix {
    focals: Vector2<f64>,
    principal_point: Point2<f64>,
    skew: f64,
}

impl CalibrationMatrix {
    /// Square pixels with the given focal length (in pixels) and no skew.
    pub fn new(focal: f64, principal_point: Point2<f64>) -> Result<Self, CameraError> {
        Self::identity()
            .with_focal(focal)?
            .with_principal_point(principal_point)
    }

    /// The calibration whose matrix is the identity.
    pub fn identity() -> Self {
        Self {
            focals: Vector2::new(1.0, 1.0),
            principal_point: Point2::origin(),
            skew: 0.0,
        }
    }

    /// Reads the parameters out of an upper triangular matrix.
    ///
    /// The matrix is divided by its bottom right entry first, so any non-zero multiple of a
    /// calibration matrix is accepted.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Result<Self, CameraError> {
        if matrix[(1, 0)] != 0.0 || matrix[(2, 0)] != 0.0 || matrix[(2, 1)] != 0.0 {
            return Err(CameraError::InvalidCalibration(
                "matrix is not upper triangular".into(),
            ));
        }
        let scale = matrix[(2, 2)];
        if scale == 0.0 || !scale.is_finite() {
            return Err(CameraError::InvalidCalibration(format!(
                "bottom right entry {} cannot be normalized",
                scale
            )));
        }
        let k = matrix / scale;
        Self {
            focals: Vector2::new(k[(0, 0)], k[(1, 1)]),
            principal_point: Point2::new(k[(0, 2)], k[(1, 2)]),
            skew: k[(0, 1)],
        }
        .check()
    }

    pub fn focals(&self) -> Vector2<f64> {
        self.focals
    }

    pub fn principal_point(&self) -> Point2<f64> {
        self.principal_point
    }

    pub fn skew(&self) -> f64 {
        self.skew
    }

    /// Replaces the focal lengths along `u` and `v`.
    pub fn with_focals(self, focals: Vector2<f64>) -> Result<Self, CameraError> {
        Self { focals, ..self }.check()
    }

    /// Replaces both focal lengths with `focal`.
    pub fn with_focal(self, focal: f64) -> Result<Self, CameraError> {
        self.with_focals(Vector2::new(focal, focal))
    }

    pub fn with_principal_point(self, principal_point: Point2<f64>) -> Result<Self, CameraError> {
        Self {
            principal_point,
            ..self
        }
        .check()
    }

    pub fn with_skew(self, skew: f64) -> Result<Self, CameraError> {
        Self { skew, ..self }.check()
    }

    fn check(self) -> Result<Self, CameraError> {
        if !(self.focals.x > 0.0 && self.focals.y > 0.0) {
            return Err(CameraError::InvalidCalibration(format!(
                "focal lengths ({}, {}) must be positive",
                self.focals.x, self.focals.y
            )));
        }
        let finite = self.focals.iter().all(|n| n.is_finite())
            && self.principal_point.coords.iter().all(|n| n.is_finite())
            && self.skew.is_finite();
        if !finite {
            return Err(CameraError::InvalidCalibration(
                "parameters must be finite".into(),
            ));
        }
        Ok(self)
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x, self.skew,     self.principal_point.x,
            0.0,           self.focals.y, self.principal_point.y,
            0.0,           0.0,           1.0,
        )
    }
}

impl Default for CalibrationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_matrix() {
        let k = CalibrationMatrix::new(1200.0, Point2::new(640.0, 360.0))
            .and_then(|k| k.with_skew(0.5))
            .and_then(|k| k.with_focals(Vector2::new(1200.0, 1180.0)))
            .unwrap();
        assert_eq!(CalibrationMatrix::from_matrix(&k.matrix()).unwrap(), k);
        assert_eq!(
            CalibrationMatrix::from_matrix(&(k.matrix() * 4.0)).unwrap(),
            k
        );
    }

    #[test]
    fn rejects_bad_matrices() {
        let mut lower = Matrix3::identity();
        lower[(2, 0)] = 1.0;
        assert!(matches!(
            CalibrationMatrix::from_matrix(&lower),
            Err(CameraError::InvalidCalibration(_))
        ));
        assert!(CalibrationMatrix::new(-5.0, Point2::origin()).is_err());
        assert!(CalibrationMatrix::new(f64::INFINITY, Point2::origin()).is_err());
    }

    #[test]
    fn setters_keep_parameters_valid() {
        let k = CalibrationMatrix::new(900.0, Point2::new(320.0, 240.0)).unwrap();
        assert!(matches!(k.with_focal(0.0), Err(CameraError::InvalidCalibration(_))));
        assert!(k.with_focals(Vector2::new(900.0, f64::NAN)).is_err());
        assert!(k.with_focals(Vector2::new(900.0, -1.0)).is_err());
        assert!(k.with_skew(f64::INFINITY).is_err());
        assert!(k
            .with_principal_point(Point2::new(f64::NAN, 0.0))
            .is_err());
        let changed = k.with_focals(Vector2::new(900.0, 880.0)).unwrap();
        assert_eq!(changed.focals(), Vector2::new(900.0, 880.0));
        assert_eq!(changed.principal_point(), Point2::new(320.0, 240.0));
    }
}
