use crate::CsName;
use geocam_core::nalgebra::{Rotation3, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

const ARCSEC_TO_RADIANS: f64 = core::f64::consts::PI / (180.0 * 3600.0);

/// A reference ellipsoid of revolution.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Ellipsoid {
    /// Semi-major axis in meters.
    pub a: f64,
    /// Flattening `(a - b) / a`.
    pub f: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        a: 6_378_137.0,
        f: 1.0 / 298.257_223_563,
    };

    pub const WGS72: Ellipsoid = Ellipsoid {
        a: 6_378_135.0,
        f: 1.0 / 298.26,
    };

    /// Clarke 1866, the ellipsoid of NAD27.
    pub const CLARKE_1866: Ellipsoid = Ellipsoid {
        a: 6_378_206.4,
        f: (6_378_206.4 - 6_356_583.8) / 6_378_206.4,
    };

    pub fn b(&self) -> f64 {
        self.a * (1.0 - self.f)
    }

    /// First eccentricity squared.
    pub fn e2(&self) -> f64 {
        self.f * (2.0 - self.f)
    }

    /// Radius of curvature in the prime vertical.
    pub fn prime_vertical_radius(&self, lat: f64) -> f64 {
        let s = lat.sin();
        self.a / (1.0 - self.e2() * s * s).sqrt()
    }

    /// Geodetic `(lat, lon, h)` in radians and meters to earth-centered earth-fixed meters.
    pub fn geodetic_to_ecef(&self, lat: f64, lon: f64, h: f64) -> Vector3<f64> {
        let n = self.prime_vertical_radius(lat);
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Vector3::new(
            (n + h) * cos_lat * cos_lon,
            (n + h) * cos_lat * sin_lon,
            (n * (1.0 - self.e2()) + h) * sin_lat,
        )
    }

    /// Earth-centered earth-fixed meters to geodetic `(lat, lon, h)` in radians and meters.
    ///
    /// Iterates Bowring's latitude update until it stops changing; this converges in a
    /// handful of steps for any point near the surface.
    pub fn ecef_to_geodetic(&self, ecef: Vector3<f64>) -> (f64, f64, f64) {
        let e2 = self.e2();
        let p = ecef.x.hypot(ecef.y);
        let lon = ecef.y.atan2(ecef.x);
        let mut lat = ecef.z.atan2(p * (1.0 - e2));
        for _ in 0..16 {
            let n = self.prime_vertical_radius(lat);
            let next = (ecef.z + e2 * n * lat.sin()).atan2(p);
            let done = (next - lat).abs() < 1e-15;
            lat = next;
            if done {
                break;
            }
        }
        let (sin_lat, cos_lat) = lat.sin_cos();
        let h = p * cos_lat + ecef.z * sin_lat
            - self.a * (1.0 - e2 * sin_lat * sin_lat).sqrt();
        (lat, lon, h)
    }
}

/// A seven parameter similarity transform between geocentric frames.
///
/// `x_wgs84 = t + (1 + s) R x`. The inverse is computed exactly rather than by negating the
/// parameters, so a shift followed by its inverse is the identity to rounding error.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Helmert {
    /// Translation in meters.
    pub translation: Vector3<f64>,
    /// Rotation about the x, y and z axes in arc seconds.
    pub rotation_arcsec: Vector3<f64>,
    /// Scale change in parts per million.
    pub scale_ppm: f64,
}

impl Helmert {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation_arcsec: Vector3::zeros(),
            scale_ppm: 0.0,
        }
    }

    fn rotation(&self) -> Rotation3<f64> {
        Rotation3::from_scaled_axis(self.rotation_arcsec * ARCSEC_TO_RADIANS)
    }

    fn scale(&self) -> f64 {
        1.0 + self.scale_ppm * 1e-6
    }

    pub fn apply(&self, x: Vector3<f64>) -> Vector3<f64> {
        self.translation + self.scale() * (self.rotation() * x)
    }

    pub fn apply_inverse(&self, x: Vector3<f64>) -> Vector3<f64> {
        self.rotation().inverse() * ((x - self.translation) / self.scale())
    }
}

/// A geodetic datum: the ellipsoid positions are measured on and its shift to WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Datum {
    pub ellipsoid: Ellipsoid,
    pub to_wgs84: Helmert,
}

impl Datum {
    pub fn wgs84() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS84,
            to_wgs84: Helmert::identity(),
        }
    }

    /// WGS72 to WGS84 (EPSG:1238).
    pub fn wgs72() -> Self {
        Self {
            ellipsoid: Ellipsoid::WGS72,
            to_wgs84: Helmert {
                translation: Vector3::new(0.0, 0.0, 4.5),
                rotation_arcsec: Vector3::new(0.0, 0.0, 0.554),
                scale_ppm: 0.219,
            },
        }
    }

    /// NAD27 to WGS84 using the mean shift for the conterminous United States.
    pub fn nad27n() -> Self {
        Self {
            ellipsoid: Ellipsoid::CLARKE_1866,
            to_wgs84: Helmert {
                translation: Vector3::new(-8.0, 160.0, 176.0),
                rotation_arcsec: Vector3::zeros(),
                scale_ppm: 0.0,
            },
        }
    }

    pub fn is_wgs84(&self) -> bool {
        *self == Self::wgs84()
    }
}

impl CsName {
    pub fn datum(self) -> Datum {
        match self {
            CsName::Wgs84 | CsName::Utm => Datum::wgs84(),
            CsName::Nad27n => Datum::nad27n(),
            CsName::Wgs72 => Datum::wgs72(),
        }
    }
}

/// Re-expresses a geodetic position `(lat, lon, h)` (radians, meters) from one coordinate
/// system's datum in another's, going through WGS84 geocentric coordinates.
///
/// Positions are returned untouched when both systems share a datum.
pub fn convert_datum(from: CsName, to: CsName, lat: f64, lon: f64, h: f64) -> (f64, f64, f64) {
    let (from, to) = (from.datum(), to.datum());
    if from == to {
        return (lat, lon, h);
    }
    let wgs84 = from
        .to_wgs84
        .apply(from.ellipsoid.geodetic_to_ecef(lat, lon, h));
    to.ellipsoid
        .ecef_to_geodetic(to.to_wgs84.apply_inverse(wgs84))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ecef_round_trip() {
        for &(lat, lon, h) in &[
            (0.0, 0.0, 0.0),
            (0.6, -2.0, 1500.0),
            (-1.2, 3.0, -80.0),
            (1.5, 0.1, 9000.0),
        ] {
            let ecef = Ellipsoid::WGS84.geodetic_to_ecef(lat, lon, h);
            let (lat2, lon2, h2) = Ellipsoid::WGS84.ecef_to_geodetic(ecef);
            assert_relative_eq!(lat, lat2, epsilon = 1e-13);
            assert_relative_eq!(lon, lon2, epsilon = 1e-13);
            assert_relative_eq!(h, h2, epsilon = 1e-6);
        }
    }

    #[test]
    fn equator_is_semi_major_axis() {
        let ecef = Ellipsoid::WGS84.geodetic_to_ecef(0.0, 0.0, 0.0);
        assert_relative_eq!(ecef.x, 6_378_137.0);
        let pole = Ellipsoid::WGS84.geodetic_to_ecef(core::f64::consts::FRAC_PI_2, 0.0, 0.0);
        assert_relative_eq!(pole.z, Ellipsoid::WGS84.b(), epsilon = 1e-6);
    }

    #[test]
    fn helmert_inverse_is_exact() {
        let shift = Datum::wgs72().to_wgs84;
        let x = Vector3::new(-2_500_000.0, -4_600_000.0, 3_500_000.0);
        assert_relative_eq!(shift.apply_inverse(shift.apply(x)), x, epsilon = 1e-7);
    }

    #[test]
    fn nad27_shift_is_tens_of_meters() {
        let (lat, lon) = (34f64.to_radians(), (-118f64).to_radians());
        let (lat2, lon2, h2) = convert_datum(CsName::Nad27n, CsName::Wgs84, lat, lon, 0.0);
        let moved = (Ellipsoid::WGS84.geodetic_to_ecef(lat2, lon2, h2)
            - Ellipsoid::WGS84.geodetic_to_ecef(lat, lon, 0.0))
        .norm();
        assert!(moved > 10.0 && moved < 500.0, "moved {}", moved);
        let (lat3, lon3, h3) = convert_datum(CsName::Wgs84, CsName::Nad27n, lat2, lon2, h2);
        assert_relative_eq!(lat3, lat, epsilon = 1e-12);
        assert_relative_eq!(lon3, lon, epsilon = 1e-12);
        assert_relative_eq!(h3, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn same_datum_is_untouched() {
        assert_eq!(
            convert_datum(CsName::Utm, CsName::Wgs84, 0.5, 0.25, 12.0),
            (0.5, 0.25, 12.0)
        );
    }
}
