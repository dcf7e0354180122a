use crate::{Ellipsoid, UtmError};
use core::f64::consts::PI;
use core::fmt;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Scale factor on the central meridian.
pub const UTM_K0: f64 = 0.9996;
pub const UTM_FALSE_EASTING: f64 = 500_000.0;
/// Added to northings in the southern hemisphere so they stay positive.
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;
/// UTM is not defined poleward of this latitude (in degrees).
pub const UTM_MAX_LATITUDE: f64 = 84.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn of_latitude(lat: f64) -> Self {
        if lat < 0.0 {
            Hemisphere::South
        } else {
            Hemisphere::North
        }
    }

    fn false_northing(self) -> f64 {
        match self {
            Hemisphere::North => 0.0,
            Hemisphere::South => UTM_FALSE_NORTHING_SOUTH,
        }
    }
}

/// A position on the UTM grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct UtmPoint {
    pub easting: f64,
    pub northing: f64,
    pub zone: u8,
    pub hemisphere: Hemisphere,
}

impl fmt::Display for UtmPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let band = match self.hemisphere {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        };
        write!(f, "{}{} {} {}", self.zone, band, self.easting, self.northing)
    }
}

/// Transverse Mercator projection onto the UTM grid.
///
/// Uses Krüger's series to fourth order in the third flattening `n`, which is accurate to well
/// under a millimeter across a zone. The projector holds only the series coefficients for its
/// ellipsoid and is otherwise stateless; every method is a pure function of its arguments.
///
/// ```
/// use geocam_geodesy::{Hemisphere, Utm};
///
/// let utm = Utm::new();
/// let p = utm.lonlat_to_utm(-117.0, 0.0).unwrap();
/// assert_eq!(p.zone, 11);
/// assert_eq!(p.hemisphere, Hemisphere::North);
/// assert!((p.easting - 500_000.0).abs() < 1e-6);
/// assert!(p.northing.abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Utm {
    /// Eccentricity.
    e: f64,
    /// Rectifying radius.
    rectifying_radius: f64,
    alpha: [f64; 4],
    beta: [f64; 4],
    delta: [f64; 4],
}

impl Utm {
    /// A projector on the WGS84 ellipsoid.
    pub fn new() -> Self {
        Self::with_ellipsoid(Ellipsoid::WGS84)
    }

    pub fn with_ellipsoid(ellipsoid: Ellipsoid) -> Self {
        let n = ellipsoid.f / (2.0 - ellipsoid.f);
        let n2 = n * n;
        let n3 = n2 * n;
        let n4 = n3 * n;
        Self {
            e: ellipsoid.e2().sqrt(),
            rectifying_radius: ellipsoid.a / (1.0 + n) * (1.0 + n2 / 4.0 + n4 / 64.0),
            alpha: [
                n / 2.0 - 2.0 * n2 / 3.0 + 5.0 * n3 / 16.0 + 41.0 * n4 / 180.0,
                13.0 * n2 / 48.0 - 3.0 * n3 / 5.0 + 557.0 * n4 / 1440.0,
                61.0 * n3 / 240.0 - 103.0 * n4 / 140.0,
                49561.0 * n4 / 161_280.0,
            ],
            beta: [
                n / 2.0 - 2.0 * n2 / 3.0 + 37.0 * n3 / 96.0 - n4 / 360.0,
                n2 / 48.0 + n3 / 15.0 - 437.0 * n4 / 1440.0,
                17.0 * n3 / 480.0 - 37.0 * n4 / 840.0,
                4397.0 * n4 / 161_280.0,
            ],
            delta: [
                2.0 * n - 2.0 * n2 / 3.0 - 2.0 * n3 + 116.0 * n4 / 45.0,
                7.0 * n2 / 3.0 - 8.0 * n3 / 5.0 - 227.0 * n4 / 45.0,
                56.0 * n3 / 15.0 - 136.0 * n4 / 35.0,
                4279.0 * n4 / 630.0,
            ],
        }
    }

    /// The standard 6° zone containing `lon` (degrees).
    pub fn zone_of(lon: f64) -> u8 {
        let lon = wrap_degrees(lon);
        (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60) as u8
    }

    /// Longitude of the central meridian of `zone` in degrees.
    pub fn central_meridian(zone: u8) -> f64 {
        f64::from(zone) * 6.0 - 183.0
    }

    /// Projects `(lon, lat)` in degrees into the zone that contains it.
    pub fn lonlat_to_utm(&self, lon: f64, lat: f64) -> Result<UtmPoint, UtmError> {
        self.lonlat_to_utm_in_zone(lon, lat, Self::zone_of(lon), Hemisphere::of_latitude(lat))
    }

    /// Projects `(lon, lat)` in degrees into a given zone and hemisphere.
    ///
    /// Forcing the zone keeps a set of neighbouring points on one grid even if some of them
    /// fall just across a zone boundary.
    pub fn lonlat_to_utm_in_zone(
        &self,
        lon: f64,
        lat: f64,
        zone: u8,
        hemisphere: Hemisphere,
    ) -> Result<UtmPoint, UtmError> {
        check_zone(zone)?;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(UtmError::NonFinite);
        }
        if lat.abs() >= UTM_MAX_LATITUDE {
            return Err(UtmError::LatitudeOutOfRange { latitude: lat });
        }
        let phi = lat.to_radians();
        let lambda = wrap_radians((lon - Self::central_meridian(zone)).to_radians());

        let sin_phi = phi.sin();
        let t = (sin_phi.atanh() - self.e * (self.e * sin_phi).atanh()).sinh();
        let xi_p = t.atan2(lambda.cos());
        let eta_p = (lambda.sin() / (1.0 + t * t).sqrt()).atanh();

        let mut xi = xi_p;
        let mut eta = eta_p;
        for (j, alpha) in (1i32..).zip(self.alpha) {
            let k = 2.0 * f64::from(j);
            xi += alpha * (k * xi_p).sin() * (k * eta_p).cosh();
            eta += alpha * (k * xi_p).cos() * (k * eta_p).sinh();
        }

        let scale = UTM_K0 * self.rectifying_radius;
        let point = UtmPoint {
            easting: UTM_FALSE_EASTING + scale * eta,
            northing: hemisphere.false_northing() + scale * xi,
            zone,
            hemisphere,
        };
        if point.easting.is_finite() && point.northing.is_finite() {
            Ok(point)
        } else {
            Err(UtmError::NonFinite)
        }
    }

    /// Inverse projection. Returns `(lon, lat)` in degrees.
    pub fn utm_to_lonlat(
        &self,
        easting: f64,
        northing: f64,
        zone: u8,
        hemisphere: Hemisphere,
    ) -> Result<(f64, f64), UtmError> {
        check_zone(zone)?;
        let scale = UTM_K0 * self.rectifying_radius;
        let xi = (northing - hemisphere.false_northing()) / scale;
        let eta = (easting - UTM_FALSE_EASTING) / scale;

        let mut xi_p = xi;
        let mut eta_p = eta;
        for (j, beta) in (1i32..).zip(self.beta) {
            let k = 2.0 * f64::from(j);
            xi_p -= beta * (k * xi).sin() * (k * eta).cosh();
            eta_p -= beta * (k * xi).cos() * (k * eta).sinh();
        }

        let chi = (xi_p.sin() / eta_p.cosh()).asin();
        let mut phi = chi;
        for (j, delta) in (1i32..).zip(self.delta) {
            phi += delta * (2.0 * f64::from(j) * chi).sin();
        }
        let lambda = eta_p.sinh().atan2(xi_p.cos());

        let lon = wrap_degrees(Self::central_meridian(zone) + lambda.to_degrees());
        let lat = phi.to_degrees();
        if lon.is_finite() && lat.is_finite() {
            Ok((lon, lat))
        } else {
            Err(UtmError::NonFinite)
        }
    }
}

impl Default for Utm {
    fn default() -> Self {
        Self::new()
    }
}

fn check_zone(zone: u8) -> Result<(), UtmError> {
    if (1..=60).contains(&zone) {
        Ok(())
    } else {
        Err(UtmError::InvalidZone(zone))
    }
}

/// Wraps into `[-180, 180)` only when outside `[-180, 180]`.
pub(crate) fn wrap_degrees(lon: f64) -> f64 {
    if (-180.0..=180.0).contains(&lon) {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Wraps into `[-π, π)` only when outside `[-π, π]`.
pub(crate) fn wrap_radians(angle: f64) -> f64 {
    if (-PI..=PI).contains(&angle) {
        angle
    } else {
        (angle + PI).rem_euclid(2.0 * PI) - PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zones() {
        assert_eq!(Utm::zone_of(-180.0), 1);
        assert_eq!(Utm::zone_of(-177.0), 1);
        assert_eq!(Utm::zone_of(-118.0), 11);
        assert_eq!(Utm::zone_of(0.0), 31);
        assert_eq!(Utm::zone_of(2.999), 31);
        assert_eq!(Utm::zone_of(3.0), 31);
        assert_eq!(Utm::zone_of(6.0), 32);
        assert_eq!(Utm::zone_of(179.9), 60);
        assert_eq!(Utm::zone_of(180.0), 60);
        assert_eq!(Utm::zone_of(183.0), 1);
        assert_eq!(Utm::central_meridian(11), -117.0);
    }

    #[test]
    fn central_meridian_northing_is_scaled_meridian_arc() {
        // Meridian arc from the equator to 45°N on WGS84 is 4 984 944.378 m.
        let p = Utm::new().lonlat_to_utm(3.0, 45.0).unwrap();
        assert_relative_eq!(p.easting, UTM_FALSE_EASTING, epsilon = 1e-6);
        assert_relative_eq!(p.northing, UTM_K0 * 4_984_944.378, epsilon = 1.0);
    }

    #[test]
    fn symmetric_about_central_meridian() {
        let utm = Utm::new();
        let east = utm.lonlat_to_utm_in_zone(-116.0, 34.0, 11, Hemisphere::North).unwrap();
        let west = utm.lonlat_to_utm_in_zone(-118.0, 34.0, 11, Hemisphere::North).unwrap();
        assert_relative_eq!(
            east.easting - UTM_FALSE_EASTING,
            UTM_FALSE_EASTING - west.easting,
            epsilon = 1e-6
        );
        assert_relative_eq!(east.northing, west.northing, epsilon = 1e-6);
    }

    #[test]
    fn southern_hemisphere_uses_false_northing() {
        let p = Utm::new().lonlat_to_utm(151.2, -33.9).unwrap();
        assert_eq!(p.zone, 56);
        assert_eq!(p.hemisphere, Hemisphere::South);
        assert!(p.northing > 6_000_000.0 && p.northing < 6_500_000.0);
    }

    #[test]
    fn rejects_polar_latitudes() {
        let utm = Utm::new();
        assert_eq!(
            utm.lonlat_to_utm(10.0, 84.0),
            Err(UtmError::LatitudeOutOfRange { latitude: 84.0 })
        );
        assert!(utm.lonlat_to_utm(10.0, -85.0).is_err());
        assert!(utm.lonlat_to_utm(10.0, 83.9).is_ok());
    }

    #[test]
    fn inverse_round_trip() {
        let utm = Utm::new();
        for &(lon, lat) in &[(-118.0, 34.0), (-119.4, 34.5), (151.2, -33.9), (0.5, 0.001)] {
            let p = utm.lonlat_to_utm(lon, lat).unwrap();
            let (lon2, lat2) = utm
                .utm_to_lonlat(p.easting, p.northing, p.zone, p.hemisphere)
                .unwrap();
            assert_relative_eq!(lon, lon2, epsilon = 1e-9);
            assert_relative_eq!(lat, lat2, epsilon = 1e-9);
        }
    }

    #[test]
    fn invalid_zone() {
        assert_eq!(
            Utm::new().utm_to_lonlat(500_000.0, 0.0, 61, Hemisphere::North),
            Err(UtmError::InvalidZone(61))
        );
    }
}
