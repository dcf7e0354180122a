use crate::utm::wrap_radians;
use crate::{convert_datum, AngUnit, CsName, Ellipsoid, LenUnit, LvcsError, Utm, UtmPoint};
use geocam_core::nalgebra::Point3;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Step in radians used to measure the ground distance per radian at the origin.
const SCALE_STEP: f64 = 1.0e-6;

/// A geodetic position. Units depend on the call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GeoPoint {
    pub lon: f64,
    pub lat: f64,
    pub elev: f64,
}

impl GeoPoint {
    pub fn new(lon: f64, lat: f64, elev: f64) -> Self {
        Self { lon, lat, elev }
    }
}

/// A local vertical coordinate system.
///
/// The frame is anchored at a geodetic origin with `x` east, `y` north and `z` up. For the
/// geographic systems (`wgs84`, `nad27n`, `wgs72`) local `x`/`y` are longitude/latitude
/// offsets from the origin divided by a per-axis scale (radians per meter), which is measured
/// on the ellipsoid at the origin unless given explicitly. For `utm` they are offsets on the UTM
/// grid of the origin's zone.
///
/// A final planar rigid transform can be attached: local coordinates are translated by
/// `(-lox, -loy)` and then rotated by `-theta` about the vertical axis.
///
/// Origin angles and `theta` are in the angle unit of the LVCS; the origin elevation, `lox`,
/// `loy` and all local coordinates are in its length unit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Lvcs {
    cs_name: CsName,
    origin_lat: f64,
    origin_lon: f64,
    origin_elev: f64,
    lat_scale: f64,
    lon_scale: f64,
    ang_unit: AngUnit,
    len_unit: LenUnit,
    lox: f64,
    loy: f64,
    theta: f64,
    utm_origin: Option<UtmPoint>,
}

impl Lvcs {
    /// Creates an LVCS at the given origin with scales measured on the ellipsoid and no local
    /// transform.
    pub fn new(
        origin_lat: f64,
        origin_lon: f64,
        origin_elev: f64,
        cs_name: CsName,
        ang_unit: AngUnit,
        len_unit: LenUnit,
    ) -> Result<Self, LvcsError> {
        let mut lvcs = Self {
            cs_name,
            origin_lat,
            origin_lon,
            origin_elev,
            lat_scale: 0.0,
            lon_scale: 0.0,
            ang_unit,
            len_unit,
            lox: 0.0,
            loy: 0.0,
            theta: 0.0,
            utm_origin: None,
        };
        lvcs.update_derived()?;
        Ok(lvcs)
    }

    /// Creates an LVCS whose origin is the center of a latitude/longitude box.
    #[allow(clippy::too_many_arguments)]
    pub fn from_bounds(
        lat_low: f64,
        lon_low: f64,
        lat_high: f64,
        lon_high: f64,
        elev: f64,
        cs_name: CsName,
        ang_unit: AngUnit,
        len_unit: LenUnit,
    ) -> Result<Self, LvcsError> {
        Self::new(
            (lat_low + lat_high) / 2.0,
            (lon_low + lon_high) / 2.0,
            elev,
            cs_name,
            ang_unit,
            len_unit,
        )
    }

    /// Sets explicit scales in radians per meter.
    ///
    /// Passing `(0, 0)` measures them on the ellipsoid instead.
    pub fn with_scale(mut self, lat_scale: f64, lon_scale: f64) -> Result<Self, LvcsError> {
        self.set_scale(lat_scale, lon_scale)?;
        Ok(self)
    }

    /// Attaches the local rigid transform.
    #[must_use]
    pub fn with_transform(mut self, lox: f64, loy: f64, theta: f64) -> Self {
        self.set_transform(lox, loy, theta);
        self
    }

    pub fn set_origin(&mut self, lat: f64, lon: f64, elev: f64) -> Result<(), LvcsError> {
        let previous = *self;
        self.origin_lat = lat;
        self.origin_lon = lon;
        self.origin_elev = elev;
        // Scales measured at the old origin no longer apply.
        self.lat_scale = 0.0;
        self.lon_scale = 0.0;
        self.update_derived().map_err(|e| {
            *self = previous;
            e
        })
    }

    pub fn set_scale(&mut self, lat_scale: f64, lon_scale: f64) -> Result<(), LvcsError> {
        let finite = lat_scale.is_finite() && lon_scale.is_finite();
        let unset = lat_scale == 0.0 && lon_scale == 0.0;
        if !finite || !(unset || (lat_scale > 0.0 && lon_scale > 0.0)) {
            return Err(LvcsError::InvalidScale {
                lat_scale,
                lon_scale,
            });
        }
        self.lat_scale = lat_scale;
        self.lon_scale = lon_scale;
        self.update_derived()
    }

    pub fn set_transform(&mut self, lox: f64, loy: f64, theta: f64) {
        self.lox = lox;
        self.loy = loy;
        self.theta = theta;
    }

    /// The origin as `(lon, lat, elev)` in the LVCS units.
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.origin_lon, self.origin_lat, self.origin_elev)
    }

    /// `(lat_scale, lon_scale)` in radians per meter.
    pub fn scale(&self) -> (f64, f64) {
        (self.lat_scale, self.lon_scale)
    }

    /// `(lox, loy, theta)`.
    pub fn transform(&self) -> (f64, f64, f64) {
        (self.lox, self.loy, self.theta)
    }

    /// The origin on the UTM grid. Only present for `utm` systems.
    pub fn utm_origin(&self) -> Option<UtmPoint> {
        self.utm_origin
    }

    pub fn cs_name(&self) -> CsName {
        self.cs_name
    }

    pub fn len_unit(&self) -> LenUnit {
        self.len_unit
    }

    pub fn ang_unit(&self) -> AngUnit {
        self.ang_unit
    }

    /// Converts a geodetic position into local coordinates.
    ///
    /// `lon`/`lat` are in `ang_unit` and `elev` in `len_unit`, expressed in the datum of
    /// `cs_name`. The result is in the length unit of the LVCS.
    pub fn global_to_local(
        &self,
        lon: f64,
        lat: f64,
        elev: f64,
        cs_name: CsName,
        ang_unit: AngUnit,
        len_unit: LenUnit,
    ) -> Result<Point3<f64>, LvcsError> {
        let (lat, lon, elev) = convert_datum(
            cs_name,
            self.cs_name,
            ang_unit.to_radians(lat),
            ang_unit.to_radians(lon),
            len_unit.to_meters(elev),
        );

        let (x, y) = match self.utm_origin {
            Some(origin) => {
                let p = Utm::new().lonlat_to_utm_in_zone(
                    lon.to_degrees(),
                    lat.to_degrees(),
                    origin.zone,
                    origin.hemisphere,
                )?;
                (p.easting - origin.easting, p.northing - origin.northing)
            }
            None => (
                wrap_radians(lon - self.ang_unit.to_radians(self.origin_lon)) / self.lon_scale,
                (lat - self.ang_unit.to_radians(self.origin_lat)) / self.lat_scale,
            ),
        };
        let z = elev - self.len_unit.to_meters(self.origin_elev);

        let (x, y) = self.apply_local_transform(
            self.len_unit.from_meters(x),
            self.len_unit.from_meters(y),
        );
        Ok(Point3::new(x, y, self.len_unit.from_meters(z)))
    }

    /// Converts local coordinates (in the LVCS length unit) into a geodetic position in the
    /// datum of `cs_name`, with angles in `ang_unit` and elevation in `len_unit`.
    pub fn local_to_global(
        &self,
        x: f64,
        y: f64,
        z: f64,
        cs_name: CsName,
        ang_unit: AngUnit,
        len_unit: LenUnit,
    ) -> Result<GeoPoint, LvcsError> {
        let (x, y) = self.undo_local_transform(x, y);
        let (x, y, z) = (
            self.len_unit.to_meters(x),
            self.len_unit.to_meters(y),
            self.len_unit.to_meters(z),
        );

        let (lat, lon) = match self.utm_origin {
            Some(origin) => {
                let (lon, lat) = Utm::new().utm_to_lonlat(
                    origin.easting + x,
                    origin.northing + y,
                    origin.zone,
                    origin.hemisphere,
                )?;
                (lat.to_radians(), lon.to_radians())
            }
            None => (
                self.ang_unit.to_radians(self.origin_lat) + y * self.lat_scale,
                wrap_radians(self.ang_unit.to_radians(self.origin_lon) + x * self.lon_scale),
            ),
        };
        let elev = self.len_unit.to_meters(self.origin_elev) + z;

        let (lat, lon, elev) = convert_datum(self.cs_name, cs_name, lat, lon, elev);
        Ok(GeoPoint::new(
            ang_unit.from_radians(lon),
            ang_unit.from_radians(lat),
            len_unit.from_meters(elev),
        ))
    }

    fn is_transformed(&self) -> bool {
        self.lox != 0.0 || self.loy != 0.0 || self.theta != 0.0
    }

    fn apply_local_transform(&self, x: f64, y: f64) -> (f64, f64) {
        if !self.is_transformed() {
            return (x, y);
        }
        let (s, c) = self.ang_unit.to_radians(self.theta).sin_cos();
        let (x, y) = (x - self.lox, y - self.loy);
        (c * x + s * y, -s * x + c * y)
    }

    fn undo_local_transform(&self, x: f64, y: f64) -> (f64, f64) {
        if !self.is_transformed() {
            return (x, y);
        }
        let (s, c) = self.ang_unit.to_radians(self.theta).sin_cos();
        (c * x - s * y + self.lox, s * x + c * y + self.loy)
    }

    /// Recomputes the scales (when unset) and the UTM origin from the current origin.
    fn update_derived(&mut self) -> Result<(), LvcsError> {
        if self.lat_scale == 0.0 && self.lon_scale == 0.0 {
            let (lat_scale, lon_scale) = self.measure_scale();
            self.lat_scale = lat_scale;
            self.lon_scale = lon_scale;
        }
        self.utm_origin = match self.cs_name {
            CsName::Utm => {
                // Same degree/radian round trip as global_to_local.
                let lat = self.ang_unit.to_radians(self.origin_lat).to_degrees();
                let lon = self.ang_unit.to_radians(self.origin_lon).to_degrees();
                Some(Utm::new().lonlat_to_utm(lon, lat)?)
            }
            _ => None,
        };
        Ok(())
    }

    /// Radians per meter along latitude and longitude at the origin, measured as geocentric
    /// chords on WGS84.
    fn measure_scale(&self) -> (f64, f64) {
        let (lat, lon, elev) = convert_datum(
            self.cs_name,
            CsName::Wgs84,
            self.ang_unit.to_radians(self.origin_lat),
            self.ang_unit.to_radians(self.origin_lon),
            self.len_unit.to_meters(self.origin_elev),
        );
        let wgs84 = Ellipsoid::WGS84;
        let origin = wgs84.geodetic_to_ecef(lat, lon, elev);
        let north = wgs84.geodetic_to_ecef(lat + SCALE_STEP, lon, elev);
        let east = wgs84.geodetic_to_ecef(lat, lon + SCALE_STEP, elev);
        let lat_scale = SCALE_STEP / (north - origin).norm();
        let lon_distance = (east - origin).norm();
        // At the poles a longitude step does not move; fall back to the latitude scale.
        let lon_scale = if lon_distance > 0.0 {
            SCALE_STEP / lon_distance
        } else {
            lat_scale
        };
        log::trace!(
            "measured LVCS scale at ({}, {}): {} / {} rad per meter",
            self.origin_lat,
            self.origin_lon,
            lat_scale,
            lon_scale
        );
        (lat_scale, lon_scale)
    }

    pub(crate) fn from_parts(
        cs_name: CsName,
        len_unit: LenUnit,
        ang_unit: AngUnit,
        origin: [f64; 3],
        scale: [f64; 2],
        transform: [f64; 3],
    ) -> Result<Self, LvcsError> {
        let [origin_lat, origin_lon, origin_elev] = origin;
        let [lox, loy, theta] = transform;
        Self::new(
            origin_lat,
            origin_lon,
            origin_elev,
            cs_name,
            ang_unit,
            len_unit,
        )?
        .with_scale(scale[0], scale[1])
        .map(|lvcs| lvcs.with_transform(lox, loy, theta))
    }
}

impl Default for Lvcs {
    fn default() -> Self {
        Self {
            cs_name: CsName::Wgs84,
            origin_lat: 0.0,
            origin_lon: 0.0,
            origin_elev: 0.0,
            // Measured at the equator on WGS84.
            lat_scale: 1.0 / 6_335_439.327,
            lon_scale: 1.0 / 6_378_137.0,
            ang_unit: AngUnit::Deg,
            len_unit: LenUnit::Meters,
            lox: 0.0,
            loy: 0.0,
            theta: 0.0,
            utm_origin: None,
        }
    }
}
