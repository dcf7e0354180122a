use crate::CameraError;
use core::fmt;
use geocam_core::nalgebra::{Matrix2, Point2, Point3, Vector2};
use geocam_core::{Camera, ProjectionError};
use geocam_geodesy::{Hemisphere, Utm};
use std::fs;
use std::path::Path;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The map coordinates the affine transform of a [`GeoCamera`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum MapProjection {
    /// WGS84 longitude and latitude in degrees.
    #[default]
    Geographic,
    /// WGS84 UTM easting and northing in meters.
    Utm { zone: u8, hemisphere: Hemisphere },
}

/// Georeferencing tags of a raster, as supplied by an image loader.
///
/// Loaders implement this for whatever metadata they decode (GeoTIFF tags, a GDAL dataset, a
/// sidecar file). Only the affine relation between pixels and map coordinates is used.
pub trait RasterGeoreference {
    fn projection(&self) -> MapProjection;

    /// The six coefficients in GDAL order, when the raster provides them directly.
    fn geotransform(&self) -> Option<[f64; 6]> {
        None
    }

    /// A tie point `(pixel, map)` (GeoTIFF `ModelTiepointTag`).
    fn tie_point(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        None
    }

    /// Map units per pixel along `u` and `v` (GeoTIFF `ModelPixelScaleTag`).
    fn pixel_scale(&self) -> Option<Vector2<f64>> {
        None
    }
}

/// A camera for georeferenced (orthorectified) rasters.
///
/// Pixels relate to map coordinates through a 2d affine transform
///
/// ```text
/// X = a u + b v + c
/// Y = d u + e v + f
/// ```
///
/// where `(u, v) = (0, 0)` is the upper left corner of the upper left pixel, and `(X, Y)` are
/// either longitude/latitude or UTM coordinates depending on the [`MapProjection`].
///
/// ```
/// use geocam_camera::{GeoCamera, MapProjection};
///
/// let camera = GeoCamera::new([0.001, 0.0, -118.0, 0.0, -0.001, 34.0], MapProjection::Geographic).unwrap();
/// let (lon, lat) = camera.img_to_global(500.0, 250.0).unwrap();
/// assert!((lon + 117.5).abs() < 1e-12 && (lat - 33.75).abs() < 1e-12);
/// let (u, v) = camera.global_to_img(lon, lat).unwrap();
/// assert!((u - 500.0).abs() < 1e-6 && (v - 250.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GeoCamera {
    affine: [f64; 6],
    projection: MapProjection,
    inverse: Matrix2<f64>,
}

impl GeoCamera {
    /// Creates the camera from `[a, b, c, d, e, f]`.
    pub fn new(affine: [f64; 6], projection: MapProjection) -> Result<Self, CameraError> {
        let [a, b, _, d, e, _] = affine;
        let linear = Matrix2::new(a, b, d, e);
        let determinant = linear.determinant();
        let magnitude = (a * e).abs() + (b * d).abs();
        if affine.iter().any(|n| !n.is_finite())
            || !(determinant.abs() > f64::EPSILON * magnitude)
        {
            return Err(CameraError::SingularTransform { determinant });
        }
        if let MapProjection::Utm { zone, .. } = projection {
            if !(1..=60).contains(&zone) {
                return Err(CameraError::InvalidMatrix(format!(
                    "UTM zone {} is not in 1..=60",
                    zone
                )));
            }
        }
        let inverse = linear
            .try_inverse()
            .ok_or(CameraError::SingularTransform { determinant })?;
        Ok(Self {
            affine,
            projection,
            inverse,
        })
    }

    /// Creates the camera from a GDAL geotransform
    /// `[c, a, b, f, d, e]` (origin x, pixel width, row rotation, origin y, column rotation,
    /// pixel height).
    pub fn from_geotransform(
        geotransform: [f64; 6],
        projection: MapProjection,
    ) -> Result<Self, CameraError> {
        let [c, a, b, f, d, e] = geotransform;
        Self::new([a, b, c, d, e, f], projection)
    }

    /// Creates the camera from a GeoTIFF tie point and pixel scale. Map `Y` grows as `v`
    /// decreases.
    pub fn from_tie_point(
        pixel: Point2<f64>,
        map: Point2<f64>,
        pixel_scale: Vector2<f64>,
        projection: MapProjection,
    ) -> Result<Self, CameraError> {
        Self::new(
            [
                pixel_scale.x,
                0.0,
                map.x - pixel.x * pixel_scale.x,
                0.0,
                -pixel_scale.y,
                map.y + pixel.y * pixel_scale.y,
            ],
            projection,
        )
    }

    /// Creates the camera from the georeferencing of a raster.
    pub fn from_raster(raster: &impl RasterGeoreference) -> Result<Self, CameraError> {
        let projection = raster.projection();
        if let Some(geotransform) = raster.geotransform() {
            return Self::from_geotransform(geotransform, projection);
        }
        match (raster.tie_point(), raster.pixel_scale()) {
            (Some((pixel, map)), Some(scale)) => Self::from_tie_point(pixel, map, scale, projection),
            _ => Err(CameraError::InvalidMatrix(
                "raster has neither a geotransform nor a tie point with a pixel scale".into(),
            )),
        }
    }

    /// Reads an ESRI world file (`.tfw`, `.jgw`, ...).
    ///
    /// The six lines hold `a, d, b, e, c, f` with `(c, f)` at the center of the upper left
    /// pixel; they are moved to its corner.
    pub fn read_world_file(
        path: impl AsRef<Path>,
        projection: MapProjection,
    ) -> Result<Self, CameraError> {
        let path = path.as_ref();
        log::debug!("reading world file {}", path.display());
        Self::parse_world_file(&fs::read_to_string(path)?, projection)
    }

    pub fn parse_world_file(text: &str, projection: MapProjection) -> Result<Self, CameraError> {
        let mut values = [0.0; 6];
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());
        for value in values.iter_mut() {
            let (index, line) = lines.next().ok_or_else(|| {
                CameraError::parse(text.lines().count(), "world file needs six values")
            })?;
            *value = line.trim().parse().map_err(|e| {
                CameraError::parse(index + 1, format!("`{}` is not a number: {}", line.trim(), e))
            })?;
        }
        if let Some((index, _)) = lines.next() {
            return Err(CameraError::parse(index + 1, "world file has more than six values"));
        }
        let [a, d, b, e, c, f] = values;
        Self::new(
            [a, b, c - 0.5 * (a + b), d, e, f - 0.5 * (d + e)],
            projection,
        )
    }

    /// `[a, b, c, d, e, f]`.
    pub fn affine(&self) -> [f64; 6] {
        self.affine
    }

    pub fn projection(&self) -> MapProjection {
        self.projection
    }

    /// Map distance covered by one pixel step along `u` and along `v`.
    pub fn pixel_scale(&self) -> Vector2<f64> {
        let [a, b, _, d, e, _] = self.affine;
        Vector2::new(a.hypot(d), b.hypot(e))
    }

    /// Map coordinates of a pixel position.
    pub fn img_to_map(&self, u: f64, v: f64) -> (f64, f64) {
        let [a, b, c, d, e, f] = self.affine;
        (a * u + b * v + c, d * u + e * v + f)
    }

    /// Pixel position of map coordinates.
    pub fn map_to_img(&self, x: f64, y: f64) -> (f64, f64) {
        let [_, _, c, _, _, f] = self.affine;
        let uv = self.inverse * Vector2::new(x - c, y - f);
        (uv.x, uv.y)
    }

    /// `(longitude, latitude)` in degrees of a pixel position.
    pub fn img_to_global(&self, u: f64, v: f64) -> Result<(f64, f64), ProjectionError> {
        let (x, y) = self.img_to_map(u, v);
        match self.projection {
            MapProjection::Geographic => Ok((x, y)),
            MapProjection::Utm { zone, hemisphere } => Utm::new()
                .utm_to_lonlat(x, y, zone, hemisphere)
                .map_err(|e| ProjectionError::Domain(e.to_string())),
        }
    }

    /// Pixel position of `(longitude, latitude)` in degrees.
    pub fn global_to_img(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjectionError> {
        let (x, y) = match self.projection {
            MapProjection::Geographic => (lon, lat),
            MapProjection::Utm { zone, hemisphere } => {
                let p = Utm::new()
                    .lonlat_to_utm_in_zone(lon, lat, zone, hemisphere)
                    .map_err(|e| ProjectionError::Domain(e.to_string()))?;
                (p.easting, p.northing)
            }
        };
        let (u, v) = self.map_to_img(x, y);
        if u.is_finite() && v.is_finite() {
            Ok((u, v))
        } else {
            Err(ProjectionError::NonFinite)
        }
    }
}

impl Camera for GeoCamera {
    /// Projects `(longitude, latitude, elevation)`. The elevation is ignored.
    fn project(&self, point: Point3<f64>) -> Result<Point2<f64>, ProjectionError> {
        self.global_to_img(point.x, point.y)
            .map(|(u, v)| Point2::new(u, v))
    }
}

impl fmt::Display for MapProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapProjection::Geographic => write!(f, "geographic"),
            MapProjection::Utm { zone, hemisphere } => {
                let band = match hemisphere {
                    Hemisphere::North => 'N',
                    Hemisphere::South => 'S',
                };
                write!(f, "utm {}{}", zone, band)
            }
        }
    }
}

impl fmt::Display for GeoCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.affine;
        writeln!(f, "projection: {}", self.projection)?;
        writeln!(f, "X = {} u + {} v + {}", a, b, c)?;
        writeln!(f, "Y = {} u + {} v + {}", d, e, g)
    }
}
