use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UtmError {
    /// UTM is only defined between 84°S and 84°N.
    #[error("latitude {latitude}° is outside the UTM domain (|lat| < 84°)")]
    LatitudeOutOfRange { latitude: f64 },
    #[error("UTM zone {0} is not in 1..=60")]
    InvalidZone(u8),
    #[error("UTM conversion received or produced a non-finite coordinate")]
    NonFinite,
}

#[derive(Debug, Error)]
pub enum LvcsError {
    #[error("failed to access LVCS file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed LVCS encoding: {0}")]
    Parse(String),
    #[error("unknown coordinate system name `{0}`")]
    UnknownCsName(String),
    #[error("unknown unit `{0}`")]
    UnknownUnit(String),
    #[error("invalid LVCS scale ({lat_scale}, {lon_scale}), expected both positive or both zero")]
    InvalidScale { lat_scale: f64, lon_scale: f64 },
    #[error(transparent)]
    Utm(#[from] UtmError),
}
