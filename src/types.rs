use serde::{Deserialize, Serialize};

/// One raw survey row: a respondent id, four free-text corner cells, and the
/// optionally joined harvest report (quintales per manzana).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyRow {
    pub id_phone: String,
    pub coordinates: [String; 4],
    pub harv_product_qqmz: Option<f64>,
}

/// A single parcel corner after parsing and validation.
///
/// `latitude`/`longitude` are NaN when the source cell could not be parsed;
/// `valid` is the Guatemala-envelope check, re-evaluated after manual
/// corrections have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParcelCorner {
    pub latitude: f64,
    pub longitude: f64,
    pub valid: bool,
}

impl ParcelCorner {
    pub fn invalid() -> Self {
        Self {
            latitude: f64::NAN,
            longitude: f64::NAN,
            valid: false,
        }
    }
}

/// Cleaned per-respondent record: exactly four corners plus the optional
/// yield label joined by `id_phone`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelRecord {
    pub id_phone: String,
    pub corners: [ParcelCorner; 4],
    pub harv_product_qqmz: Option<f64>,
}

impl ParcelRecord {
    /// True when every corner passed the envelope check.
    pub fn all_corners_valid(&self) -> bool {
        self.corners.iter().all(|c| c.valid)
    }
}

/// Derived parcel geometry with its computed ground area.
#[derive(Debug, Clone)]
pub struct ParcelGeometry {
    pub id: String,
    pub polygon: geo::Polygon<f64>,
    pub area_sqm: f64,
    pub harv_product_qqmz: Option<f64>,
}

/// Geographic bounding box (decimal degrees, WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Inclusive containment check. NaN coordinates are never contained.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lon
            && longitude <= self.max_lon
    }
}

/// Error types for the parcel pipeline
#[derive(Debug, thiserror::Error)]
pub enum MilpaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] serde_json::Error),
}

/// Result type for pipeline operations
pub type MilpaResult<T> = Result<T, MilpaError>;
