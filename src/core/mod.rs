//! Core coordinate-cleaning and parcel-geometry modules

pub mod area;
pub mod corrections;
pub mod diagnostics;
pub mod parser;
pub mod polygon;
pub mod records;
pub mod validate;

// Re-export main types
pub use area::{area_sqm, EARTH_RADIUS_M};
pub use corrections::{ManualCorrectionTable, StringCorrection, ValueCorrection, VALUE_MATCH_TOLERANCE};
pub use diagnostics::{Diagnostic, DiagnosticSink, Severity, Stage};
pub use parser::{normalize_decimal, CoordinateTokenParser};
pub use polygon::{derive_polygon, filter_outliers, PolygonStrategy, MAX_PARCEL_AREA_SQM};
pub use records::{BuildReport, ParcelRecordBuilder};
pub use validate::{is_within_guatemala, GUATEMALA_ENVELOPE};
