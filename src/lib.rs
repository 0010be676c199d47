//! milpa: coordinate cleaning and parcel geometry for smallholder yield surveys
//!
//! This library takes noisy, free-text GPS corner coordinates from a field
//! survey of Guatemalan farm parcels and deterministically produces
//! validated polygons with metric ground areas, ready for satellite-imagery
//! extraction and yield modeling downstream.

pub mod config;
pub mod core;
pub mod io;
pub mod pipeline;
pub mod types;

// Re-export main types and functions for easier access
pub use config::PipelineConfig;
pub use crate::core::{
    CoordinateTokenParser, DiagnosticSink, ManualCorrectionTable, ParcelRecordBuilder,
    PolygonStrategy, Severity, Stage,
};
pub use pipeline::{run_pipeline, PipelineSummary};
pub use types::{
    BoundingBox, MilpaError, MilpaResult, ParcelCorner, ParcelGeometry, ParcelRecord, SurveyRow,
};
