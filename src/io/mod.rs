//! Survey ingestion and artifact export

pub mod export;
pub mod survey;

pub use export::{write_cleaned_table, write_geometry_collection, write_yield_crosswalk};
pub use survey::{SurveyReader, HEADER_ROW_OFFSET};
