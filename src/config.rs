//! Pipeline configuration.
//!
//! All file locations are resolved once at process start into an explicit
//! struct that stages receive by reference. Failing to resolve the data root
//! is the one fatal condition in the pipeline: guessing a path would corrupt
//! downstream artifacts, so the constructor refuses instead.

use std::path::{Path, PathBuf};

use crate::core::polygon::{PolygonStrategy, MAX_PARCEL_AREA_SQM};
use crate::types::{MilpaError, MilpaResult};

/// Everything the pipeline needs to know about its environment.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Survey table CSV.
    pub survey_path: PathBuf,
    /// Optional yield sheet for the yield-prediction variant.
    pub yield_path: Option<PathBuf>,
    /// Directory receiving the cleaned table, geometry collection, and
    /// crosswalk.
    pub output_dir: PathBuf,
    /// Banner rows above the survey header.
    pub header_offset: usize,
    /// Polygon construction strategy.
    pub strategy: PolygonStrategy,
    /// Outlier threshold in square meters.
    pub max_area_sqm: f64,
    /// Optional correction-table overrides (string table, value table); the
    /// builtin set is used when absent.
    pub correction_tables: Option<(PathBuf, PathBuf)>,
}

impl PipelineConfig {
    /// Build a config from an explicit survey path and output directory,
    /// with the standard defaults for everything else.
    pub fn new<P: AsRef<Path>>(survey_path: P, output_dir: P) -> Self {
        Self {
            survey_path: survey_path.as_ref().to_path_buf(),
            yield_path: None,
            output_dir: output_dir.as_ref().to_path_buf(),
            header_offset: crate::io::HEADER_ROW_OFFSET,
            strategy: PolygonStrategy::default(),
            max_area_sqm: MAX_PARCEL_AREA_SQM,
            correction_tables: None,
        }
    }

    /// Resolve the standard project layout under a data root.
    ///
    /// Layout: `<root>/survey/parcel_survey.csv`, optionally
    /// `<root>/survey/yield_report.csv`, artifacts under `<root>/output`.
    /// A missing root is fatal.
    pub fn resolve<P: AsRef<Path>>(data_root: P) -> MilpaResult<Self> {
        let root = data_root.as_ref();
        if !root.is_dir() {
            return Err(MilpaError::Config(format!(
                "unknown deployment environment: data root {} does not exist",
                root.display()
            )));
        }

        let survey_path = root.join("survey").join("parcel_survey.csv");
        if !survey_path.is_file() {
            return Err(MilpaError::Config(format!(
                "survey table not found at {}",
                survey_path.display()
            )));
        }
        let yield_path = root.join("survey").join("yield_report.csv");
        let yield_path = yield_path.is_file().then_some(yield_path);

        log::info!(
            "Resolved data root {} (yield sheet: {})",
            root.display(),
            yield_path.is_some()
        );

        Ok(Self {
            yield_path,
            output_dir: root.join("output"),
            ..Self::new(&survey_path, &root.to_path_buf())
        })
    }

    pub fn cleaned_table_path(&self) -> PathBuf {
        self.output_dir.join("cleaned_coordinates.csv")
    }

    pub fn geometry_path(&self) -> PathBuf {
        self.output_dir.join("parcels.geojson")
    }

    pub fn crosswalk_path(&self) -> PathBuf {
        self.output_dir.join("yield_crosswalk.csv")
    }
}
