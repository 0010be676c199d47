//! Manual correction tables for known-bad survey entries.
//!
//! These are point patches for specific records observed in the field data,
//! not a general error-correction strategy. The tables are a versioned data
//! asset: they can be loaded from CSV mapping files so corrections stay
//! auditable and extensible without code changes, and they must be re-curated
//! whenever the input dataset changes.

use std::collections::HashMap;
use std::path::Path;

use approx::relative_eq;
use serde::{Deserialize, Serialize};

use crate::core::diagnostics::{DiagnosticSink, Severity, Stage};
use crate::types::MilpaResult;

/// Relative tolerance for matching incorrect float values. The incorrect
/// values themselves came out of flawed parsing and may carry floating-point
/// noise, so exact equality would miss them.
pub const VALUE_MATCH_TOLERANCE: f64 = 1e-5;

/// Exact known-bad raw cell and its replacement, applied before parsing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StringCorrection {
    pub raw: String,
    pub corrected: String,
}

/// Known-bad parsed value in one output column and its replacement, applied
/// after all four corner columns have been parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCorrection {
    pub column: String,
    pub incorrect: f64,
    pub corrected: f64,
}

/// Fixed lookup of known-bad survey inputs.
#[derive(Debug, Clone, Default)]
pub struct ManualCorrectionTable {
    strings: HashMap<String, String>,
    values: Vec<ValueCorrection>,
}

impl ManualCorrectionTable {
    /// Correction set curated for the shipped survey wave.
    pub fn builtin() -> Self {
        let strings = [
            // Commas used as decimal marks inside a comma-delimited pair.
            ("16,3870407, -89,7345351", "16.3870407, -89.7345351"),
            ("15,4721633, -91,8749715", "15.4721633, -91.8749715"),
            // No separator and a mangled longitude sign.
            ("14.141996-90-147208", "14.141996, -90.147208"),
            // Genuine decimal points with a period also used as the field
            // separator; the structural patterns cannot disambiguate this.
            ("16.0891253.-89.9234176", "16.0891253, -89.9234176"),
        ];
        let values = vec![
            ValueCorrection {
                column: "latitude_2".to_string(),
                incorrect: 1.6279979,
                corrected: 16.279979,
            },
            ValueCorrection {
                column: "longitude_1".to_string(),
                incorrect: -9.0415112,
                corrected: -90.415112,
            },
            ValueCorrection {
                column: "latitude_3".to_string(),
                incorrect: 141.41996,
                corrected: 14.141996,
            },
        ];
        Self {
            strings: strings
                .iter()
                .map(|(raw, fixed)| (raw.to_string(), fixed.to_string()))
                .collect(),
            values,
        }
    }

    /// Load both tables from CSV mapping files.
    ///
    /// `strings_path` columns: `raw,corrected`. `values_path` columns:
    /// `column,incorrect,corrected`.
    pub fn from_csv_files<P: AsRef<Path>>(strings_path: P, values_path: P) -> MilpaResult<Self> {
        log::info!(
            "Loading correction tables from {} and {}",
            strings_path.as_ref().display(),
            values_path.as_ref().display()
        );

        let mut strings = HashMap::new();
        let mut reader = csv::Reader::from_path(strings_path.as_ref())?;
        for result in reader.deserialize() {
            let entry: StringCorrection = result?;
            strings.insert(entry.raw, entry.corrected);
        }

        let mut values = Vec::new();
        let mut reader = csv::Reader::from_path(values_path.as_ref())?;
        for result in reader.deserialize() {
            let entry: ValueCorrection = result?;
            values.push(entry);
        }

        log::info!(
            "Loaded {} string corrections and {} value corrections",
            strings.len(),
            values.len()
        );
        Ok(Self { strings, values })
    }

    /// Exact-match lookup on the trimmed raw cell.
    pub fn lookup_string(&self, raw: &str) -> Option<&str> {
        self.strings.get(raw.trim()).map(|s| s.as_str())
    }

    pub fn string_corrections(&self) -> impl Iterator<Item = (&str, &str)> {
        self.strings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn value_corrections(&self) -> &[ValueCorrection] {
        &self.values
    }

    /// Apply every value correction registered for `column` across the column
    /// slice. Matching is tolerance-based; NaN entries never match. Returns
    /// the number of rows fixed and logs it per correction.
    pub fn apply_values(&self, column: &str, values: &mut [f64], sink: &mut DiagnosticSink) -> usize {
        let mut fixed = 0;
        for correction in self.values.iter().filter(|c| c.column == column) {
            let mut hits = 0;
            for value in values.iter_mut() {
                if relative_eq!(*value, correction.incorrect, max_relative = VALUE_MATCH_TOLERANCE) {
                    *value = correction.corrected;
                    hits += 1;
                }
            }
            sink.push(
                Severity::Info,
                Stage::Correct,
                None,
                format!(
                    "column {}: {} -> {} fixed {} row(s)",
                    column, correction.incorrect, correction.corrected, hits
                ),
            );
            fixed += hits;
        }
        fixed
    }
}
