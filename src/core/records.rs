//! Per-respondent record building: parse, correct, and validate the four
//! corner cells of every survey row.

use crate::core::corrections::ManualCorrectionTable;
use crate::core::diagnostics::{DiagnosticSink, Severity, Stage};
use crate::core::parser::CoordinateTokenParser;
use crate::core::validate::is_within_guatemala;
use crate::types::{MilpaResult, ParcelCorner, ParcelRecord, SurveyRow};

/// Outcome of one cleaning pass over the survey table.
#[derive(Debug)]
pub struct BuildReport {
    pub records: Vec<ParcelRecord>,
    /// Rows touched by the value-correction tables.
    pub rows_fixed: usize,
    /// Rows where all four corners validate after correction.
    pub all_valid_count: usize,
}

/// Orchestrates the cell-level pipeline over the whole survey table.
pub struct ParcelRecordBuilder {
    parser: CoordinateTokenParser,
    corrections: ManualCorrectionTable,
}

impl ParcelRecordBuilder {
    pub fn new(corrections: ManualCorrectionTable) -> MilpaResult<Self> {
        let parser = CoordinateTokenParser::new(&corrections)?;
        Ok(Self { parser, corrections })
    }

    /// Clean every row of the survey table.
    ///
    /// Each corner column is parsed and normalized independently, then the
    /// value-correction tables run across all rows and columns, then every
    /// corner is re-validated. Rows that remain invalid are reported per
    /// corner position but retained; dropping is left to downstream stages.
    pub fn build(&self, rows: &[SurveyRow], sink: &mut DiagnosticSink) -> BuildReport {
        log::info!("Cleaning {} survey rows", rows.len());

        // Column-major parse: latitudes[corner][row], longitudes[corner][row].
        let mut latitudes = vec![vec![f64::NAN; rows.len()]; 4];
        let mut longitudes = vec![vec![f64::NAN; rows.len()]; 4];

        for corner in 0..4 {
            for (row_idx, row) in rows.iter().enumerate() {
                let (lat_token, lon_token) = self.parser.split_coordinates(
                    &row.coordinates[corner],
                    Some(&row.id_phone),
                    sink,
                );
                latitudes[corner][row_idx] = lat_token.parse().unwrap_or(f64::NAN);
                longitudes[corner][row_idx] = lon_token.parse().unwrap_or(f64::NAN);
            }
        }

        let mut rows_fixed = 0;
        for corner in 0..4 {
            let lat_column = format!("latitude_{}", corner + 1);
            let lon_column = format!("longitude_{}", corner + 1);
            rows_fixed += self
                .corrections
                .apply_values(&lat_column, &mut latitudes[corner], sink);
            rows_fixed += self
                .corrections
                .apply_values(&lon_column, &mut longitudes[corner], sink);
        }

        let mut records = Vec::with_capacity(rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            let mut corners = [ParcelCorner::invalid(); 4];
            for corner in 0..4 {
                let latitude = latitudes[corner][row_idx];
                let longitude = longitudes[corner][row_idx];
                corners[corner] = ParcelCorner {
                    latitude,
                    longitude,
                    valid: is_within_guatemala(latitude, longitude),
                };
            }
            records.push(ParcelRecord {
                id_phone: row.id_phone.clone(),
                corners,
                harv_product_qqmz: row.harv_product_qqmz,
            });
        }

        // A corner the correction tables could not rescue is untrustworthy
        // data, not a recovered anomaly.
        for corner in 0..4 {
            for record in records.iter().filter(|r| !r.corners[corner].valid) {
                sink.push(
                    Severity::Error,
                    Stage::Validate,
                    Some(&record.id_phone),
                    format!(
                        "corner {} still invalid after correction: ({}, {})",
                        corner + 1,
                        record.corners[corner].latitude,
                        record.corners[corner].longitude
                    ),
                );
            }
        }

        let all_valid_count = records.iter().filter(|r| r.all_corners_valid()).count();
        sink.push(
            Severity::Info,
            Stage::Validate,
            None,
            format!(
                "{} of {} rows have all four corners valid",
                all_valid_count,
                records.len()
            ),
        );

        BuildReport {
            records,
            rows_fixed,
            all_valid_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, cells: [&str; 4]) -> SurveyRow {
        SurveyRow {
            id_phone: id.to_string(),
            coordinates: cells.map(|c| c.to_string()),
            harv_product_qqmz: None,
        }
    }

    fn builder() -> ParcelRecordBuilder {
        ParcelRecordBuilder::new(ManualCorrectionTable::builtin())
            .expect("Failed to build record builder")
    }

    #[test]
    fn test_clean_row_validates_all_corners() {
        let rows = vec![row(
            "502-0001",
            [
                "14.5, -90.5",
                "14.6 -90.4",
                "1451234, -9041234",
                "14.55,-90.45",
            ],
        )];
        let mut sink = DiagnosticSink::new();
        let report = builder().build(&rows, &mut sink);

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.all_valid_count, 1);
        assert!(report.records[0].all_corners_valid());
        let corner3 = report.records[0].corners[2];
        assert!((corner3.latitude - 14.51234).abs() < 1e-9);
        assert!((corner3.longitude - -90.41234).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_rows_are_retained_and_reported() {
        let rows = vec![
            row("502-0002", ["abcxyz", "14.5, -90.5", "14.5, -90.5", "14.5, -90.5"]),
            row("502-0003", ["14.5, -90.5", "14.5, -90.5", "14.5, -90.5", "5.27, -90.0"]),
        ];
        let mut sink = DiagnosticSink::new();
        let report = builder().build(&rows, &mut sink);

        // Both rows survive even though neither is fully valid.
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.all_valid_count, 0);
        assert!(!report.records[0].corners[0].valid);
        assert!(report.records[0].corners[0].latitude.is_nan());
        assert!(!report.records[1].corners[3].valid);
        assert_eq!(sink.count_for_stage(Stage::Parse), 1);
        assert_eq!(sink.count_for_stage(Stage::Validate), 3);
        // One error per corner that stayed invalid after correction.
        assert_eq!(sink.count_for_severity(Severity::Error), 2);
    }

    #[test]
    fn test_value_correction_rescues_row() {
        // latitude_2 has a known-bad value that only the correction table can
        // place back inside the envelope.
        let rows = vec![row(
            "502-0004",
            [
                "14.5, -90.5",
                "1.6279979, -90.5",
                "14.5, -90.5",
                "14.5, -90.5",
            ],
        )];
        let mut sink = DiagnosticSink::new();
        let report = builder().build(&rows, &mut sink);

        assert_eq!(report.rows_fixed, 1);
        assert_eq!(report.all_valid_count, 1);
        let corner2 = report.records[0].corners[1];
        assert!(corner2.valid);
        assert!((corner2.latitude - 16.279979).abs() < 1e-9);
    }
}
