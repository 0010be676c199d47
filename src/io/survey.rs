//! Survey spreadsheet reader.
//!
//! The field survey arrives as a CSV export with a fixed number of banner
//! rows above the real header. The reader locates the expected columns by
//! name rather than position, so column reordering between export waves does
//! not break ingestion.

use std::collections::HashMap;
use std::path::Path;

use crate::types::{MilpaError, MilpaResult, SurveyRow};

/// Banner rows above the header in the standard survey export.
pub const HEADER_ROW_OFFSET: usize = 1;

const COORDINATE_COLUMNS: [&str; 4] = [
    "id_coordinates_1",
    "id_coordinates_2",
    "id_coordinates_3",
    "id_coordinates_4",
];

/// Reader for the survey table and its companion yield sheet.
pub struct SurveyReader;

impl SurveyReader {
    /// Read the survey table, skipping `header_offset` banner rows before the
    /// header. Blank rows are skipped; every other row is kept verbatim for
    /// the cleaning stage.
    pub fn read_survey<P: AsRef<Path>>(path: P, header_offset: usize) -> MilpaResult<Vec<SurveyRow>> {
        log::info!("Reading survey table from: {}", path.as_ref().display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path.as_ref())?;
        let mut records = reader.records();

        for _ in 0..header_offset {
            records.next().transpose()?;
        }
        let header = records.next().transpose()?.ok_or_else(|| {
            MilpaError::InvalidFormat("survey file has no header row".to_string())
        })?;

        let id_idx = find_column(&header, "id_phone")?;
        let mut coord_idx = [0usize; 4];
        for (i, name) in COORDINATE_COLUMNS.iter().enumerate() {
            coord_idx[i] = find_column(&header, name)?;
        }

        let mut rows = Vec::new();
        for result in records {
            let record = result?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
            rows.push(SurveyRow {
                id_phone: field(id_idx).trim().to_string(),
                coordinates: coord_idx.map(field),
                harv_product_qqmz: None,
            });
        }

        log::info!("Read {} survey rows", rows.len());
        Ok(rows)
    }

    /// Read the yield sheet into an `id_phone` -> yield map. Rows with an
    /// unparseable yield value are skipped with a warning.
    pub fn read_yield_sheet<P: AsRef<Path>>(path: P) -> MilpaResult<HashMap<String, f64>> {
        log::info!("Reading yield sheet from: {}", path.as_ref().display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path.as_ref())?;
        let mut records = reader.records();

        let header = records.next().transpose()?.ok_or_else(|| {
            MilpaError::InvalidFormat("yield sheet has no header row".to_string())
        })?;
        let id_idx = find_column(&header, "id_phone")?;
        let yield_idx = find_column(&header, "harv_product_qqmz")?;

        let mut yields = HashMap::new();
        for result in records {
            let record = result?;
            let id = record.get(id_idx).unwrap_or("").trim().to_string();
            let raw_yield = record.get(yield_idx).unwrap_or("").trim();
            if id.is_empty() || raw_yield.is_empty() {
                continue;
            }
            match raw_yield.parse::<f64>() {
                Ok(value) => {
                    yields.insert(id, value);
                }
                Err(_) => {
                    log::warn!("Skipping unparseable yield value {:?} for id {}", raw_yield, id);
                }
            }
        }

        log::info!("Read {} yield reports", yields.len());
        Ok(yields)
    }

    /// Join yield reports onto survey rows by `id_phone`.
    pub fn join_yield(rows: &mut [SurveyRow], yields: &HashMap<String, f64>) {
        let mut matched = 0;
        for row in rows.iter_mut() {
            if let Some(value) = yields.get(&row.id_phone) {
                row.harv_product_qqmz = Some(*value);
                matched += 1;
            }
        }
        log::info!("Joined yield values onto {} of {} rows", matched, rows.len());
    }
}

fn find_column(header: &csv::StringRecord, name: &str) -> MilpaResult<usize> {
    header
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| MilpaError::InvalidFormat(format!("missing survey column: {}", name)))
}
