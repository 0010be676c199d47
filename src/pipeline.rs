//! End-to-end batch pipeline: survey table in, parcel geometry out.

use crate::config::PipelineConfig;
use crate::core::area::area_sqm;
use crate::core::corrections::ManualCorrectionTable;
use crate::core::diagnostics::DiagnosticSink;
use crate::core::polygon::{derive_polygon, filter_outliers};
use crate::core::records::ParcelRecordBuilder;
use crate::io::survey::SurveyReader;
use crate::io::{write_cleaned_table, write_geometry_collection, write_yield_crosswalk};
use crate::types::{MilpaResult, ParcelGeometry};

/// Per-stage counts reported to the operator after a run.
#[derive(Debug, Clone, Default)]
pub struct PipelineSummary {
    pub rows_read: usize,
    pub rows_fixed_by_corrections: usize,
    pub rows_all_corners_valid: usize,
    pub parcels_derived: usize,
    pub degenerate_areas: usize,
    pub outliers_dropped: usize,
    pub parcels_written: usize,
}

/// Run the full cleaning and geometry pipeline over one survey batch.
///
/// The batch always runs to completion; recoverable anomalies land in `sink`
/// and the summary counts. Only configuration/IO failures abort.
pub fn run_pipeline(
    config: &PipelineConfig,
    sink: &mut DiagnosticSink,
) -> MilpaResult<PipelineSummary> {
    let mut summary = PipelineSummary::default();

    let mut rows = SurveyReader::read_survey(&config.survey_path, config.header_offset)?;
    summary.rows_read = rows.len();

    if let Some(yield_path) = &config.yield_path {
        let yields = SurveyReader::read_yield_sheet(yield_path)?;
        SurveyReader::join_yield(&mut rows, &yields);
    }

    let corrections = match &config.correction_tables {
        Some((strings_path, values_path)) => {
            ManualCorrectionTable::from_csv_files(strings_path, values_path)?
        }
        None => ManualCorrectionTable::builtin(),
    };

    let builder = ParcelRecordBuilder::new(corrections)?;
    let report = builder.build(&rows, sink);
    summary.rows_fixed_by_corrections = report.rows_fixed;
    summary.rows_all_corners_valid = report.all_valid_count;

    std::fs::create_dir_all(&config.output_dir)?;
    write_cleaned_table(config.cleaned_table_path(), &report.records)?;

    // Geometry only for fully valid rows; invalid rows stay in the cleaned
    // table for the caller to inspect.
    let mut parcels = Vec::new();
    for record in report.records.iter().filter(|r| r.all_corners_valid()) {
        let polygon = derive_polygon(record, config.strategy);
        let reference_lat = record.corners.iter().map(|c| c.latitude).sum::<f64>() / 4.0;
        let area = area_sqm(&polygon, reference_lat, &record.id_phone, sink);
        if area.is_nan() {
            summary.degenerate_areas += 1;
        }
        parcels.push(ParcelGeometry {
            id: record.id_phone.clone(),
            polygon,
            area_sqm: area,
            harv_product_qqmz: record.harv_product_qqmz,
        });
    }
    summary.parcels_derived = parcels.len();

    let kept = filter_outliers(parcels, config.max_area_sqm, sink);
    summary.outliers_dropped = summary.parcels_derived - kept.len();
    summary.parcels_written = kept.len();

    write_geometry_collection(config.geometry_path(), &kept)?;
    write_yield_crosswalk(config.crosswalk_path(), &kept)?;

    log::info!(
        "Pipeline complete: {} rows read, {} fixed, {} all-valid, {} parcels written ({} outliers dropped, {} degenerate areas)",
        summary.rows_read,
        summary.rows_fixed_by_corrections,
        summary.rows_all_corners_valid,
        summary.parcels_written,
        summary.outliers_dropped,
        summary.degenerate_areas
    );
    Ok(summary)
}
