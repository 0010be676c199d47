use milpa::core::{
    filter_outliers, is_within_guatemala, normalize_decimal, CoordinateTokenParser,
    DiagnosticSink, ManualCorrectionTable, Severity, Stage,
};
use milpa::core::polygon::{derive_polygon, PolygonStrategy, MAX_PARCEL_AREA_SQM};
use milpa::types::{ParcelCorner, ParcelGeometry, ParcelRecord};

fn parser() -> CoordinateTokenParser {
    CoordinateTokenParser::new(&ManualCorrectionTable::builtin())
        .expect("Failed to build parser")
}

#[test]
fn test_well_formed_cell_round_trips_unchanged() {
    let mut sink = DiagnosticSink::new();
    let (lat, lon) = parser().split_coordinates("14.5, -90.5", None, &mut sink);
    assert_eq!((lat.as_str(), lon.as_str()), ("14.5", "-90.5"));
    assert!(sink.is_empty());
}

#[test]
fn test_manual_fix_comma_decimal_marks() {
    let mut sink = DiagnosticSink::new();
    let (lat, lon) = parser().split_coordinates("16,3870407, -89,7345351", None, &mut sink);
    assert_eq!(lat, "16.3870407");
    assert_eq!(lon, "-89.7345351");
}

#[test]
fn test_manual_fix_glued_double_dash() {
    let mut sink = DiagnosticSink::new();
    let (lat, lon) = parser().split_coordinates("14.141996-90-147208", None, &mut sink);
    assert_eq!(lat, "14.141996");
    assert_eq!(lon, "-90.147208");
}

#[test]
fn test_every_table_entry_parses_to_the_documented_pair() {
    let table = ManualCorrectionTable::builtin();
    let parser = parser();
    let mut sink = DiagnosticSink::new();
    for (raw, corrected) in table.string_corrections() {
        let from_raw = parser.split_coordinates(raw, None, &mut sink);
        let from_fixed = parser.split_coordinates(corrected, None, &mut sink);
        assert_eq!(from_raw, from_fixed, "mismatch for table entry {:?}", raw);
    }
    assert!(sink.is_empty());
}

#[test]
fn test_decimal_normalizer_cases() {
    assert_eq!(normalize_decimal("1632620"), "16.32620");
    assert_eq!(normalize_decimal("-16352620"), "-16.352620");
    assert_eq!(normalize_decimal("3.14"), "3.14");
}

#[test]
fn test_unparseable_cell_is_soft_failure() {
    let mut sink = DiagnosticSink::new();
    let (lat, lon) = parser().split_coordinates("abcxyz", Some("502-0001"), &mut sink);
    assert_eq!((lat.as_str(), lon.as_str()), ("", ""));
    assert_eq!(sink.count_for_stage(Stage::Parse), 1);
    assert_eq!(sink.count_for_severity(Severity::Warning), 1);
}

#[test]
fn test_guatemala_envelope() {
    assert!(is_within_guatemala(15.0, -90.0));
    assert!(!is_within_guatemala(5.27, -90.0));
    assert!(!is_within_guatemala(f64::NAN, -90.0));
}

#[test]
fn test_bounding_box_polygon_from_corner_extremes() {
    use geo::CoordsIter;

    let corner = |lat, lon| ParcelCorner {
        latitude: lat,
        longitude: lon,
        valid: true,
    };
    let record = ParcelRecord {
        id_phone: "502-0001".to_string(),
        corners: [
            corner(14.1, -90.5),
            corner(14.2, -90.4),
            corner(14.15, -90.45),
            corner(14.18, -90.48),
        ],
        harv_product_qqmz: None,
    };

    let polygon = derive_polygon(&record, PolygonStrategy::BoundingBox);
    let lats: Vec<f64> = polygon.exterior_coords_iter().map(|c| c.y).collect();
    let lons: Vec<f64> = polygon.exterior_coords_iter().map(|c| c.x).collect();
    assert_eq!(lats.iter().cloned().fold(f64::INFINITY, f64::min), 14.1);
    assert_eq!(lats.iter().cloned().fold(f64::NEG_INFINITY, f64::max), 14.2);
    assert_eq!(lons.iter().cloned().fold(f64::INFINITY, f64::min), -90.5);
    assert_eq!(lons.iter().cloned().fold(f64::NEG_INFINITY, f64::max), -90.4);
}

#[test]
fn test_outlier_threshold() {
    let corner = |lat, lon| ParcelCorner {
        latitude: lat,
        longitude: lon,
        valid: true,
    };
    let record = ParcelRecord {
        id_phone: "502-0001".to_string(),
        corners: [
            corner(14.1, -90.5),
            corner(14.2, -90.4),
            corner(14.15, -90.45),
            corner(14.18, -90.48),
        ],
        harv_product_qqmz: None,
    };
    let polygon = derive_polygon(&record, PolygonStrategy::BoundingBox);
    let parcel = |id: &str, area| ParcelGeometry {
        id: id.to_string(),
        polygon: polygon.clone(),
        area_sqm: area,
        harv_product_qqmz: None,
    };

    let mut sink = DiagnosticSink::new();
    let kept = filter_outliers(
        vec![parcel("big", 600_000.0), parcel("ok", 100_000.0)],
        MAX_PARCEL_AREA_SQM,
        &mut sink,
    );
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].id, "ok");
    assert_eq!(sink.count_for_stage(Stage::Filter), 1);
}
