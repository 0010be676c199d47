//! Artifact writers for downstream collaborators.
//!
//! Three artifacts leave this crate: the cleaned coordinate table (CSV), the
//! parcel geometry collection (GeoJSON, WGS84), and the id-to-yield
//! crosswalk (CSV) used to re-join labels after geometry-only processing.

use std::io::Write;
use std::path::Path;

use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};

use crate::types::{MilpaResult, ParcelGeometry, ParcelRecord};

/// Write the cleaned coordinate table.
///
/// Columns: `id_phone`, `latitude_1..4`, `longitude_1..4`,
/// `valid_coordinate_1..4`. Unparsed (NaN) coordinates are written as empty
/// cells.
pub fn write_cleaned_table<P: AsRef<Path>>(path: P, records: &[ParcelRecord]) -> MilpaResult<()> {
    log::info!(
        "Writing cleaned coordinate table ({} rows) to: {}",
        records.len(),
        path.as_ref().display()
    );

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    let mut header = vec!["id_phone".to_string()];
    for i in 1..=4 {
        header.push(format!("latitude_{}", i));
    }
    for i in 1..=4 {
        header.push(format!("longitude_{}", i));
    }
    for i in 1..=4 {
        header.push(format!("valid_coordinate_{}", i));
    }
    writer.write_record(&header)?;

    for record in records {
        let mut fields = vec![record.id_phone.clone()];
        fields.extend(record.corners.iter().map(|c| format_coordinate(c.latitude)));
        fields.extend(record.corners.iter().map(|c| format_coordinate(c.longitude)));
        fields.extend(record.corners.iter().map(|c| c.valid.to_string()));
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the parcel geometry collection as a GeoJSON FeatureCollection with
/// an explicit WGS84 CRS member. Features carry `area_sqm` and, when joined,
/// `harv_product_qqmz`.
pub fn write_geometry_collection<P: AsRef<Path>>(
    path: P,
    parcels: &[ParcelGeometry],
) -> MilpaResult<()> {
    log::info!(
        "Writing {} parcel geometries to: {}",
        parcels.len(),
        path.as_ref().display()
    );

    let features = parcels
        .iter()
        .map(|parcel| {
            let mut properties = JsonObject::new();
            properties.insert("id".to_string(), JsonValue::from(parcel.id.clone()));
            properties.insert("area_sqm".to_string(), JsonValue::from(parcel.area_sqm));
            if let Some(value) = parcel.harv_product_qqmz {
                properties.insert("harv_product_qqmz".to_string(), JsonValue::from(value));
            }
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&parcel.polygon))),
                id: Some(geojson::feature::Id::String(parcel.id.clone())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(crs_member()),
    };
    let geojson = GeoJson::from(collection);
    let file = std::fs::File::create(path.as_ref())?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer(&mut writer, &geojson)?;
    writer.flush()?;
    Ok(())
}

/// Write the two-column id-to-yield crosswalk for parcels that carry a
/// joined yield value.
pub fn write_yield_crosswalk<P: AsRef<Path>>(path: P, parcels: &[ParcelGeometry]) -> MilpaResult<()> {
    log::info!("Writing yield crosswalk to: {}", path.as_ref().display());

    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(["id", "harv_product_qqmz"])?;
    for parcel in parcels {
        if let Some(value) = parcel.harv_product_qqmz {
            writer.write_record([parcel.id.as_str(), value.to_string().as_str()])?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn format_coordinate(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        value.to_string()
    }
}

fn crs_member() -> JsonObject {
    let mut crs_properties = JsonObject::new();
    crs_properties.insert("name".to_string(), JsonValue::from("EPSG:4326"));
    let mut crs = JsonObject::new();
    crs.insert("type".to_string(), JsonValue::from("name"));
    crs.insert("properties".to_string(), JsonValue::from(crs_properties));
    let mut members = JsonObject::new();
    members.insert("crs".to_string(), JsonValue::from(crs));
    members
}
