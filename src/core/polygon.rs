//! Parcel polygon derivation and area-based outlier filtering.

use geo::{Coord, LineString, Polygon, Rect};

use crate::core::diagnostics::{DiagnosticSink, Severity, Stage};
use crate::types::{ParcelGeometry, ParcelRecord};

/// Maximum plausible parcel area for the smallholder-farm domain. Anything
/// larger is survey noise, not a field.
pub const MAX_PARCEL_AREA_SQM: f64 = 500_000.0;

/// How the four surveyed corners become a polygon.
///
/// The survey does not record a reliable winding order for the corners, so
/// the active strategy is the enclosing bounding box. `OrderedCorners` keeps
/// the quadrilateral-as-reported construction available for datasets where
/// corner order can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PolygonStrategy {
    #[default]
    BoundingBox,
    OrderedCorners,
}

/// Derive a parcel polygon from a record's four corners.
///
/// Callers are expected to pass records whose corners all validated; NaN
/// corners produce a degenerate polygon that the area stage flags.
pub fn derive_polygon(record: &ParcelRecord, strategy: PolygonStrategy) -> Polygon<f64> {
    match strategy {
        PolygonStrategy::BoundingBox => {
            let lat_min = record.corners.iter().map(|c| c.latitude).fold(f64::INFINITY, f64::min);
            let lat_max = record.corners.iter().map(|c| c.latitude).fold(f64::NEG_INFINITY, f64::max);
            let lon_min = record.corners.iter().map(|c| c.longitude).fold(f64::INFINITY, f64::min);
            let lon_max = record.corners.iter().map(|c| c.longitude).fold(f64::NEG_INFINITY, f64::max);
            Rect::new(
                Coord { x: lon_min, y: lat_min },
                Coord { x: lon_max, y: lat_max },
            )
            .to_polygon()
        }
        PolygonStrategy::OrderedCorners => {
            let ring: Vec<Coord<f64>> = record
                .corners
                .iter()
                .map(|c| Coord { x: c.longitude, y: c.latitude })
                .collect();
            Polygon::new(LineString::from(ring), vec![])
        }
    }
}

/// Drop parcels whose computed area is implausible for a smallholder field.
///
/// Parcels with a non-finite area (degenerate projection upstream) are also
/// removed here: they cannot satisfy the post-filter area invariant. The
/// removed count is reported.
pub fn filter_outliers(
    parcels: Vec<ParcelGeometry>,
    max_area_sqm: f64,
    sink: &mut DiagnosticSink,
) -> Vec<ParcelGeometry> {
    let before = parcels.len();
    let kept: Vec<ParcelGeometry> = parcels
        .into_iter()
        .filter(|p| {
            let keep = p.area_sqm.is_finite() && p.area_sqm < max_area_sqm;
            if !keep {
                sink.push(
                    Severity::Warning,
                    Stage::Filter,
                    Some(&p.id),
                    format!("parcel dropped as outlier: area_sqm = {}", p.area_sqm),
                );
            }
            keep
        })
        .collect();
    let removed = before - kept.len();
    log::info!("Outlier filter removed {} of {} parcels", removed, before);
    kept
}
