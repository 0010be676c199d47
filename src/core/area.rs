//! Ground-area computation via a per-parcel local projection.
//!
//! Degree-based polygon area is not metrically meaningful, and a single
//! country-wide projection distorts parcels far from its center. Each parcel
//! instead gets its own azimuthal equidistant projection centered on the
//! parcel itself, and the planar area of the projected ring is taken.

use geo::{Area, Centroid, Coord, LineString, Polygon};

use crate::core::diagnostics::{DiagnosticSink, Severity, Stage};

/// Mean Earth radius in meters for the spherical projection.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Compute a polygon's ground area in square meters.
///
/// The projection is centered at (`reference_lat`, centroid longitude).
/// Returns a finite positive area for any valid simple polygon; a degenerate
/// projection yields NaN with a diagnostic naming the geometry's centroid.
/// The caller keeps the parcel either way.
pub fn area_sqm(
    polygon: &Polygon<f64>,
    reference_lat: f64,
    parcel_id: &str,
    sink: &mut DiagnosticSink,
) -> f64 {
    // geo's centroid asserts on non-finite coordinates, so degenerate rings
    // have to be caught before it runs.
    let ring_is_finite = polygon
        .exterior()
        .0
        .iter()
        .all(|c| c.x.is_finite() && c.y.is_finite());
    if !ring_is_finite || !reference_lat.is_finite() {
        sink.push(
            Severity::Warning,
            Stage::Area,
            Some(parcel_id),
            "polygon has non-finite coordinates, area set to NaN".to_string(),
        );
        return f64::NAN;
    }

    let centroid = match polygon.centroid() {
        Some(c) => c,
        None => {
            sink.push(
                Severity::Warning,
                Stage::Area,
                Some(parcel_id),
                "polygon has no centroid, area set to NaN".to_string(),
            );
            return f64::NAN;
        }
    };

    let projected = project_ring(polygon.exterior(), reference_lat, centroid.x());
    let area = match projected {
        Some(ring) => Polygon::new(ring, vec![]).unsigned_area(),
        None => f64::NAN,
    };

    if !area.is_finite() {
        sink.push(
            Severity::Warning,
            Stage::Area,
            Some(parcel_id),
            format!(
                "degenerate area for polygon with centroid ({}, {})",
                centroid.y(),
                centroid.x()
            ),
        );
        return f64::NAN;
    }
    area
}

/// Forward azimuthal equidistant projection of a geographic ring onto the
/// local tangent plane at (`center_lat`, `center_lon`). Returns None when any
/// projected vertex is non-finite.
fn project_ring(ring: &LineString<f64>, center_lat: f64, center_lon: f64) -> Option<LineString<f64>> {
    let phi0 = center_lat.to_radians();
    let (sin_phi0, cos_phi0) = phi0.sin_cos();

    let mut projected = Vec::with_capacity(ring.0.len());
    for coord in &ring.0 {
        let phi = coord.y.to_radians();
        let dlambda = (coord.x - center_lon).to_radians();
        let (sin_phi, cos_phi) = phi.sin_cos();

        let cos_c = (sin_phi0 * sin_phi + cos_phi0 * cos_phi * dlambda.cos()).clamp(-1.0, 1.0);
        let c = cos_c.acos();
        // At the projection center c -> 0 and c/sin(c) -> 1.
        let k = if c.abs() < 1e-12 { 1.0 } else { c / c.sin() };

        let x = EARTH_RADIUS_M * k * cos_phi * dlambda.sin();
        let y = EARTH_RADIUS_M * k * (cos_phi0 * sin_phi - sin_phi0 * cos_phi * dlambda.cos());
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        projected.push(Coord { x, y });
    }
    Some(LineString::from(projected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::Rect;

    fn rect_polygon(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Polygon<f64> {
        Rect::new(
            Coord { x: lon_min, y: lat_min },
            Coord { x: lon_max, y: lat_max },
        )
        .to_polygon()
    }

    #[test]
    fn test_area_of_small_rectangle_matches_spherical_expectation() {
        // 0.001 deg x 0.001 deg near lat 14.15.
        let polygon = rect_polygon(14.15, 14.151, -90.5, -90.499);
        let mut sink = DiagnosticSink::new();
        let area = area_sqm(&polygon, 14.1505, "test", &mut sink);

        let meters_per_deg = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        let expected = (0.001 * meters_per_deg) * (0.001 * meters_per_deg * 14.1505f64.to_radians().cos());
        assert_relative_eq!(area, expected, max_relative = 0.01);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_area_is_positive_regardless_of_ring_orientation() {
        let polygon = rect_polygon(15.0, 15.01, -91.0, -90.99);
        let reversed = Polygon::new(
            LineString::from(polygon.exterior().0.iter().rev().cloned().collect::<Vec<_>>()),
            vec![],
        );
        let mut sink = DiagnosticSink::new();
        let a = area_sqm(&polygon, 15.005, "fwd", &mut sink);
        let b = area_sqm(&reversed, 15.005, "rev", &mut sink);
        assert!(a > 0.0);
        assert_relative_eq!(a, b, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_polygon_yields_nan_with_diagnostic() {
        let polygon = rect_polygon(f64::NAN, f64::NAN, -90.5, -90.499);
        let mut sink = DiagnosticSink::new();
        let area = area_sqm(&polygon, 14.15, "502-0005", &mut sink);
        assert!(area.is_nan());
        assert_eq!(sink.count_for_stage(Stage::Area), 1);
        assert_eq!(sink.entries()[0].row_id.as_deref(), Some("502-0005"));
    }

    #[test]
    fn test_non_finite_reference_latitude_yields_nan() {
        let polygon = rect_polygon(14.5, 14.51, -90.5, -90.49);
        let mut sink = DiagnosticSink::new();
        let area = area_sqm(&polygon, f64::NAN, "502-0006", &mut sink);
        assert!(area.is_nan());
        assert_eq!(sink.count_for_stage(Stage::Area), 1);
    }

    #[test]
    fn test_zero_extent_polygon_reports_zero_area() {
        let polygon = rect_polygon(14.5, 14.5, -90.5, -90.5);
        let mut sink = DiagnosticSink::new();
        let area = area_sqm(&polygon, 14.5, "point", &mut sink);
        assert_eq!(area, 0.0);
    }
}
