//! Geographic plausibility check against Guatemala's bounding envelope.

use crate::types::BoundingBox;

/// Coarse country envelope for Guatemala (decimal degrees, WGS84). This is a
/// bounding-box check, not polygon containment, so points just outside the
/// true border can still pass.
pub const GUATEMALA_ENVELOPE: BoundingBox = BoundingBox {
    min_lon: -93.0,
    max_lon: -88.0,
    min_lat: 13.1,
    max_lat: 18.2,
};

/// True when the pair falls inside Guatemala's envelope. NaN inputs are
/// always invalid.
pub fn is_within_guatemala(latitude: f64, longitude: f64) -> bool {
    GUATEMALA_ENVELOPE.contains(latitude, longitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interior_point_is_valid() {
        assert!(is_within_guatemala(15.0, -90.0));
    }

    #[test]
    fn test_out_of_envelope_latitude_is_invalid() {
        assert!(!is_within_guatemala(5.27, -90.0));
    }

    #[test]
    fn test_out_of_envelope_longitude_is_invalid() {
        assert!(!is_within_guatemala(15.0, -80.0));
    }

    #[test]
    fn test_nan_is_invalid() {
        assert!(!is_within_guatemala(f64::NAN, -90.0));
        assert!(!is_within_guatemala(15.0, f64::NAN));
    }

    #[test]
    fn test_envelope_edges_are_inclusive() {
        assert!(is_within_guatemala(13.1, -93.0));
        assert!(is_within_guatemala(18.2, -88.0));
    }
}
