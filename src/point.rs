/// A map click reported by the UI layer, in the UI's (latitude, longitude)
/// convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickPoint {
    pub lat: f64,
    pub lon: f64,
}

impl ClickPoint {
    pub fn new(lat: f64, lon: f64) -> Result<Self, String> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err("Latitude values must be between -90 and 90".to_string());
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err("Longitude values must be between -180 and 180".to_string());
        }

        Ok(ClickPoint { lat, lon })
    }

    // The imagery backend expects (x, y) = (lon, lat). Swapping the UI order
    // here is the single place the conversion happens.
    pub fn to_xy(self) -> (f64, f64) {
        (self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_click_point_coords_are_within_ranges() {
        let valid = ClickPoint::new(37.03, -119.26);
        assert!(valid.is_ok());

        let invalid_lat = ClickPoint::new(-100.0, 0.0);
        assert!(invalid_lat.is_err());

        let invalid_lat2 = ClickPoint::new(100.0, 0.0);
        assert!(invalid_lat2.is_err());

        let invalid_lon = ClickPoint::new(0.0, -200.0);
        assert!(invalid_lon.is_err());

        let invalid_lon2 = ClickPoint::new(0.0, 200.0);
        assert!(invalid_lon2.is_err());
    }

    #[test]
    fn test_to_xy_swaps_lat_lon() {
        // A UI click at (lat=10, lon=20) must reach the backend as (x=20, y=10)
        let point = ClickPoint::new(10.0, 20.0).unwrap();
        assert_eq!(point.to_xy(), (20.0, 10.0));
    }
}
