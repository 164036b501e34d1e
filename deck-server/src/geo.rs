//! Great-circle distance between the caller and a person.

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build from optional parts; `None` unless both are present.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Some(Self::new(latitude?, longitude?))
    }

    /// Haversine distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Coordinates) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

/// Round a distance to one decimal place.
pub fn round_km(distance: f64) -> f64 {
    (distance * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jakarta_to_bandung() {
        let jakarta = Coordinates::new(-6.2088, 106.8456);
        let bandung = Coordinates::new(-6.9175, 107.6191);

        assert_eq!(round_km(jakarta.distance_km(&bandung)), 116.2);
        assert_eq!(
            round_km(jakarta.distance_km(&bandung)),
            round_km(bandung.distance_km(&jakarta))
        );
    }

    #[test]
    fn one_degree_on_the_equator() {
        let d = Coordinates::new(0.0, 0.0).distance_km(&Coordinates::new(0.0, 1.0));
        assert_eq!(round_km(d), 111.2);
    }

    #[test]
    fn same_point_is_zero() {
        let here = Coordinates::new(-7.2575, 112.7521);
        assert_eq!(round_km(here.distance_km(&here)), 0.0);
    }

    #[test]
    fn from_parts_needs_both() {
        assert_eq!(Coordinates::from_parts(Some(1.0), None), None);
        assert_eq!(Coordinates::from_parts(None, Some(1.0)), None);
        assert_eq!(
            Coordinates::from_parts(Some(1.0), Some(2.0)),
            Some(Coordinates::new(1.0, 2.0))
        );
    }
}
