//! Geographic coordinates.

use std::fmt;

use super::error::DomainError;

/// A (longitude, latitude) pair in WGS84 degrees.
///
/// Longitude is within [-180, 180] and latitude within [-90, 90]; this is
/// guaranteed by construction.
///
/// # Examples
///
/// ```
/// use fuel_server::domain::Coordinate;
///
/// let sf = Coordinate::new(-122.42, 37.77).unwrap();
/// assert_eq!(sf.to_string(), "-122.42,37.77");
///
/// assert!(Coordinate::new(-190.0, 37.77).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(lon: f64, lat: f64) -> Result<Self, DomainError> {
        let invalid = |reason| DomainError::InvalidCoordinate { lon, lat, reason };

        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude out of range"));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude out of range"));
        }

        Ok(Self { lon, lat })
    }

    /// Parse a `"lon,lat"` pair.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let malformed = || DomainError::MalformedCoordinate(s.to_string());

        let (lon, lat) = s.trim().split_once(',').ok_or_else(malformed)?;
        let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;

        Self::new(lon, lat)
    }

    /// Parse a `"lon,lat;lon,lat;..."` waypoint list.
    ///
    /// Requires at least two waypoints. A trailing `;` is tolerated.
    pub fn parse_waypoints(s: &str) -> Result<Vec<Self>, DomainError> {
        let waypoints = s
            .split(';')
            .filter(|part| !part.trim().is_empty())
            .map(Self::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if waypoints.len() < 2 {
            return Err(DomainError::TooFewWaypoints(waypoints.len()));
        }

        Ok(waypoints)
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lon, self.lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert!(Coordinate::new(-180.0, -90.0).is_ok());
        assert!(Coordinate::new(180.0, 90.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(Coordinate::new(180.1, 0.0).is_err());
        assert!(Coordinate::new(0.0, -90.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn parse_pair() {
        let c = Coordinate::parse(" -104.99, 39.74 ").unwrap();
        assert_eq!(c.lon(), -104.99);
        assert_eq!(c.lat(), 39.74);

        assert!(matches!(
            Coordinate::parse("-104.99"),
            Err(DomainError::MalformedCoordinate(_))
        ));
        assert!(matches!(
            Coordinate::parse("abc,39.74"),
            Err(DomainError::MalformedCoordinate(_))
        ));
    }

    #[test]
    fn parse_waypoint_list() {
        let wps = Coordinate::parse_waypoints("-122.42,37.77;-118.24,34.05;-115.14,36.17;").unwrap();
        assert_eq!(wps.len(), 3);
        assert_eq!(wps[2], Coordinate::new(-115.14, 36.17).unwrap());
    }

    #[test]
    fn parse_waypoints_needs_two() {
        assert_eq!(
            Coordinate::parse_waypoints("-122.42,37.77"),
            Err(DomainError::TooFewWaypoints(1))
        );
        assert_eq!(
            Coordinate::parse_waypoints(""),
            Err(DomainError::TooFewWaypoints(0))
        );
    }
}
