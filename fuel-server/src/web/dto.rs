//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, DomainError, RegionId};
use crate::pipeline::TripCostResult;

/// Longitude range covering the 50 states (west of the Aleutian
/// antimeridian crossing).
const USA_LON: std::ops::RangeInclusive<f64> = -179.2..=-66.9;

/// Latitude range covering the 50 states.
const USA_LAT: std::ops::RangeInclusive<f64> = 18.9..=71.4;

/// Request to estimate the fuel cost of a road trip.
#[derive(Debug, Deserialize)]
pub struct GasRequest {
    /// Stops as `"lon,lat;lon,lat;..."`, in travel order
    pub coords: String,

    /// Travel month (1-12)
    pub month: u32,

    /// Travel day of month
    pub day: u32,

    /// Travel year
    pub year: i32,

    /// Vehicle miles per gallon (defaults to the server default)
    pub mpg: Option<f64>,
}

/// A validated trip request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripQuery {
    pub waypoints: Vec<Coordinate>,
    pub date: NaiveDate,
    pub mpg: f64,
}

/// Why a request was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid coords: {0}")]
    Coords(#[from] DomainError),

    #[error("coordinate {0} is outside the United States")]
    OutsideUsa(Coordinate),

    #[error("invalid date {year}-{month:02}-{day:02}")]
    Date { year: i32, month: u32, day: u32 },

    #[error("mpg must be a positive number, got {0}")]
    Mpg(f64),
}

impl GasRequest {
    /// Validate the request, filling in `default_mpg` when `mpg` is absent.
    pub fn validate(&self, default_mpg: f64) -> Result<TripQuery, RequestError> {
        let waypoints = Coordinate::parse_waypoints(&self.coords)?;

        if let Some(outside) = waypoints
            .iter()
            .find(|c| !USA_LON.contains(&c.lon()) || !USA_LAT.contains(&c.lat()))
        {
            return Err(RequestError::OutsideUsa(*outside));
        }

        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            RequestError::Date {
                year: self.year,
                month: self.month,
                day: self.day,
            },
        )?;

        let mpg = self.mpg.unwrap_or(default_mpg);
        if !(mpg.is_finite() && mpg > 0.0) {
            return Err(RequestError::Mpg(mpg));
        }

        Ok(TripQuery {
            waypoints,
            date,
            mpg,
        })
    }
}

/// Estimated trip cost.
#[derive(Debug, Serialize)]
pub struct GasResponse {
    /// Total fuel cost, rounded to cents
    pub prediction: f64,

    /// Distance that could not be priced
    pub unresolved_meters: f64,

    /// Whether every segment was priced
    pub complete: bool,

    /// Per-region breakdown in travel order
    pub segments: Vec<SegmentResult>,
}

/// One region segment of the trip.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    /// Region code (e.g. "1a", "5", "unresolved")
    pub region: RegionId,

    /// Region name
    pub region_name: &'static str,

    /// Distance in meters
    pub distance_meters: f64,

    /// Fuel cost, absent for unpriced segments
    pub cost: Option<f64>,
}

impl GasResponse {
    pub fn from_result(result: &TripCostResult) -> Self {
        Self {
            prediction: result.total_cost,
            unresolved_meters: result.unresolved_meters,
            complete: result.is_complete(),
            segments: result
                .segments
                .iter()
                .map(|s| SegmentResult {
                    region: s.region,
                    region_name: s.region.name(),
                    distance_meters: s.distance_meters,
                    cost: s.cost,
                })
                .collect(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(coords: &str, month: u32, day: u32, mpg: Option<f64>) -> GasRequest {
        GasRequest {
            coords: coords.to_string(),
            month,
            day,
            year: 2021,
            mpg,
        }
    }

    const SF_LA: &str = "-122.42,37.77;-118.24,34.05";

    #[test]
    fn parses_request_body() {
        let req: GasRequest = serde_json::from_str(
            r#"{"coords": "-122.42,37.77;-118.24,34.05", "month": 7, "day": 13, "year": 2021}"#,
        )
        .unwrap();

        assert_eq!(req.month, 7);
        assert_eq!(req.mpg, None);
    }

    #[test]
    fn valid_request() {
        let query = request(SF_LA, 7, 13, Some(35.0)).validate(27.0).unwrap();

        assert_eq!(query.waypoints.len(), 2);
        assert_eq!(query.date, NaiveDate::from_ymd_opt(2021, 7, 13).unwrap());
        assert_eq!(query.mpg, 35.0);
    }

    #[test]
    fn mpg_defaults() {
        let query = request(SF_LA, 7, 13, None).validate(27.0).unwrap();
        assert_eq!(query.mpg, 27.0);
    }

    #[test]
    fn rejects_bad_mpg() {
        assert_eq!(
            request(SF_LA, 7, 13, Some(0.0)).validate(27.0),
            Err(RequestError::Mpg(0.0))
        );
        assert!(request(SF_LA, 7, 13, Some(-3.0)).validate(27.0).is_err());
    }

    #[test]
    fn rejects_impossible_dates() {
        assert_eq!(
            request(SF_LA, 2, 30, None).validate(27.0),
            Err(RequestError::Date {
                year: 2021,
                month: 2,
                day: 30
            })
        );
        assert!(request(SF_LA, 13, 1, None).validate(27.0).is_err());
        assert!(request(SF_LA, 0, 1, None).validate(27.0).is_err());
    }

    #[test]
    fn rejects_single_stop() {
        assert_eq!(
            request("-122.42,37.77", 7, 13, None).validate(27.0),
            Err(RequestError::Coords(DomainError::TooFewWaypoints(1)))
        );
    }

    #[test]
    fn rejects_points_outside_usa() {
        // London
        let err = request("-122.42,37.77;-0.12,51.5", 7, 13, None)
            .validate(27.0)
            .unwrap_err();
        assert!(matches!(err, RequestError::OutsideUsa(_)));
    }

    #[test]
    fn partial_result_is_flagged() {
        let result = TripCostResult {
            total_cost: 4.0,
            segments: vec![
                crate::pipeline::SegmentCost {
                    region: RegionId::WestCoast,
                    distance_meters: 1000.0,
                    cost: Some(4.0),
                },
                crate::pipeline::SegmentCost {
                    region: RegionId::Unresolved,
                    distance_meters: 500.0,
                    cost: None,
                },
            ],
            unresolved_meters: 500.0,
        };

        let json = serde_json::to_value(GasResponse::from_result(&result)).unwrap();
        assert_eq!(json["complete"], false);
        assert_eq!(json["unresolved_meters"], 500.0);
        assert!(json["segments"][1]["cost"].is_null());
    }

    #[test]
    fn response_from_result() {
        let result = TripCostResult {
            total_cost: 46.0,
            segments: vec![crate::pipeline::SegmentCost {
                region: RegionId::WestCoast,
                distance_meters: 1000.0,
                cost: Some(46.0),
            }],
            unresolved_meters: 0.0,
        };

        let json = serde_json::to_value(GasResponse::from_result(&result)).unwrap();
        assert_eq!(json["prediction"], 46.0);
        assert_eq!(json["complete"], true);
        assert_eq!(json["segments"][0]["region"], "5");
        assert_eq!(json["segments"][0]["region_name"], "West Coast");
    }
}
