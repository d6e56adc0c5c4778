//! Operation names and typed search parameters

use super::error::ValidationError;
use chrono::NaiveDate;
use serde::Serialize;

/// Named search operations offered by the query service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    AllFlights,
    FlightsByCarrier,
    FlightsByOriginCity,
    FlightsByPriceRange,
    LongDistanceFlights,
    FlightsByDateRange,
    AveragePricePerCarrier,
    FlightsPerDestination,
    DelayedFlights,
    FlightsByMultipleCriteria,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AllFlights => "all_flights",
            Self::FlightsByCarrier => "flights_by_carrier",
            Self::FlightsByOriginCity => "flights_by_origin_city",
            Self::FlightsByPriceRange => "flights_by_price_range",
            Self::LongDistanceFlights => "long_distance_flights",
            Self::FlightsByDateRange => "flights_by_date_range",
            Self::AveragePricePerCarrier => "average_price_per_carrier",
            Self::FlightsPerDestination => "flights_per_destination",
            Self::DelayedFlights => "delayed_flights",
            Self::FlightsByMultipleCriteria => "flights_by_multiple_criteria",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive ticket price range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    min: f64,
    max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ValidationError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ValidationError::NotFinite { field: "price" });
        }
        if min > max {
            return Err(ValidationError::InvertedRange {
                field: "price",
                min: min.to_string(),
                max: max.to_string(),
            });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Inclusive flight date range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvertedRange {
                field: "date",
                min: start.to_string(),
                max: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }
}

/// Criteria that must all hold for a flight to match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightCriteria {
    pub carrier: String,
    pub origin_city: String,
    pub dest_city: String,
}

impl FlightCriteria {
    pub fn new(
        carrier: impl Into<String>,
        origin_city: impl Into<String>,
        dest_city: impl Into<String>,
    ) -> Self {
        Self {
            carrier: carrier.into(),
            origin_city: origin_city.into(),
            dest_city: dest_city.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_range_validation() {
        assert!(PriceRange::new(200.0, 400.0).is_ok());
        assert!(PriceRange::new(300.0, 300.0).is_ok());
        assert_eq!(
            PriceRange::new(400.0, 200.0),
            Err(ValidationError::InvertedRange {
                field: "price",
                min: "400".to_string(),
                max: "200".to_string(),
            })
        );
        assert_eq!(
            PriceRange::new(f64::NAN, 200.0),
            Err(ValidationError::NotFinite { field: "price" })
        );
    }

    #[test]
    fn test_date_range_validation() {
        let jan1 = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let jan31 = NaiveDate::from_ymd_opt(2022, 1, 31).unwrap();

        let range = DateRange::new(jan1, jan31).unwrap();
        assert_eq!(range.start(), jan1);
        assert_eq!(range.end(), jan31);

        let err = DateRange::new(jan31, jan1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid date range: 2022-01-31 is greater than 2022-01-01"
        );
    }

    #[test]
    fn test_operation_names() {
        assert_eq!(Operation::DelayedFlights.to_string(), "delayed_flights");
        assert_eq!(
            serde_json::to_value(Operation::FlightsByMultipleCriteria).unwrap(),
            "flights_by_multiple_criteria"
        );
    }
}
