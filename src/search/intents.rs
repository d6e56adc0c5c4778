//! Search requests for each flight search intent

use super::error::ValidationError;
use super::models::{DateRange, FlightCriteria, PriceRange};
use crate::fields;
use crate::query::{AggregationRequest, Conjunction, QueryDescriptor, RangeQuery, SearchRequest};

/// Aggregation holding the per-carrier average price buckets
pub const AVG_PRICE_PER_CARRIER: &str = "avg_price_per_carrier";
/// Metric nested in each carrier bucket
pub const AVERAGE_PRICE: &str = "average_price";
/// Aggregation holding the per-destination-country count buckets
pub const FLIGHTS_PER_COUNTRY: &str = "flights_per_country";
/// Scalar aggregation of the average delay
pub const AVG_DELAY_TIME: &str = "avg_delay_time";

fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}

pub fn all_flights(index: &str) -> SearchRequest {
    SearchRequest::new(index, QueryDescriptor::MatchAll)
}

pub fn by_carrier(index: &str, carrier: &str) -> Result<SearchRequest, ValidationError> {
    non_empty("carrier", carrier)?;
    Ok(SearchRequest::new(
        index,
        QueryDescriptor::term(fields::CARRIER, carrier),
    ))
}

pub fn by_origin_city(index: &str, city: &str) -> Result<SearchRequest, ValidationError> {
    non_empty("origin city", city)?;
    Ok(SearchRequest::new(
        index,
        QueryDescriptor::matching(fields::ORIGIN_CITY, city),
    ))
}

pub fn by_price_range(index: &str, range: PriceRange) -> SearchRequest {
    SearchRequest::new(
        index,
        RangeQuery::between(fields::AVG_TICKET_PRICE, range.min(), range.max()).into(),
    )
}

pub fn long_distance(index: &str, min_distance_km: f64) -> Result<SearchRequest, ValidationError> {
    if !min_distance_km.is_finite() {
        return Err(ValidationError::NotFinite { field: "distance" });
    }
    if min_distance_km < 0.0 {
        return Err(ValidationError::Negative {
            field: "distance",
            value: min_distance_km.to_string(),
        });
    }
    Ok(SearchRequest::new(
        index,
        RangeQuery::greater_than(fields::DISTANCE_KM, min_distance_km).into(),
    ))
}

pub fn by_date_range(index: &str, range: DateRange) -> SearchRequest {
    SearchRequest::new(
        index,
        RangeQuery::between(fields::FLIGHT_DATE, range.start(), range.end()).into(),
    )
}

pub fn average_price_per_carrier(index: &str) -> SearchRequest {
    SearchRequest::new(index, QueryDescriptor::MatchAll).aggregate(
        AVG_PRICE_PER_CARRIER,
        AggregationRequest::terms_with_avg(
            fields::CARRIER_KEYWORD,
            AVERAGE_PRICE,
            fields::AVG_TICKET_PRICE,
        ),
    )
}

pub fn flights_per_destination(index: &str) -> SearchRequest {
    SearchRequest::new(index, QueryDescriptor::MatchAll).aggregate(
        FLIGHTS_PER_COUNTRY,
        AggregationRequest::terms(fields::DEST_COUNTRY_KEYWORD),
    )
}

/// Flights delayed strictly more than `min_delay_minutes`, with their average delay
pub fn delayed(index: &str, min_delay_minutes: i64) -> SearchRequest {
    SearchRequest::new(
        index,
        RangeQuery::greater_than(fields::FLIGHT_DELAY_MIN, min_delay_minutes).into(),
    )
    .aggregate(
        AVG_DELAY_TIME,
        AggregationRequest::avg(fields::FLIGHT_DELAY_MIN),
    )
}

pub fn by_criteria(index: &str, criteria: &FlightCriteria) -> Result<SearchRequest, ValidationError> {
    non_empty("carrier", &criteria.carrier)?;
    non_empty("origin city", &criteria.origin_city)?;
    non_empty("destination city", &criteria.dest_city)?;

    let filter = Conjunction::new(QueryDescriptor::term(fields::CARRIER, &criteria.carrier))
        .and(QueryDescriptor::matching(fields::ORIGIN_CITY, &criteria.origin_city))
        .and(QueryDescriptor::matching(fields::DEST_CITY, &criteria.dest_city));

    Ok(SearchRequest::new(index, filter.into()))
}
