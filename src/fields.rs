//! Field names of the flight sample index

pub const ORIGIN_CITY: &str = "OriginCityName";
pub const DEST_CITY: &str = "DestCityName";
pub const CARRIER: &str = "Carrier";
pub const AVG_TICKET_PRICE: &str = "AvgTicketPrice";
pub const DISTANCE_KM: &str = "DistanceKilometers";
pub const FLIGHT_DATE: &str = "FlightDate";
pub const FLIGHT_DELAY_MIN: &str = "FlightDelayMin";

// Exact-value subfields used for terms aggregations
pub const CARRIER_KEYWORD: &str = "Carrier.keyword";
pub const DEST_COUNTRY_KEYWORD: &str = "DestCountry.keyword";

/// Default index holding the flight records
pub const DEFAULT_INDEX: &str = "kibana_sample_data_flights";
