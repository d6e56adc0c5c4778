//! Query service: builds, runs, and decodes flight searches

use super::error::{QueryError, QueryErrorKind};
use super::intents;
use super::models::{DateRange, FlightCriteria, Operation, PriceRange};
use crate::metrics::Metrics;
use crate::network::{GatewayError, SearchGateway};
use crate::query::{compile, SearchRequest};
use crate::results::{extract, SearchResult};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Entry point for every named flight search.
///
/// Holds no per-request state, so one instance serves the startup batch and
/// all concurrent HTTP requests.
pub struct QueryService {
    /// Shared connection to the search engine
    gateway: Arc<dyn SearchGateway>,
    /// Index all operations target
    index: String,
    /// Deadline applied to each gateway call
    default_timeout: Duration,
    /// Upper bound for per-call deadlines
    max_timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl QueryService {
    /// Create a new query service
    pub fn new(gateway: Arc<dyn SearchGateway>, index: impl Into<String>) -> Self {
        Self {
            gateway,
            index: index.into(),
            default_timeout: Duration::from_secs(10),
            max_timeout: Duration::from_secs(30),
            metrics: None,
        }
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Set maximum timeout
    pub fn with_max_timeout(mut self, timeout: Duration) -> Self {
        self.max_timeout = timeout;
        self
    }

    /// Record per-operation metrics
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    pub async fn all_flights(&self) -> Result<SearchResult, QueryError> {
        self.run(Operation::AllFlights, intents::all_flights(&self.index))
            .await
    }

    pub async fn flights_by_carrier(&self, carrier: &str) -> Result<SearchResult, QueryError> {
        let op = Operation::FlightsByCarrier;
        let request = intents::by_carrier(&self.index, carrier).map_err(|e| QueryError::new(op, e))?;
        self.run(op, request).await
    }

    pub async fn flights_by_origin_city(&self, city: &str) -> Result<SearchResult, QueryError> {
        let op = Operation::FlightsByOriginCity;
        let request = intents::by_origin_city(&self.index, city).map_err(|e| QueryError::new(op, e))?;
        self.run(op, request).await
    }

    /// Flights with `min_price <= AvgTicketPrice <= max_price`
    pub async fn flights_by_price_range(
        &self,
        min_price: f64,
        max_price: f64,
    ) -> Result<SearchResult, QueryError> {
        let op = Operation::FlightsByPriceRange;
        let range = PriceRange::new(min_price, max_price).map_err(|e| QueryError::new(op, e))?;
        self.run(op, intents::by_price_range(&self.index, range))
            .await
    }

    /// Flights longer than `min_distance_km`
    pub async fn long_distance_flights(
        &self,
        min_distance_km: f64,
    ) -> Result<SearchResult, QueryError> {
        let op = Operation::LongDistanceFlights;
        let request =
            intents::long_distance(&self.index, min_distance_km).map_err(|e| QueryError::new(op, e))?;
        self.run(op, request).await
    }

    /// Flights dated within `start..=end`
    pub async fn flights_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SearchResult, QueryError> {
        let op = Operation::FlightsByDateRange;
        let range = DateRange::new(start, end).map_err(|e| QueryError::new(op, e))?;
        self.run(op, intents::by_date_range(&self.index, range))
            .await
    }

    pub async fn average_price_per_carrier(&self) -> Result<SearchResult, QueryError> {
        self.run(
            Operation::AveragePricePerCarrier,
            intents::average_price_per_carrier(&self.index),
        )
        .await
    }

    pub async fn flights_per_destination(&self) -> Result<SearchResult, QueryError> {
        self.run(
            Operation::FlightsPerDestination,
            intents::flights_per_destination(&self.index),
        )
        .await
    }

    /// Average delay of flights delayed more than `min_delay_minutes`
    pub async fn delayed_flights(&self, min_delay_minutes: i64) -> Result<SearchResult, QueryError> {
        self.run(
            Operation::DelayedFlights,
            intents::delayed(&self.index, min_delay_minutes),
        )
        .await
    }

    pub async fn flights_by_multiple_criteria(
        &self,
        criteria: &FlightCriteria,
    ) -> Result<SearchResult, QueryError> {
        let op = Operation::FlightsByMultipleCriteria;
        let request = intents::by_criteria(&self.index, criteria).map_err(|e| QueryError::new(op, e))?;
        self.run(op, request).await
    }

    /// Run a prepared request under the default deadline
    pub async fn run(
        &self,
        operation: Operation,
        request: SearchRequest,
    ) -> Result<SearchResult, QueryError> {
        self.run_with_timeout(operation, request, self.default_timeout)
            .await
    }

    /// Run a prepared request under `deadline`, capped at the maximum timeout.
    ///
    /// Dropping the returned future abandons the in-flight gateway call.
    pub async fn run_with_timeout(
        &self,
        operation: Operation,
        request: SearchRequest,
        deadline: Duration,
    ) -> Result<SearchResult, QueryError> {
        let name = operation.as_str();
        let deadline = deadline.min(self.max_timeout);
        let start = Instant::now();

        if let Some(metrics) = &self.metrics {
            metrics.record_call(name);
        }

        let outcome = self.execute(&request, deadline).await;
        let elapsed = start.elapsed();

        match &outcome {
            Ok(result) => {
                debug!(
                    "{} returned {} of {} hits in {:?}",
                    name,
                    result.hits.len(),
                    result.total_hits,
                    elapsed
                );
                if let Some(metrics) = &self.metrics {
                    metrics.record_success(name);
                    metrics.record_response_time(name, elapsed.as_millis() as u64);
                }
            }
            Err(e) => {
                warn!("{} failed after {:?}: {}", name, elapsed, e);
                if let Some(metrics) = &self.metrics {
                    metrics.record_error(name);
                }
            }
        }

        outcome.map_err(|kind| QueryError { operation, kind })
    }

    async fn execute(
        &self,
        request: &SearchRequest,
        deadline: Duration,
    ) -> Result<SearchResult, QueryErrorKind> {
        let body = compile(request);

        let response = timeout(deadline, self.gateway.execute(&request.index, &body))
            .await
            .map_err(|_| GatewayError::Timeout(deadline))??;

        Ok(extract(response, &request.aggregations)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::AggregationResult;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// Gateway answering every call with a fixed outcome, recording what it was sent
    struct FakeGateway {
        response: Result<Value, fn() -> GatewayError>,
        delay: Option<Duration>,
        sent: Mutex<Vec<(String, Value)>>,
    }

    impl FakeGateway {
        fn answering(response: Value) -> Self {
            Self {
                response: Ok(response),
                delay: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> GatewayError) -> Self {
            Self {
                response: Err(err),
                delay: None,
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<(String, Value)> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchGateway for FakeGateway {
        async fn execute(&self, index: &str, query: &Value) -> Result<Value, GatewayError> {
            self.sent
                .lock()
                .unwrap()
                .push((index.to_string(), query.clone()));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.response {
                Ok(v) => Ok(v.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn service(gateway: Arc<FakeGateway>) -> QueryService {
        QueryService::new(gateway, "kibana_sample_data_flights")
    }

    fn hits_response() -> Value {
        json!({
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_source": {
                        "OriginCityName": "Adelaide", "DestCityName": "Tokoname",
                        "Carrier": "ES-Air", "AvgTicketPrice": 320.5
                    } },
                    { "_source": { "OriginCityName": "Adelaide" } }
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_carrier_search_sends_compiled_query() {
        let gateway = Arc::new(FakeGateway::answering(hits_response()));
        let result = assert_ok!(service(gateway.clone()).flights_by_carrier("ES-Air").await);

        assert_eq!(result.total_hits, 2);
        assert_eq!(result.hits.len(), 1);

        let sent = gateway.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "kibana_sample_data_flights");
        assert_eq!(sent[0].1["query"], json!({ "term": { "Carrier": "ES-Air" } }));
        assert_eq!(sent[0].1["track_total_hits"], json!(true));
    }

    #[tokio::test]
    async fn test_invalid_range_never_reaches_gateway() {
        let gateway = Arc::new(FakeGateway::answering(hits_response()));
        let service = service(gateway.clone());

        let err = assert_err!(service.flights_by_price_range(400.0, 200.0).await);
        assert_eq!(err.operation, Operation::FlightsByPriceRange);
        assert!(err.is_validation());

        let start = NaiveDate::from_ymd_opt(2022, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let err = service.flights_by_date_range(start, end).await.unwrap_err();
        assert_eq!(err.operation, Operation::FlightsByDateRange);
        assert!(err.is_validation());

        assert!(gateway.sent().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_tagged_with_operation() {
        let gateway = Arc::new(FakeGateway::failing(|| {
            GatewayError::Transport("connection refused".to_string())
        }));
        let err = service(gateway).all_flights().await.unwrap_err();

        assert_eq!(err.operation, Operation::AllFlights);
        assert!(matches!(
            err.kind,
            QueryErrorKind::Gateway(GatewayError::Transport(_))
        ));
        assert_eq!(
            err.to_string(),
            "all_flights failed: transport error: connection refused"
        );
    }

    #[tokio::test]
    async fn test_protocol_failure_propagates_unchanged() {
        let gateway = Arc::new(FakeGateway::failing(|| GatewayError::Protocol {
            status: 400,
            reason: "parsing_exception: bad query".to_string(),
        }));
        let err = service(gateway).flights_per_destination().await.unwrap_err();

        match err.kind {
            QueryErrorKind::Gateway(GatewayError::Protocol { status, reason }) => {
                assert_eq!(status, 400);
                assert_eq!(reason, "parsing_exception: bad query");
            }
            other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_response_surfaces() {
        let gateway = Arc::new(FakeGateway::answering(json!({ "took": 1 })));
        let err = service(gateway)
            .flights_by_origin_city("Adelaide")
            .await
            .unwrap_err();
        assert!(matches!(err.kind, QueryErrorKind::Extract(_)));
    }

    #[tokio::test]
    async fn test_delayed_flights_scalar() {
        let gateway = Arc::new(FakeGateway::answering(json!({
            "hits": { "total": { "value": 2800, "relation": "eq" }, "hits": [] },
            "aggregations": { "avg_delay_time": { "value": 47.5 } }
        })));
        let result = service(gateway.clone()).delayed_flights(60).await.unwrap();

        assert_eq!(
            result.aggregation(intents::AVG_DELAY_TIME),
            Some(&AggregationResult::Scalar(Some(47.5)))
        );
        assert_eq!(gateway.sent()[0].1["size"], json!(0));
    }

    #[tokio::test]
    async fn test_average_price_per_carrier_buckets() {
        let gateway = Arc::new(FakeGateway::answering(json!({
            "hits": { "total": { "value": 13059, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "avg_price_per_carrier": { "buckets": [
                    { "key": "Logstash Airways", "doc_count": 3331, "average_price": { "value": 624.5 } },
                    { "key": "JetBeats", "doc_count": 3274, "average_price": { "value": 625.25 } }
                ] }
            }
        })));
        let result = service(gateway).average_price_per_carrier().await.unwrap();
        let buckets = result.buckets(intents::AVG_PRICE_PER_CARRIER).unwrap();
        assert_eq!(buckets[1].key, "JetBeats");
        assert_eq!(buckets[1].metric, Some(625.25));
    }

    #[tokio::test]
    async fn test_deadline_expires() {
        let gateway = Arc::new(FakeGateway {
            delay: Some(Duration::from_millis(200)),
            ..FakeGateway::answering(hits_response())
        });
        let service = service(gateway).with_timeout(Duration::from_millis(10));

        let err = service.all_flights().await.unwrap_err();
        assert!(matches!(
            err.kind,
            QueryErrorKind::Gateway(GatewayError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_deadline_capped_by_max_timeout() {
        let gateway = Arc::new(FakeGateway {
            delay: Some(Duration::from_millis(200)),
            ..FakeGateway::answering(hits_response())
        });
        let service = service(gateway).with_max_timeout(Duration::from_millis(10));

        let err = service
            .run_with_timeout(
                Operation::AllFlights,
                intents::all_flights("kibana_sample_data_flights"),
                Duration::from_secs(60),
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err.kind,
            QueryErrorKind::Gateway(GatewayError::Timeout(d)) if d == Duration::from_millis(10)
        ));
    }

    #[tokio::test]
    async fn test_repeated_execution_is_identical() {
        let gateway = Arc::new(FakeGateway::answering(hits_response()));
        let service = service(gateway.clone());
        let criteria = FlightCriteria::new("ES-Air", "Adelaide", "Tokoname");

        let first = service.flights_by_multiple_criteria(&criteria).await.unwrap();
        let second = service.flights_by_multiple_criteria(&criteria).await.unwrap();
        assert_eq!(first, second);

        let sent = gateway.sent();
        assert_eq!(
            serde_json::to_string(&sent[0].1).unwrap(),
            serde_json::to_string(&sent[1].1).unwrap()
        );
    }

    #[tokio::test]
    async fn test_metrics_recorded() {
        let metrics = Arc::new(Metrics::new());
        let ok = service(Arc::new(FakeGateway::answering(hits_response())))
            .with_metrics(metrics.clone());
        let failing = service(Arc::new(FakeGateway::failing(|| {
            GatewayError::Transport("down".to_string())
        })))
        .with_metrics(metrics.clone());

        ok.long_distance_flights(5000.0).await.unwrap();
        failing.long_distance_flights(5000.0).await.unwrap_err();

        let snapshot = metrics.snapshot();
        let stats = &snapshot.operations["long_distance_flights"];
        assert_eq!(stats.calls, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.reliability, 50.0);
    }
}
