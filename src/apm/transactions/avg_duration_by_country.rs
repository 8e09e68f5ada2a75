use crate::apm::{
    ProcessorEvent, Setup, CLIENT_GEO_COUNTRY_ISO_CODE, SERVICE_NAME, TIMESTAMP,
    TRANSACTION_DURATION, TRANSACTION_NAME, TRANSACTION_PAGE_LOAD, TRANSACTION_TYPE,
};
use crate::elasticsearch::aggregates::{avg_agg, terms_agg, MetricValue, TermsAggData};
use crate::elasticsearch::{AggregateSearchResponse, ElasticsearchError};
use crate::query_dsl::{bool_filter, exists, range_millis, term};
use serde::*;
use serde_json::*;
use tracing::debug;

/// Countries beyond this many buckets are dropped by the terms aggregation
const MAX_COUNTRIES: u32 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvgDurationByCountry {
    pub key: String,
    pub doc_count: u64,
    pub value: f64,
}

#[derive(Deserialize)]
struct CountryBucketAggs {
    avg_duration: MetricValue,
}

#[derive(Deserialize)]
struct AvgDurationAggs {
    country_code: TermsAggData<CountryBucketAggs>,
}

fn build_request(setup: &Setup, service_name: &str, transaction_name: Option<&str>) -> Value {
    let mut filter = vec![term(SERVICE_NAME, service_name)];
    if let Some(transaction_name) = transaction_name.filter(|name| !name.is_empty()) {
        filter.push(term(TRANSACTION_NAME, transaction_name));
    }
    filter.push(term(TRANSACTION_TYPE, TRANSACTION_PAGE_LOAD));
    filter.push(exists(CLIENT_GEO_COUNTRY_ISO_CODE));
    filter.push(range_millis(TIMESTAMP, setup.start, setup.end));
    filter.extend(setup.ui_filters_es.iter().cloned());

    json! {
        {
            "size": 0,
            "query": bool_filter(filter),
            "aggs": terms_agg(
                "country_code",
                CLIENT_GEO_COUNTRY_ISO_CODE,
                MAX_COUNTRIES,
                vec![avg_agg("avg_duration", TRANSACTION_DURATION)]
            )
        }
    }
}

/// Average page-load duration of `service_name` per client country, in the
/// order Elasticsearch returned the country buckets
pub fn get_transaction_avg_duration_by_country(
    setup: &Setup,
    service_name: &str,
    transaction_name: Option<&str>,
) -> std::result::Result<Vec<AvgDurationByCountry>, ElasticsearchError> {
    let request = build_request(setup, service_name, transaction_name);
    let response = setup
        .apm_event_client
        .search(&[ProcessorEvent::Transaction], request)?;

    let aggregations = match AggregateSearchResponse::<AvgDurationAggs>::from_value(response)?
        .aggregations
    {
        Some(aggregations) => aggregations,
        None => {
            debug!(service_name, "no aggregations in avg duration by country response");
            return Ok(Vec::new());
        }
    };

    let by_country = aggregations
        .country_code
        .buckets
        .into_iter()
        .map(|bucket| AvgDurationByCountry {
            key: bucket.key_as_string(),
            doc_count: bucket.doc_count,
            value: bucket.sub.avg_duration.value_or_zero(),
        })
        .collect::<Vec<_>>();

    debug!(service_name, countries = by_country.len(), "avg duration by country");
    Ok(by_country)
}

#[cfg(test)]
mod tests {
    use crate::apm::event_client::tests::RecordingClient;
    use crate::apm::transactions::{get_transaction_avg_duration_by_country, AvgDurationByCountry};
    use crate::apm::{ApmEventClient, ApmIndices, Setup, UiFilters};
    use crate::elasticsearch::ElasticsearchError;
    use serde_json::*;
    use std::sync::Arc;

    fn setup(recorder: Arc<RecordingClient>) -> Setup {
        Setup::new(
            1_593_413_100_000,
            1_593_414_000_000,
            ApmEventClient::new(recorder, ApmIndices::default()),
        )
    }

    #[test]
    fn test_request_shape() {
        let recorder = RecordingClient::new(Ok(json!({})));
        let setup = setup(recorder.clone()).with_ui_filters(&UiFilters {
            environment: Some("production".into()),
            ..UiFilters::default()
        });

        get_transaction_avg_duration_by_country(&setup, "opbeans-rum", Some("/checkout"))
            .unwrap();

        let (index, body) = recorder.last_request();
        assert_eq!(index, "apm-*-transaction*");
        assert_eq!(
            body,
            json! {
                {
                    "size": 0,
                    "query": {
                        "bool": {
                            "filter": [
                                { "term": { "service.name": "opbeans-rum" } },
                                { "term": { "transaction.name": "/checkout" } },
                                { "term": { "transaction.type": "page-load" } },
                                { "exists": { "field": "client.geo.country_iso_code" } },
                                { "range": { "@timestamp": {
                                    "gte": 1_593_413_100_000i64,
                                    "lte": 1_593_414_000_000i64,
                                    "format": "epoch_millis"
                                } } },
                                { "term": { "service.environment": "production" } },
                                { "terms": { "processor.event": ["transaction"] } }
                            ]
                        }
                    },
                    "aggs": {
                        "country_code": {
                            "terms": { "field": "client.geo.country_iso_code", "size": 500 },
                            "aggs": {
                                "avg_duration": { "avg": { "field": "transaction.duration.us" } }
                            }
                        }
                    }
                }
            }
        );
    }

    #[test]
    fn test_transaction_name_filter_is_optional() {
        for name in [None, Some("")] {
            let recorder = RecordingClient::new(Ok(json!({})));
            get_transaction_avg_duration_by_country(&setup(recorder.clone()), "opbeans-rum", name)
                .unwrap();

            let (_, body) = recorder.last_request();
            let filters = body["query"]["bool"]["filter"].as_array().unwrap();
            assert_eq!(filters.len(), 5);
            assert!(filters
                .iter()
                .all(|f| f["term"].get("transaction.name").is_none()));
        }
    }

    #[test]
    fn test_no_aggregations_is_empty() {
        let recorder = RecordingClient::new(Ok(json!({
            "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] }
        })));

        let result =
            get_transaction_avg_duration_by_country(&setup(recorder), "opbeans-rum", None)
                .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_buckets_are_mapped_in_order() {
        let recorder = RecordingClient::new(Ok(json!({
            "aggregations": {
                "country_code": {
                    "doc_count_error_upper_bound": 0,
                    "sum_other_doc_count": 0,
                    "buckets": [
                        { "key": "US", "doc_count": 12, "avg_duration": { "value": 1250.5 } },
                        { "key": "DE", "doc_count": 3, "avg_duration": { "value": null } },
                        { "key": "AR", "doc_count": 1, "avg_duration": { "value": 90.0 } }
                    ]
                }
            }
        })));

        let result =
            get_transaction_avg_duration_by_country(&setup(recorder), "opbeans-rum", None)
                .unwrap();
        assert_eq!(
            result,
            vec![
                AvgDurationByCountry {
                    key: "US".into(),
                    doc_count: 12,
                    value: 1250.5,
                },
                AvgDurationByCountry {
                    key: "DE".into(),
                    doc_count: 3,
                    value: 0.0,
                },
                AvgDurationByCountry {
                    key: "AR".into(),
                    doc_count: 1,
                    value: 90.0,
                },
            ]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let row = AvgDurationByCountry {
            key: "US".into(),
            doc_count: 12,
            value: 1250.5,
        };
        assert_eq!(
            to_value(&row).unwrap(),
            json!({ "key": "US", "docCount": 12, "value": 1250.5 })
        );
    }

    #[test]
    fn test_client_errors_propagate() {
        let recorder = RecordingClient::new(Err(ElasticsearchError(
            Some(400),
            "search_phase_execution_exception".into(),
        )));

        let err = get_transaction_avg_duration_by_country(&setup(recorder), "opbeans-rum", None)
            .unwrap_err();
        assert_eq!(err.status(), Some(400));
    }
}
