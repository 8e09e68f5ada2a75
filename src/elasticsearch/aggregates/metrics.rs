//! https://www.elastic.co/guide/en/elasticsearch/reference/current/search-aggregations-metrics-avg-aggregation.html

use serde::*;
use serde_json::*;

/// Single-value metric result.  Elasticsearch reports `null` when no
/// document in the bucket had a value for the field
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct MetricValue {
    pub value: Option<f64>,
}

impl MetricValue {
    pub fn value_or_zero(&self) -> f64 {
        self.value.unwrap_or(0.0)
    }
}

pub fn avg_agg(aggregate_name: &str, field: &str) -> Value {
    json! {
       {
          aggregate_name: {
                "avg": {
                   "field": field
                }
            }
       }
    }
}
