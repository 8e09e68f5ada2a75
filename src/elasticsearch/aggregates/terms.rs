//! https://www.elastic.co/guide/en/elasticsearch/reference/current/search-aggregations-bucket-terms-aggregation.html

use crate::elasticsearch::aggregates::make_children_map;
use crate::utils::json_to_string;
use serde::*;
use serde_json::*;

#[derive(Debug, Deserialize)]
pub struct TermsBucket<Sub> {
    pub key: Value,
    pub doc_count: u64,

    #[serde(flatten)]
    pub sub: Sub,
}

impl<Sub> TermsBucket<Sub> {
    /// Bucket keys are strings for keyword fields but numbers/bools elsewhere
    pub fn key_as_string(&self) -> String {
        json_to_string(self.key.clone()).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct TermsAggData<Sub> {
    pub buckets: Vec<TermsBucket<Sub>>,
}

pub fn terms_agg(aggregate_name: &str, field: &str, size: u32, children: Vec<Value>) -> Value {
    let children = make_children_map(children);
    let mut agg = json! {
        {
            "terms": {
                "field": field,
                "size": size
            }
        }
    };

    if !children.is_empty() {
        agg["aggs"] = Value::Object(children);
    }

    json! {
        {
            aggregate_name: agg
        }
    }
}
