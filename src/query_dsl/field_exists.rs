//! https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl-exists-query.html
//!
//! Returns documents that contain an indexed value for a field.

use serde_json::*;

pub fn exists(field: &str) -> Value {
    json! {
        {
            "exists": {
                "field": field
            }
        }
    }
}

/// Documents with no indexed value for `field`
pub fn missing(field: &str) -> Value {
    json! {
        {
            "bool": {
                "must_not": [exists(field)]
            }
        }
    }
}
