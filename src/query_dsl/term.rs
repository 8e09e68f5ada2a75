//! https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl-term-query.html
//!
//! Returns documents that contain an exact term in a provided field

use serde_json::*;

pub fn term<V: Into<Value>>(field: &str, value: V) -> Value {
    let value: Value = value.into();

    json! {
        {
            "term": {
                field: value
            }
        }
    }
}
