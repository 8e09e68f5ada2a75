//! https://www.elastic.co/guide/en/elasticsearch/reference/current/query-dsl-range-query.html

use serde::*;
use serde_json::*;

#[derive(Serialize)]
struct RangeMillis {
    gte: i64,
    lte: i64,
    format: &'static str,
}

/// Inclusive range over a date field, bounds given as epoch milliseconds
pub fn range_millis(field: &str, start: i64, end: i64) -> Value {
    let range = RangeMillis {
        gte: start,
        lte: end,
        format: "epoch_millis",
    };

    json! {
        {
            "range": {
                field: range
            }
        }
    }
}
