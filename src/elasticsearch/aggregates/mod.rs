//! Builders for the aggregation clauses we send, and the bucket/metric shapes
//! we read back.  Every builder returns `{ aggregate_name: { ... } }` so the
//! results can be merged into a parent `aggs` object.

use serde_json::{Map, Value};

pub mod metrics;
pub mod terms;

pub use metrics::{avg_agg, MetricValue};
pub use terms::{terms_agg, TermsAggData, TermsBucket};

/// Flattens a list of `{ name: agg }` objects into a single `aggs` map.
/// Anything that isn't an object is skipped.
pub fn make_children_map(children: Vec<Value>) -> Map<String, Value> {
    let mut map = Map::new();

    for child in children {
        if let Value::Object(o) = child {
            map.extend(o);
        }
    }

    map
}
