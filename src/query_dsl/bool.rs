use serde_json::*;

/// `bool` query whose clauses all run in filter context
pub fn bool_filter(clauses: Vec<Value>) -> Value {
    json! {
        {
            "bool": {
                "filter": clauses
            }
        }
    }
}

/// Appends `clause` to `body.query.bool.filter`, creating whatever part of
/// that path is missing.  An existing query without a `bool` object is kept
/// by moving it into the filter list first.
pub fn push_filter(body: &mut Value, clause: Value) {
    if !body.is_object() {
        *body = json!({});
    }

    let query = &mut body["query"];
    if query.is_null() {
        *query = bool_filter(vec![]);
    } else if !query.get("bool").map_or(false, Value::is_object) {
        let existing = query.take();
        *query = bool_filter(vec![existing]);
    }

    let filter = &mut query["bool"]["filter"];
    if filter.is_null() {
        *filter = Value::Array(vec![]);
    } else if !filter.is_array() {
        // a lone filter clause is legal DSL; normalize it to a list
        let existing = filter.take();
        *filter = Value::Array(vec![existing]);
    }

    if let Value::Array(clauses) = filter {
        clauses.push(clause);
    }
}
