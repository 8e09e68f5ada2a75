use serde_json::*;

/// `terms` query matching any of `values` exactly
pub fn terms<I, V>(field: &str, values: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values = values.into_iter().map(Into::into).collect::<Vec<Value>>();

    json! {
        {
            "terms": {
                field: values
            }
        }
    }
}
