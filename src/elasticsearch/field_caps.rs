//! https://www.elastic.co/guide/en/elasticsearch/reference/current/search-field-caps.html

use crate::elasticsearch::{Elasticsearch, ElasticsearchError};
use crate::index_fields::IndexFieldDescriptor;
use indexmap::IndexMap;
use serde::*;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

/// Elasticsearch mapping types grouped into the coarser types the UI works with
fn kbn_field_type(es_type: &str) -> &'static str {
    match es_type {
        "text" | "keyword" | "constant_keyword" | "wildcard" | "version" | "_id" | "_type"
        | "string" => "string",
        "long" | "unsigned_long" | "integer" | "short" | "byte" | "double" | "float"
        | "half_float" | "scaled_float" | "token_count" => "number",
        "date" | "date_nanos" => "date",
        "boolean" => "boolean",
        "ip" => "ip",
        "geo_point" => "geo_point",
        "geo_shape" => "geo_shape",
        "attachment" => "attachment",
        "murmur3" => "murmur3",
        "histogram" => "histogram",
        "_source" => "_source",
        _ => "unknown",
    }
}

/// Structural mappings that never hold values of their own
fn is_structural(es_type: &str) -> bool {
    matches!(es_type, "object" | "nested")
}

fn read_from_doc_values(aggregatable: bool, es_type: &str) -> bool {
    aggregatable && !matches!(es_type, "text" | "geo_shape") && !es_type.starts_with('_')
}

/// `{multi: {parent}}` for multi-fields such as `foo.keyword`, and
/// `{nested: {path}}` for fields under a nested mapping
fn sub_type(name: &str, field_types: &HashMap<String, Vec<String>>) -> Option<Value> {
    let is_nested = |path: &str| {
        field_types
            .get(path)
            .map_or(false, |types| types.iter().any(|t| t == "nested"))
    };

    let mut nested_path = None;
    let mut ancestor = name;
    while let Some((parent, _)) = ancestor.rsplit_once('.') {
        if is_nested(parent) {
            nested_path = Some(parent);
            break;
        }
        ancestor = parent;
    }

    let multi_parent = name.rsplit_once('.').map(|(parent, _)| parent).filter(|parent| {
        field_types
            .get(*parent)
            .map_or(false, |types| types.iter().any(|t| !is_structural(t)))
    });

    match (multi_parent, nested_path) {
        (Some(parent), Some(path)) => Some(json!({
            "multi": { "parent": parent },
            "nested": { "path": path }
        })),
        (Some(parent), None) => Some(json!({ "multi": { "parent": parent } })),
        (None, Some(path)) => Some(json!({ "nested": { "path": path } })),
        (None, None) => None,
    }
}

#[derive(Debug, Deserialize)]
struct FieldCapability {
    #[serde(rename = "type")]
    type_: String,
    searchable: bool,
    aggregatable: bool,
}

#[derive(Debug, Deserialize)]
struct FieldCapsResponse {
    #[serde(default)]
    fields: IndexMap<String, IndexMap<String, FieldCapability>>,
}

pub struct ElasticsearchFieldCapsRequest {
    elasticsearch: Elasticsearch,
    patterns: Vec<String>,
}

impl ElasticsearchFieldCapsRequest {
    pub fn new(elasticsearch: &Elasticsearch, patterns: &[String]) -> Self {
        ElasticsearchFieldCapsRequest {
            elasticsearch: elasticsearch.clone(),
            patterns: patterns.to_vec(),
        }
    }

    pub fn url(&self) -> String {
        let target = if self.patterns.is_empty() {
            self.elasticsearch.index_name().to_string()
        } else {
            self.patterns.join(",")
        };

        format!(
            "{}{}/_field_caps?fields=*&ignore_unavailable=true&allow_no_indices=true",
            self.elasticsearch.url(),
            target
        )
    }

    pub fn execute(&self) -> Result<Vec<IndexFieldDescriptor>, ElasticsearchError> {
        Elasticsearch::execute_request(
            self.elasticsearch.client().get(&self.url()),
            None,
            |status, body| match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => {
                    into_descriptors(value).map_err(|e| ElasticsearchError(Some(status), e.1))
                }
                Err(e) => Err(ElasticsearchError(Some(status), e.to_string())),
            },
        )
    }
}

/// Converts a `_field_caps` response into one descriptor per field, sorted by
/// name.  A field mapped with different types across indices gets the type
/// `conflict` and is never read from doc values.
pub fn into_descriptors(response: Value) -> Result<Vec<IndexFieldDescriptor>, ElasticsearchError> {
    let response: FieldCapsResponse = serde_json::from_value(response)?;
    let mut descriptors = BTreeMap::new();

    // parent lookups need every field, structural ones included
    let field_types = response
        .fields
        .iter()
        .map(|(name, capabilities)| {
            let types = capabilities
                .values()
                .map(|cap| cap.type_.clone())
                .collect::<Vec<_>>();
            (name.clone(), types)
        })
        .collect::<HashMap<_, _>>();

    for (name, capabilities) in response.fields {
        if name.starts_with('_') {
            continue;
        }

        let capabilities = capabilities
            .into_values()
            .filter(|cap| !is_structural(&cap.type_))
            .collect::<Vec<_>>();
        if capabilities.is_empty() {
            continue;
        }

        let es_types = capabilities
            .iter()
            .map(|cap| cap.type_.clone())
            .collect::<Vec<_>>();
        let mut kbn_types = es_types.iter().map(|t| kbn_field_type(t)).collect::<Vec<_>>();
        kbn_types.dedup();

        let conflict = kbn_types.len() > 1;
        let type_ = if conflict { "conflict" } else { kbn_types[0] };
        let searchable = capabilities.iter().any(|cap| cap.searchable);
        let aggregatable = capabilities.iter().any(|cap| cap.aggregatable);

        descriptors.insert(
            name.clone(),
            IndexFieldDescriptor {
                read_from_doc_values: !conflict
                    && read_from_doc_values(aggregatable, &es_types[0]),
                sub_type: sub_type(&name, &field_types),
                name,
                type_: type_.to_string(),
                searchable,
                aggregatable,
                es_types: Some(es_types),
            },
        );
    }

    Ok(descriptors.into_values().collect())
}
