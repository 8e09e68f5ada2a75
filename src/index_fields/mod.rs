//! Field listings for the security views: which fields exist across a set of
//! indices, where they came from, and what they mean.

use crate::elasticsearch::{Elasticsearch, ElasticsearchError, ElasticsearchFieldCapsRequest};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::*;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub mod beat_schema;
mod format;

pub use beat_schema::DocumentationRegistry;
pub use format::{format_index_fields, format_index_fields_with, missing_fields};

/// A field as reported by the index-pattern service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexFieldDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub searchable: bool,
    pub aggregatable: bool,
    #[serde(default)]
    pub read_from_doc_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<Value>,
}

/// A descriptor enriched with documentation, its category, and every index
/// alias it was found in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexField {
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub indexes: Vec<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub searchable: bool,
    pub aggregatable: bool,
    #[serde(default)]
    pub read_from_doc_values: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub es_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<Value>,
}

pub trait IndexPatternsService: Send + Sync {
    /// Every field mapped in any index matching one of `patterns`
    fn get_fields_for_wildcard(
        &self,
        patterns: &[String],
    ) -> Result<Vec<IndexFieldDescriptor>, ElasticsearchError>;
}

impl IndexPatternsService for Elasticsearch {
    fn get_fields_for_wildcard(
        &self,
        patterns: &[String],
    ) -> Result<Vec<IndexFieldDescriptor>, ElasticsearchError> {
        ElasticsearchFieldCapsRequest::new(self, patterns).execute()
    }
}

pub trait FieldsAdapter {
    fn get_index_fields(&self, indices: &[String]) -> Result<Vec<IndexField>, ElasticsearchError>;
}

pub struct ElasticsearchIndexFieldAdapter {
    index_patterns: Arc<dyn IndexPatternsService>,
    documentation: Arc<DocumentationRegistry>,
}

impl ElasticsearchIndexFieldAdapter {
    pub fn new(index_patterns: Arc<dyn IndexPatternsService>) -> Self {
        ElasticsearchIndexFieldAdapter {
            index_patterns,
            documentation: DocumentationRegistry::builtin_shared(),
        }
    }

    pub fn with_documentation(mut self, documentation: DocumentationRegistry) -> Self {
        self.documentation = Arc::new(documentation);
        self
    }
}

/// Groups `indices` by the alias each one resolves to, keeping the order in
/// which aliases (and indices within an alias) were first seen
pub fn group_by_alias(indices: &[String]) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    for index in indices {
        groups
            .entry(beat_schema::get_index_alias(indices, index))
            .or_default()
            .push(index.clone());
    }
    groups
}

impl FieldsAdapter for ElasticsearchIndexFieldAdapter {
    fn get_index_fields(&self, indices: &[String]) -> Result<Vec<IndexField>, ElasticsearchError> {
        let groups = group_by_alias(indices);
        let (aliases, patterns): (Vec<String>, Vec<Vec<String>>) = groups.into_iter().unzip();

        debug!(groups = aliases.len(), "fetching index fields");

        let responses = patterns
            .par_iter()
            .map(|group| self.index_patterns.get_fields_for_wildcard(group))
            .collect::<Result<Vec<_>, _>>()?;

        let fields = format_index_fields_with(&self.documentation, responses, &aliases);
        debug!(fields = fields.len(), "index fields merged");
        Ok(fields)
    }
}
