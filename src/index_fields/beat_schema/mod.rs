//! Static field documentation for the Beats and ECS schemas, and the rules
//! for picking which schema applies to an index.

use crate::utils::json_to_string;
use lazy_static::lazy_static;
use regex::Regex;
use serde::*;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Fields whose first name segment is one of these are filed under `base`
pub const BASE_CATEGORY_FIELDS: [&str; 4] = ["@timestamp", "labels", "message", "tags"];

pub const UNKNOWN_INDEX_ALIAS: &str = "unknown";

const ECS_SCHEMA: &str = "ecs";
const BEAT_SCHEMAS: [&str; 4] = ["auditbeat", "filebeat", "packetbeat", "winlogbeat"];

lazy_static! {
    static ref BUILTIN_DOCUMENTATION: Arc<DocumentationRegistry> =
        match DocumentationRegistry::from_json(include_str!("schema.json")) {
            Ok(registry) => Arc::new(registry),
            Err(e) => {
                warn!("built-in field documentation is unreadable: {}", e);
                Arc::new(DocumentationRegistry::default())
            }
        };
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldDocumentation {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    example: Value,
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
}

impl FieldDocumentation {
    /// Examples are written as strings or numbers; either way they are shown as text
    pub fn example(&self) -> Option<String> {
        json_to_string(self.example.clone())
    }
}

/// Field documentation per schema (`ecs`, `auditbeat`, ...), keyed by the
/// full dotted field name
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct DocumentationRegistry {
    schemas: HashMap<String, HashMap<String, FieldDocumentation>>,
}

impl DocumentationRegistry {
    /// The embedded registry.  It documents a curated sample of the common
    /// ECS and Beats fields, not the complete schemas; load a full export
    /// with [`DocumentationRegistry::from_json`] when every field needs a
    /// description.
    pub fn builtin() -> &'static DocumentationRegistry {
        &BUILTIN_DOCUMENTATION
    }

    /// Shared handle to [`DocumentationRegistry::builtin`]
    pub fn builtin_shared() -> Arc<DocumentationRegistry> {
        Arc::clone(&*BUILTIN_DOCUMENTATION)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Schemas consulted for `alias`, highest precedence first.  ECS
    /// definitions win over the beat-specific ones.
    pub fn schemas_for(alias: &str) -> Vec<&'static str> {
        if alias == UNKNOWN_INDEX_ALIAS {
            return Vec::new();
        }

        match BEAT_SCHEMAS.iter().find(|beat| alias.contains(*beat)) {
            Some(beat) => vec![ECS_SCHEMA, *beat],
            None if alias.contains(ECS_SCHEMA) => vec![ECS_SCHEMA],
            None => Vec::new(),
        }
    }

    pub fn get(&self, alias: &str, field_name: &str) -> Option<&FieldDocumentation> {
        DocumentationRegistry::schemas_for(alias)
            .into_iter()
            .filter_map(|schema| self.schemas.get(schema))
            .find_map(|fields| fields.get(field_name))
    }

    pub fn has(&self, alias: &str, field_name: &str) -> bool {
        self.get(alias, field_name).is_some()
    }
}

pub fn has_documentation(alias: &str, field_name: &str) -> bool {
    DocumentationRegistry::builtin().has(alias, field_name)
}

pub fn get_documentation(alias: &str, field_name: &str) -> Option<&'static FieldDocumentation> {
    DocumentationRegistry::builtin().get(alias, field_name)
}

/// The first entry of `default_indices` that matches `index_name`.  Entries
/// are tried as (unanchored) regular expressions, so `auditbeat-*` claims
/// `auditbeat-7.8.0`; entries that aren't valid regexes must match exactly.
pub fn get_index_alias(default_indices: &[String], index_name: &str) -> String {
    default_indices
        .iter()
        .find(|pattern| match Regex::new(pattern) {
            Ok(re) => re.is_match(index_name),
            Err(_) => pattern.as_str() == index_name,
        })
        .cloned()
        .unwrap_or_else(|| UNKNOWN_INDEX_ALIAS.to_string())
}

/// `base` for the well-known top level fields, otherwise the field's first
/// name segment
pub fn category_for(field_name: &str) -> String {
    let first = field_name.split('.').next().unwrap_or(field_name);
    if BASE_CATEGORY_FIELDS.contains(&first) {
        "base".to_string()
    } else {
        first.to_string()
    }
}
