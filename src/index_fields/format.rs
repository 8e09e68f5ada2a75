use crate::index_fields::beat_schema::category_for;
use crate::index_fields::{DocumentationRegistry, IndexField, IndexFieldDescriptor};
use indexmap::IndexMap;

/// Metadata fields the index-pattern service never reports but every index has
pub fn missing_fields() -> Vec<IndexFieldDescriptor> {
    vec![
        IndexFieldDescriptor {
            name: "_id".into(),
            type_: "string".into(),
            searchable: true,
            aggregatable: false,
            read_from_doc_values: true,
            es_types: None,
            sub_type: None,
        },
        IndexFieldDescriptor {
            name: "_index".into(),
            type_: "string".into(),
            searchable: true,
            aggregatable: true,
            read_from_doc_values: true,
            es_types: None,
            sub_type: None,
        },
    ]
}

fn to_index_field(
    documentation: &DocumentationRegistry,
    alias: &str,
    descriptor: IndexFieldDescriptor,
) -> IndexField {
    let doc = documentation.get(alias, &descriptor.name);

    IndexField {
        category: category_for(&descriptor.name),
        description: doc.and_then(|doc| doc.description.clone()),
        example: doc.and_then(|doc| doc.example()),
        format: doc.and_then(|doc| doc.format.clone()),
        indexes: vec![alias.to_string()],
        name: descriptor.name,
        type_: descriptor.type_,
        searchable: descriptor.searchable,
        aggregatable: descriptor.aggregatable,
        read_from_doc_values: descriptor.read_from_doc_values,
        es_types: descriptor.es_types,
        sub_type: descriptor.sub_type,
    }
}

fn is_empty(description: &Option<String>) -> bool {
    description.as_deref().map_or(true, str::is_empty)
}

/// [`format_index_fields_with`] using the built-in documentation
pub fn format_index_fields(
    responses: Vec<Vec<IndexFieldDescriptor>>,
    aliases: &[String],
) -> Vec<IndexField> {
    format_index_fields_with(DocumentationRegistry::builtin(), responses, aliases)
}

/// Turns the descriptors fetched for each alias (`responses[i]` belongs to
/// `aliases[i]`) into one list of fields, one entry per field name, in the
/// order names were first seen.  A name seen under several aliases lists all
/// of them in `indexes` and keeps the first non-empty description.
pub fn format_index_fields_with(
    documentation: &DocumentationRegistry,
    responses: Vec<Vec<IndexFieldDescriptor>>,
    aliases: &[String],
) -> Vec<IndexField> {
    let mut merged: IndexMap<String, IndexField> = IndexMap::new();

    for (descriptors, alias) in responses.into_iter().zip(aliases) {
        for descriptor in missing_fields().into_iter().chain(descriptors) {
            let field = to_index_field(documentation, alias, descriptor);

            match merged.get_mut(&field.name) {
                Some(existing) => {
                    if is_empty(&existing.description) {
                        existing.description = field.description;
                    }
                    for index in field.indexes {
                        if !existing.indexes.contains(&index) {
                            existing.indexes.push(index);
                        }
                    }
                }
                None => {
                    merged.insert(field.name.clone(), field);
                }
            }
        }
    }

    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use crate::index_fields::*;
    use serde_json::json;

    fn descriptor(name: &str, type_: &str, aggregatable: bool) -> IndexFieldDescriptor {
        IndexFieldDescriptor {
            name: name.into(),
            type_: type_.into(),
            searchable: true,
            aggregatable,
            read_from_doc_values: aggregatable,
            es_types: None,
            sub_type: None,
        }
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> DocumentationRegistry {
        DocumentationRegistry::from_json(
            r#"{
                "ecs": {
                    "host.name": { "description": "Name of the host.", "example": "", "name": "host.name", "type": "keyword" },
                    "network.bytes": { "description": "Total bytes.", "example": 368, "name": "network.bytes", "type": "long", "format": "bytes" }
                },
                "filebeat": {
                    "process.name": { "description": "Process name (filebeat).", "example": "", "name": "process.name", "type": "keyword" }
                },
                "auditbeat": {
                    "process.name": { "description": "Process name (auditbeat).", "example": "", "name": "process.name", "type": "keyword" }
                },
                "winlogbeat": {
                    "process.name": { "description": "", "example": "ssh", "name": "process.name", "type": "keyword" }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_fields_are_prepended_per_group() {
        let result = format_index_fields_with(
            &registry(),
            vec![vec![descriptor("host.name", "string", true)]],
            &strings(&["auditbeat-*"]),
        );

        assert_eq!(
            result.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(),
            vec!["_id", "_index", "host.name"]
        );
        assert!(!result[0].aggregatable);
        assert!(result[1].aggregatable);
        assert_eq!(result[0].category, "_id");
    }

    #[test]
    fn test_enrichment() {
        let result = format_index_fields_with(
            &registry(),
            vec![vec![
                descriptor("network.bytes", "number", true),
                descriptor("custom.field", "string", false),
            ]],
            &strings(&["packetbeat-*"]),
        );

        let bytes = &result[2];
        assert_eq!(bytes.category, "network");
        assert_eq!(bytes.description.as_deref(), Some("Total bytes."));
        assert_eq!(bytes.example.as_deref(), Some("368"));
        assert_eq!(bytes.format.as_deref(), Some("bytes"));
        assert_eq!(bytes.type_, "number");
        assert_eq!(bytes.indexes, strings(&["packetbeat-*"]));

        let custom = &result[3];
        assert_eq!(custom.category, "custom");
        assert_eq!(custom.description, None);
        assert_eq!(custom.example, None);
    }

    #[test]
    fn test_duplicates_merge_indexes_and_prefer_non_empty_description() {
        // the unknown alias has no documentation, so the first copy has no description
        let result = format_index_fields_with(
            &registry(),
            vec![
                vec![descriptor("host.name", "string", true)],
                vec![descriptor("host.name", "string", true)],
                vec![descriptor("host.name", "string", true)],
            ],
            &strings(&["unknown", "filebeat-*", "auditbeat-*"]),
        );

        assert_eq!(result.len(), 3);
        let host = &result[2];
        assert_eq!(host.description.as_deref(), Some("Name of the host."));
        assert_eq!(
            host.indexes,
            strings(&["unknown", "filebeat-*", "auditbeat-*"])
        );
    }

    #[test]
    fn test_empty_description_is_replaced() {
        let result = format_index_fields_with(
            &registry(),
            vec![
                vec![descriptor("process.name", "string", true)],
                vec![descriptor("process.name", "string", true)],
            ],
            &strings(&["winlogbeat-*", "auditbeat-*"]),
        );

        let process = &result[2];
        assert_eq!(process.description.as_deref(), Some("Process name (auditbeat)."));
        // everything but the description and indexes comes from the first copy
        assert_eq!(process.example.as_deref(), Some("ssh"));
    }

    #[test]
    fn test_existing_description_is_kept() {
        let result = format_index_fields_with(
            &registry(),
            vec![
                vec![descriptor("process.name", "string", true)],
                vec![descriptor("process.name", "string", true)],
            ],
            &strings(&["filebeat-*", "auditbeat-*"]),
        );

        let process = &result[2];
        assert_eq!(process.description.as_deref(), Some("Process name (filebeat)."));
        assert_eq!(process.indexes, strings(&["filebeat-*", "auditbeat-*"]));
    }

    #[test]
    fn test_serialized_shape() {
        let result = format_index_fields_with(
            &registry(),
            vec![vec![descriptor("host.name", "string", true)]],
            &strings(&["filebeat-*"]),
        );

        assert_eq!(
            serde_json::to_value(&result[2]).unwrap(),
            json!({
                "category": "host",
                "description": "Name of the host.",
                "example": "",
                "indexes": ["filebeat-*"],
                "name": "host.name",
                "type": "string",
                "searchable": true,
                "aggregatable": true,
                "readFromDocValues": true
            })
        );
    }

    #[test]
    fn test_builtin_documentation() {
        let result = format_index_fields(
            vec![vec![descriptor("@timestamp", "date", true)]],
            &strings(&["auditbeat-*"]),
        );
        assert_eq!(result[2].category, "base");
        assert!(result[2].description.is_some());
    }
}
