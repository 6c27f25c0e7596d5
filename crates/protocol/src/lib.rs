use anyhow::Result;
use serde::Serialize;

mod document;
mod snapshot;

pub use document::{
    CategoryDefinition, Edge, EdgeCategory, GraphDocument, Legend, LinkStyle, Node, NodeCategory,
    GRAPH_DOCUMENT_VERSION,
};
pub use snapshot::{
    Body, DeclarationKind, Expression, Member, Parameter, SemanticSnapshot, SourceDocument,
    TypeDeclaration, TypeRef, TypeTestOperator, Visibility, SNAPSHOT_SCHEMA_VERSION,
};

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON Schema of the semantic snapshot accepted as input
pub fn snapshot_schema() -> Result<String> {
    let schema = schemars::schema_for!(SemanticSnapshot);
    serialize_json_pretty(&schema)
}

/// JSON Schema of the graph document produced as output
pub fn graph_document_schema() -> Result<String> {
    let schema = schemars::schema_for!(GraphDocument);
    serialize_json_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_mention_top_level_fields() {
        let input = snapshot_schema().unwrap();
        assert!(input.contains("default_namespace"));
        assert!(input.contains("documents"));

        let output = graph_document_schema().unwrap();
        assert!(output.contains("nodes"));
        assert!(output.contains("legend"));
    }

    #[test]
    fn node_group_is_omitted_when_absent() {
        let node = Node {
            id: "Shop.Order".to_string(),
            label: "Order".to_string(),
            category: NodeCategory::Class,
            group: None,
        };
        let raw = serialize_json(&node).unwrap();
        assert_eq!(raw, r#"{"id":"Shop.Order","label":"Order","category":"Class"}"#);
    }
}
