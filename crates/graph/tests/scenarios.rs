use classmap_graph::{analyze, AnalysisOptions, NoProgress, RelationshipKind, SnapshotResolver};
use pretty_assertions::assert_eq;

fn relationships_of(snapshot: &str, owner: &str) -> Vec<(String, RelationshipKind)> {
    let resolver = SnapshotResolver::from_json(snapshot).expect("valid snapshot");
    let analysis = analyze(
        &resolver,
        &["Shop.cs".to_string()],
        &AnalysisOptions::default(),
        &mut NoProgress,
    )
    .expect("analysis");

    analysis
        .catalog
        .lookup(owner)
        .expect("owner cataloged")
        .relationships()
        .iter()
        .map(|rel| (rel.target.clone(), rel.kind))
        .collect()
}

fn snapshot(declarations: &str) -> String {
    format!(
        r#"{{
          "default_namespace": "Shop",
          "documents": [{{ "path": "Shop.cs", "declarations": {declarations} }}]
        }}"#
    )
}

#[test]
fn derived_class_inherits_and_base_stays_empty() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "A", "name": "A", "base_type": { "kind": "object" } },
          { "full_name": "B", "name": "B", "base_type": { "kind": "named", "name": "A" } }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "B"),
        vec![("A".to_string(), RelationshipKind::Inherits)]
    );
    assert_eq!(relationships_of(&snapshot, "A"), vec![]);
}

#[test]
fn injected_private_field_is_aggregated_once() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "D", "name": "D" },
          {
            "full_name": "C", "name": "C",
            "members": [
              { "member": "field", "name": "_d", "type": { "kind": "named", "name": "D" }, "visibility": "private" },
              {
                "member": "constructor",
                "parameters": [ { "name": "d", "type": { "kind": "named", "name": "D" } } ],
                "body": { "expressions": [] }
              }
            ]
          }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "C"),
        vec![("D".to_string(), RelationshipKind::Aggregates)]
    );
}

#[test]
fn method_parameter_is_used_and_created_instance_is_composed() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "E", "name": "E" },
          { "full_name": "F", "name": "F" },
          {
            "full_name": "G", "name": "G",
            "members": [
              {
                "member": "method",
                "name": "M",
                "parameters": [ { "name": "e", "type": { "kind": "named", "name": "E" } } ],
                "return_type": { "kind": "void" },
                "body": {
                  "expressions": [
                    { "expr": "object_creation", "created_type": { "kind": "named", "name": "F" } }
                  ]
                }
              }
            ]
          }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "G"),
        vec![
            ("E".to_string(), RelationshipKind::Uses),
            ("F".to_string(), RelationshipKind::Composes),
        ]
    );
}

#[test]
fn generic_method_type_argument_is_used() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "H", "name": "H" },
          {
            "full_name": "I", "name": "I",
            "members": [
              {
                "member": "method",
                "name": "Run",
                "return_type": { "kind": "void" },
                "body": {
                  "expressions": [
                    {
                      "expr": "call",
                      "declaring_type": { "kind": "named", "name": "Helper" },
                      "type_arguments": [ { "kind": "named", "name": "H" } ]
                    }
                  ]
                }
              }
            ]
          }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "I"),
        vec![("H".to_string(), RelationshipKind::Uses)]
    );
}

#[test]
fn type_tests_and_calls_on_cataloged_types_are_used() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "H", "name": "H" },
          { "full_name": "Helper", "name": "Helper" },
          {
            "full_name": "J", "name": "J",
            "members": [
              {
                "member": "method",
                "name": "Run",
                "return_type": { "kind": "void" },
                "body": {
                  "expressions": [
                    {
                      "expr": "call",
                      "declaring_type": { "kind": "named", "name": "Helper" },
                      "type_arguments": []
                    },
                    {
                      "expr": "type_test",
                      "operator": "as",
                      "target_type": { "kind": "named", "name": "H" }
                    }
                  ]
                }
              }
            ]
          }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "J"),
        vec![
            ("H".to_string(), RelationshipKind::Uses),
            ("Helper".to_string(), RelationshipKind::Uses),
        ]
    );
}

#[test]
fn base_class_relates_to_subclasses_it_creates_or_tests() {
    let snapshot = snapshot(
        r#"[
          {
            "full_name": "Shape", "name": "Shape",
            "members": [
              {
                "member": "method",
                "name": "Normalize",
                "return_type": { "kind": "void" },
                "body": {
                  "expressions": [
                    { "expr": "object_creation", "created_type": { "kind": "named", "name": "Circle" } },
                    {
                      "expr": "type_test",
                      "operator": "is",
                      "target_type": { "kind": "named", "name": "Square" }
                    }
                  ]
                }
              }
            ]
          },
          { "full_name": "Circle", "name": "Circle", "base_type": { "kind": "named", "name": "Shape" } },
          { "full_name": "Square", "name": "Square", "base_type": { "kind": "named", "name": "Shape" } }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "Shape"),
        vec![
            ("Circle".to_string(), RelationshipKind::Composes),
            ("Square".to_string(), RelationshipKind::Uses),
        ]
    );
    assert_eq!(
        relationships_of(&snapshot, "Circle"),
        vec![("Shape".to_string(), RelationshipKind::Inherits)]
    );
}

#[test]
fn self_references_are_never_recorded() {
    let snapshot = snapshot(
        r#"[
          {
            "full_name": "Node", "name": "Node",
            "members": [
              { "member": "field", "name": "next", "type": { "kind": "named", "name": "Node" }, "visibility": "private" },
              {
                "member": "method",
                "name": "Clone",
                "return_type": { "kind": "named", "name": "Node" },
                "body": {
                  "expressions": [
                    { "expr": "object_creation", "created_type": { "kind": "named", "name": "Node" } },
                    { "expr": "cast", "target_type": { "kind": "named", "name": "Node" } }
                  ]
                }
              }
            ]
          }
        ]"#,
    );

    assert_eq!(relationships_of(&snapshot, "Node"), vec![]);
}

#[test]
fn collection_of_cataloged_type_aggregates_its_element() {
    let snapshot = snapshot(
        r#"[
          { "full_name": "Shop.Line", "name": "Line" },
          {
            "full_name": "Shop.Order", "name": "Order",
            "members": [
              {
                "member": "property",
                "name": "Lines",
                "visibility": "public",
                "type": {
                  "kind": "generic",
                  "definition": "System.Collections.Generic.List<T>",
                  "arguments": [ { "kind": "named", "name": "Shop.Line" } ],
                  "enumerable": true
                }
              },
              { "member": "field", "name": "total", "type": { "kind": "primitive", "name": "decimal" } }
            ]
          }
        ]"#,
    );

    assert_eq!(
        relationships_of(&snapshot, "Shop.Order"),
        vec![("Shop.Line".to_string(), RelationshipKind::Aggregates)]
    );
}
