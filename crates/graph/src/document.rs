use classmap_protocol::{
    CategoryDefinition, Edge, EdgeCategory, GraphDocument, Legend, LinkStyle, Node, NodeCategory,
    GRAPH_DOCUMENT_VERSION,
};
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::hierarchy::NamespaceNode;
use crate::namespace::Namespace;
use crate::types::{ClassInfo, RelationshipKind};

/// How class nodes are labeled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Short name (`Order`)
    #[default]
    Short,
    /// Fully qualified name (`Shop.Orders.Order`)
    Full,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub labels: LabelPolicy,
}

/// Render the hierarchy and relationship set with default options
pub fn render(root: &NamespaceNode, catalog: &Catalog, default_namespace: &Namespace) -> GraphDocument {
    render_with(root, catalog, default_namespace, RenderOptions::default())
}

pub fn render_with(
    root: &NamespaceNode,
    catalog: &Catalog,
    default_namespace: &Namespace,
    options: RenderOptions,
) -> GraphDocument {
    let mut nodes = Vec::new();
    let mut edges = Vec::new();

    for node in root.walk() {
        let container = container_id(node, default_namespace);

        if let Some(container) = &container {
            if node.owns_classes() {
                nodes.push(Node {
                    id: container.clone(),
                    label: container.clone(),
                    category: NodeCategory::Namespace,
                    group: None,
                });
            }
        }

        for info in node.classes().iter().filter_map(|&id| catalog.get(id)) {
            nodes.push(Node {
                id: info.full_name.clone(),
                label: class_label(info, options.labels),
                category: if info.is_interface {
                    NodeCategory::Interface
                } else {
                    NodeCategory::Class
                },
                group: container.clone(),
            });
            if let Some(container) = &container {
                edges.push(Edge {
                    source: container.clone(),
                    target: info.full_name.clone(),
                    category: EdgeCategory::Contains,
                });
            }
        }

        let Some(container) = &container else {
            continue;
        };
        if !node.owns_classes() {
            continue;
        }
        for child in node.children().filter(|c| c.owns_classes()) {
            if let Some(child_id) = container_id(child, default_namespace) {
                edges.push(Edge {
                    source: container.clone(),
                    target: child_id,
                    category: EdgeCategory::Contains,
                });
            }
        }
    }

    for (_, info) in catalog.classes() {
        for rel in info.relationships() {
            edges.push(Edge {
                source: info.full_name.clone(),
                target: rel.target.clone(),
                category: rel.kind.into(),
            });
        }
    }

    log::debug!(
        "Rendered graph document: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    GraphDocument {
        version: GRAPH_DOCUMENT_VERSION,
        nodes,
        edges,
        legend: legend(),
    }
}

/// Fixed legend: one category per edge kind and one link style per relationship kind
pub fn legend() -> Legend {
    let categories = std::iter::once(CategoryDefinition {
        id: EdgeCategory::Contains,
        background: None,
    })
    .chain(RelationshipKind::ALL.iter().map(|&kind| CategoryDefinition {
        id: kind.into(),
        background: Some(background(kind).to_string()),
    }))
    .collect();

    let styles = RelationshipKind::ALL
        .iter()
        .map(|&kind| {
            let (stroke, dash_array, thickness) = stroke(kind);
            LinkStyle {
                category: kind.into(),
                stroke: stroke.to_string(),
                dash_array: dash_array.map(str::to_string),
                thickness,
            }
        })
        .collect();

    Legend { categories, styles }
}

fn background(kind: RelationshipKind) -> &'static str {
    match kind {
        RelationshipKind::Inherits => "#FF00FF00",
        RelationshipKind::Implements => "#FFFFFF00",
        RelationshipKind::Composes => "#FF008000",
        RelationshipKind::Aggregates => "#FFFFA500",
        RelationshipKind::Uses => "#FF000000",
    }
}

fn stroke(kind: RelationshipKind) -> (&'static str, Option<&'static str>, u8) {
    match kind {
        RelationshipKind::Inherits => ("#FF000000", None, 2),
        RelationshipKind::Implements => ("#FF000000", Some("4,2"), 2),
        RelationshipKind::Composes => ("#FFFFA500", None, 1),
        RelationshipKind::Aggregates => ("#FFFFA500", Some("2,4"), 1),
        RelationshipKind::Uses => ("#FF000000", Some("1,2"), 1),
    }
}

/// Display id of a namespace container; the global namespace has none
fn container_id(node: &NamespaceNode, default_namespace: &Namespace) -> Option<String> {
    if node.namespace().is_root() {
        return None;
    }
    let full = node.namespace().full_name();
    Some(default_namespace.strip_prefix(&full).to_string())
}

fn class_label(info: &ClassInfo, policy: LabelPolicy) -> String {
    match policy {
        LabelPolicy::Short => info.name.clone(),
        LabelPolicy::Full => info.full_name.clone(),
    }
}
