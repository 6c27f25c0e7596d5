//! Abstract graph document: flat nodes, edges and a fixed style legend.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const GRAPH_DOCUMENT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphDocument {
    pub version: u32,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub legend: Legend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum NodeCategory {
    Namespace,
    Class,
    Interface,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Namespace => "Namespace",
            Self::Class => "Class",
            Self::Interface => "Interface",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub category: NodeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum EdgeCategory {
    Contains,
    Inherits,
    Implements,
    Composes,
    Aggregates,
    Uses,
}

impl EdgeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "Contains",
            Self::Inherits => "Inherits",
            Self::Implements => "Implements",
            Self::Composes => "Composes",
            Self::Aggregates => "Aggregates",
            Self::Uses => "Uses",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub category: EdgeCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Legend {
    pub categories: Vec<CategoryDefinition>,
    pub styles: Vec<LinkStyle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryDefinition {
    pub id: EdgeCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Stroke settings applied to links of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LinkStyle {
    pub category: EdgeCategory,
    pub stroke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
    pub thickness: u8,
}

impl GraphDocument {
    pub fn nodes_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.category == category)
    }

    pub fn edges_in_category(&self, category: EdgeCategory) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.category == category)
    }

    pub fn find_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }
}
