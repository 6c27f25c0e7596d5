//! # Class Map Graph
//!
//! Class diagrams through relationship inference over resolved type declarations.
//!
//! ## Features
//!
//! - **Type catalog** - one entry per class/interface/record, partial declarations merged
//! - **Relationship inference** - inheritance, implementation, composition, aggregation, usage
//! - **Namespace grouping** - dotted namespaces folded into a container tree
//! - **Graph documents** - flat node/edge/legend model, JSON or DGML encoded
//!
//! ## Architecture
//!
//! ```text
//! TypeResolver (semantic snapshot)
//!     │
//!     ├──> Type Catalog
//!     │      └─ ClassInfo arena keyed by full name
//!     │
//!     ├──> Relationship Engine
//!     │      ├─ Inheritance index (built once, read-only)
//!     │      ├─ Structural rules (base, interfaces, members, signatures)
//!     │      ├─ Body rules (calls, creations, casts, lambdas)
//!     │      └─ Strongest-wins merge per target
//!     │
//!     ├──> Namespace Hierarchy
//!     │
//!     └──> Graph Document (JSON / DGML)
//! ```

mod analysis;
mod catalog;
mod config;
mod dgml;
mod document;
mod error;
mod graph;
mod hierarchy;
mod namespace;
mod progress;
mod relationships;
mod resolver;
mod types;

pub use analysis::{analyze, Analysis, AnalysisOptions};
pub use catalog::{discover, Catalog};
pub use config::{ClassMapConfig, FocusConfig, OutputFormat};
pub use dgml::to_dgml;
pub use document::{legend, render, render_with, LabelPolicy, RenderOptions};
pub use error::{GraphError, Result};
pub use graph::RelationshipGraph;
pub use hierarchy::NamespaceNode;
pub use namespace::Namespace;
pub use progress::{NoProgress, ProgressReporter, ProgressTracker};
pub use relationships::{infer_relationships, merge_relationships, InferenceStats, InheritanceIndex};
pub use resolver::{SnapshotResolver, TypeResolver};
pub use types::{ClassId, ClassInfo, RelationshipInfo, RelationshipKind};

pub use classmap_protocol as protocol;
