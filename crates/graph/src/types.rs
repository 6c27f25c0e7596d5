use classmap_protocol::EdgeCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::namespace::Namespace;

/// Stable handle of a [`ClassInfo`] inside a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassId(pub(crate) usize);

impl ClassId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of relationship between two types, strongest first.
///
/// The discriminants define the merge order: a lower value wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RelationshipKind {
    /// A derives from base class B
    Inherits = 0,

    /// A implements interface B
    Implements = 1,

    /// A owns B; B does not outlive A
    Composes = 2,

    /// A holds B; B lives independently
    Aggregates = 3,

    /// A references B transiently (parameters, returns, calls)
    Uses = 4,
}

impl RelationshipKind {
    pub const ALL: [RelationshipKind; 5] = [
        Self::Inherits,
        Self::Implements,
        Self::Composes,
        Self::Aggregates,
        Self::Uses,
    ];

    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn is_stronger_than(self, other: Self) -> bool {
        self.rank() < other.rank()
    }

    pub fn strongest(self, other: Self) -> Self {
        if other.is_stronger_than(self) {
            other
        } else {
            self
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inherits => "Inherits",
            Self::Implements => "Implements",
            Self::Composes => "Composes",
            Self::Aggregates => "Aggregates",
            Self::Uses => "Uses",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RelationshipKind> for EdgeCategory {
    fn from(kind: RelationshipKind) -> Self {
        match kind {
            RelationshipKind::Inherits => EdgeCategory::Inherits,
            RelationshipKind::Implements => EdgeCategory::Implements,
            RelationshipKind::Composes => EdgeCategory::Composes,
            RelationshipKind::Aggregates => EdgeCategory::Aggregates,
            RelationshipKind::Uses => EdgeCategory::Uses,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipInfo {
    /// Full name of the related type
    pub target: String,
    pub kind: RelationshipKind,
}

impl RelationshipInfo {
    pub fn new(target: impl Into<String>, kind: RelationshipKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }
}

/// Cataloged class, interface or record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Fully qualified name (`Shop.Orders.Order`)
    pub full_name: String,

    /// Short name (`Order`)
    pub name: String,

    pub is_interface: bool,

    /// Sorted by target, one entry per target
    relationships: Vec<RelationshipInfo>,
}

impl ClassInfo {
    pub fn new(full_name: impl Into<String>, name: impl Into<String>, is_interface: bool) -> Self {
        Self {
            full_name: full_name.into(),
            name: name.into(),
            is_interface,
            relationships: Vec::new(),
        }
    }

    pub fn relationships(&self) -> &[RelationshipInfo] {
        &self.relationships
    }

    pub fn relationship_to(&self, target: &str) -> Option<RelationshipKind> {
        self.relationships
            .binary_search_by(|r| r.target.as_str().cmp(target))
            .ok()
            .map(|idx| self.relationships[idx].kind)
    }

    pub fn namespace(&self) -> Namespace {
        Namespace::split_type_name(&self.full_name).0
    }

    /// Replace the relationship set with an already merged one
    pub(crate) fn set_relationships(&mut self, mut relationships: Vec<RelationshipInfo>) {
        relationships.retain(|r| r.target != self.full_name);
        relationships.sort_by(|a, b| a.target.cmp(&b.target));
        relationships.dedup_by(|later, earlier| {
            if later.target == earlier.target {
                earlier.kind = earlier.kind.strongest(later.kind);
                true
            } else {
                false
            }
        });
        self.relationships = relationships;
    }

    pub(crate) fn retain_relationships(&mut self, keep: impl Fn(&RelationshipInfo) -> bool) {
        self.relationships.retain(keep);
    }
}
