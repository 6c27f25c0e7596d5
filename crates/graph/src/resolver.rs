use classmap_protocol::{DeclarationKind, SemanticSnapshot, TypeDeclaration, TypeRef};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{GraphError, Result};
use crate::namespace::Namespace;

/// Boundary to the compiler front end that resolves declarations and types.
pub trait TypeResolver {
    /// Documents present in the resolver's current view
    fn documents(&self) -> Vec<String>;

    /// Declarations of one document; unknown documents are a hard failure
    fn declarations(&self, document: &str) -> Result<Vec<TypeDeclaration>>;

    fn default_namespace(&self) -> Namespace;

    /// Declared base type of a named type, if the resolver knows its declaration
    fn base_type_of(&self, _full_name: &str) -> Option<TypeRef> {
        None
    }

    fn is_value_type(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Primitive { .. } => true,
            TypeRef::Named { value_type, .. } | TypeRef::Generic { value_type, .. } => *value_type,
            _ => false,
        }
    }

    /// Implicitly convertible to the non-generic enumerable capability
    fn is_enumerable(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Array { .. } | TypeRef::String => true,
            TypeRef::Named { enumerable, .. } | TypeRef::Generic { enumerable, .. } => *enumerable,
            _ => false,
        }
    }
}

/// Resolver backed by a semantic snapshot exported from a compiler front end
pub struct SnapshotResolver {
    snapshot: SemanticSnapshot,
    by_path: HashMap<String, usize>,
    declared: HashMap<String, DeclaredShape>,
    default_namespace: Namespace,
}

#[derive(Debug, Clone, Default)]
struct DeclaredShape {
    base: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    value_type: bool,
}

impl SnapshotResolver {
    pub fn new(snapshot: SemanticSnapshot) -> Self {
        let mut by_path = HashMap::new();
        let mut declared: HashMap<String, DeclaredShape> = HashMap::new();

        for (idx, document) in snapshot.documents.iter().enumerate() {
            by_path.insert(normalize_path(&document.path), idx);
            for decl in &document.declarations {
                let Some(full_name) = &decl.full_name else {
                    continue;
                };
                let shape = declared.entry(full_name.clone()).or_default();
                if shape.base.is_none() {
                    shape.base = decl.base_type.clone();
                }
                shape.interfaces.extend(decl.interfaces.iter().cloned());
                shape.value_type |= decl.kind == DeclarationKind::Struct;
            }
        }

        let default_namespace = Namespace::parse(&snapshot.default_namespace);
        log::debug!(
            "Loaded snapshot: {} documents, {} declared types",
            by_path.len(),
            declared.len()
        );

        Self {
            snapshot,
            by_path,
            declared,
            default_namespace,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self::new(SemanticSnapshot::from_json(raw)?))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Replace the snapshot's default namespace (display stripping only)
    pub fn with_default_namespace(mut self, namespace: &str) -> Self {
        self.default_namespace = Namespace::parse(namespace);
        self
    }

    pub fn snapshot(&self) -> &SemanticSnapshot {
        &self.snapshot
    }

    fn declared_enumerable(&self, full_name: &str, visited: &mut HashSet<String>) -> bool {
        if !visited.insert(full_name.to_string()) {
            return false;
        }
        let Some(shape) = self.declared.get(full_name) else {
            return false;
        };
        shape
            .base
            .iter()
            .chain(shape.interfaces.iter())
            .any(|parent| self.enumerable_with(parent, visited))
    }

    fn enumerable_with(&self, ty: &TypeRef, visited: &mut HashSet<String>) -> bool {
        match ty {
            TypeRef::Array { .. } | TypeRef::String => true,
            TypeRef::Named {
                name, enumerable, ..
            } => *enumerable || self.declared_enumerable(name, visited),
            TypeRef::Generic {
                definition,
                enumerable,
                ..
            } => *enumerable || self.declared_enumerable(definition, visited),
            _ => false,
        }
    }
}

impl TypeResolver for SnapshotResolver {
    fn documents(&self) -> Vec<String> {
        self.snapshot
            .documents
            .iter()
            .map(|d| d.path.clone())
            .collect()
    }

    fn declarations(&self, document: &str) -> Result<Vec<TypeDeclaration>> {
        let idx = self
            .by_path
            .get(&normalize_path(document))
            .copied()
            .ok_or_else(|| GraphError::DocumentNotFound(document.to_string()))?;
        Ok(self.snapshot.documents[idx].declarations.clone())
    }

    fn default_namespace(&self) -> Namespace {
        self.default_namespace.clone()
    }

    fn base_type_of(&self, full_name: &str) -> Option<TypeRef> {
        self.declared
            .get(full_name)
            .and_then(|shape| shape.base.clone())
    }

    fn is_value_type(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Primitive { .. } => true,
            TypeRef::Named {
                name, value_type, ..
            } => *value_type || self.declared.get(name).is_some_and(|s| s.value_type),
            TypeRef::Generic {
                definition,
                value_type,
                ..
            } => *value_type || self.declared.get(definition).is_some_and(|s| s.value_type),
            _ => false,
        }
    }

    fn is_enumerable(&self, ty: &TypeRef) -> bool {
        self.enumerable_with(ty, &mut HashSet::new())
    }
}

fn normalize_path(path: &str) -> String {
    path.trim().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use classmap_protocol::SourceDocument;

    fn snapshot() -> SemanticSnapshot {
        SemanticSnapshot {
            schema_version: 1,
            default_namespace: "Shop".to_string(),
            documents: vec![SourceDocument {
                path: "src\\Orders.cs".to_string(),
                declarations: vec![
                    TypeDeclaration {
                        full_name: Some("Shop.OrderList".to_string()),
                        name: "OrderList".to_string(),
                        base_type: Some(TypeRef::named("Shop.OrderCollection")),
                        ..Default::default()
                    },
                    TypeDeclaration {
                        full_name: Some("Shop.OrderCollection".to_string()),
                        name: "OrderCollection".to_string(),
                        interfaces: vec![TypeRef::collection(
                            "System.Collections.Generic.IEnumerable<T>",
                            vec![TypeRef::named("Shop.Order")],
                        )],
                        ..Default::default()
                    },
                    TypeDeclaration {
                        full_name: Some("Shop.Money".to_string()),
                        name: "Money".to_string(),
                        kind: DeclarationKind::Struct,
                        ..Default::default()
                    },
                ],
            }],
        }
    }

    #[test]
    fn documents_match_normalized_paths() {
        let resolver = SnapshotResolver::new(snapshot());
        assert_eq!(resolver.documents(), ["src\\Orders.cs"]);
        assert_eq!(resolver.declarations("src/Orders.cs").unwrap().len(), 3);
        assert!(matches!(
            resolver.declarations("src/Missing.cs"),
            Err(GraphError::DocumentNotFound(_))
        ));
        assert_eq!(resolver.default_namespace().full_name(), "Shop");
    }

    #[test]
    fn enumerable_follows_declared_bases() {
        let resolver = SnapshotResolver::new(snapshot());
        assert!(resolver.is_enumerable(&TypeRef::named("Shop.OrderList")));
        assert!(resolver.is_enumerable(&TypeRef::array(TypeRef::named("Shop.Order"))));
        assert!(!resolver.is_enumerable(&TypeRef::named("Shop.Money")));
    }

    #[test]
    fn declared_structs_are_value_types() {
        let resolver = SnapshotResolver::new(snapshot());
        assert!(resolver.is_value_type(&TypeRef::named("Shop.Money")));
        assert!(!resolver.is_value_type(&TypeRef::named("Shop.OrderList")));
        assert_eq!(
            resolver.base_type_of("Shop.OrderList"),
            Some(TypeRef::named("Shop.OrderCollection"))
        );
    }

    #[test]
    fn default_namespace_can_be_overridden() {
        let resolver = SnapshotResolver::new(snapshot()).with_default_namespace("Shop.Core");
        assert_eq!(resolver.default_namespace().full_name(), "Shop.Core");
    }
}
