//! Relationship inference.
//!
//! Every cataloged type is scanned in two passes over its declarations:
//! structural rules (base type, interfaces, members, signatures) and body rules
//! (calls, object creations, casts, type tests, lambdas). Each rule produces
//! candidates; candidates pointing at generic instantiations are expanded into
//! their type arguments, filtered against the catalog and finally merged so that
//! one relationship per target survives, the strongest one.

use classmap_protocol::{Body, Expression, Member, TypeDeclaration, TypeRef, Visibility};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::catalog::Catalog;
use crate::resolver::TypeResolver;
use crate::types::{ClassId, RelationshipInfo, RelationshipKind};

/// Per-run summary of the inference pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InferenceStats {
    pub types: usize,
    pub candidates: usize,
    pub discarded: usize,
    pub recorded: usize,
    pub by_kind: BTreeMap<RelationshipKind, usize>,
}

/// Ancestor chains of every cataloged type: the type itself plus every base
/// type up to, but excluding, the universal root object.
#[derive(Debug, Clone, Default)]
pub struct InheritanceIndex {
    chains: Vec<HashSet<String>>,
}

impl InheritanceIndex {
    pub fn build(catalog: &Catalog, resolver: &dyn TypeResolver) -> Self {
        let chains = catalog
            .classes()
            .map(|(id, info)| {
                let mut chain = HashSet::new();
                chain.insert(info.full_name.clone());

                let mut current = declared_base(catalog.declarations_of(id)).cloned();
                while let Some(base) = current.take() {
                    if base.is_root_object() {
                        break;
                    }
                    let Some(key) = identity_key(&base) else {
                        break;
                    };
                    if !chain.insert(key.to_string()) {
                        log::debug!("Inheritance cycle through {key} in {}", info.full_name);
                        break;
                    }
                    current = match catalog.find(key) {
                        Some(base_id) => declared_base(catalog.declarations_of(base_id)).cloned(),
                        None => resolver.base_type_of(key),
                    };
                }
                chain
            })
            .collect();

        Self { chains }
    }

    pub fn chain(&self, id: ClassId) -> Option<&HashSet<String>> {
        self.chains.get(id.index())
    }

    /// Is `ancestor` the type itself or one of its base types
    pub fn is_ancestor(&self, id: ClassId, ancestor: &str) -> bool {
        self.chain(id).is_some_and(|chain| chain.contains(ancestor))
    }
}

/// Infer relationships for every cataloged type and record them in place.
///
/// The inheritance index is complete before any type is scanned; scanning only
/// reads shared state, and results are written once all types are scanned.
pub fn infer_relationships(catalog: &mut Catalog, resolver: &dyn TypeResolver) -> InferenceStats {
    let index = InheritanceIndex::build(catalog, resolver);
    let mut stats = InferenceStats::default();

    let scanned: Vec<(ClassId, Vec<RelationshipInfo>)> = catalog
        .ids()
        .map(|id| {
            let mut scanner = TypeScanner::new(catalog, &index, resolver, id);
            scanner.scan();
            stats.types += 1;
            stats.candidates += scanner.seen;
            stats.discarded += scanner.discarded;
            (id, merge_relationships(scanner.candidates))
        })
        .collect();

    for (id, relationships) in scanned {
        for rel in &relationships {
            *stats.by_kind.entry(rel.kind).or_default() += 1;
        }
        stats.recorded += relationships.len();
        if let Some(info) = catalog.get_mut(id) {
            info.set_relationships(relationships);
        }
    }

    log::info!(
        "Inferred {} relationships for {} types ({} candidates, {} discarded)",
        stats.recorded,
        stats.types,
        stats.candidates,
        stats.discarded
    );
    stats
}

/// Fold candidates into one relationship per target, keeping the strongest kind.
///
/// The fold is commutative and idempotent; output is sorted by target.
pub fn merge_relationships(
    candidates: impl IntoIterator<Item = RelationshipInfo>,
) -> Vec<RelationshipInfo> {
    candidates
        .into_iter()
        .fold(
            BTreeMap::<String, RelationshipKind>::new(),
            |mut merged, candidate| {
                merged
                    .entry(candidate.target)
                    .and_modify(|kind| *kind = kind.strongest(candidate.kind))
                    .or_insert(candidate.kind);
                merged
            },
        )
        .into_iter()
        .map(|(target, kind)| RelationshipInfo { target, kind })
        .collect()
}

struct TypeScanner<'a> {
    catalog: &'a Catalog,
    index: &'a InheritanceIndex,
    resolver: &'a dyn TypeResolver,
    id: ClassId,
    owner: &'a str,
    declarations: &'a [TypeDeclaration],
    candidates: Vec<RelationshipInfo>,
    seen: usize,
    discarded: usize,
}

impl<'a> TypeScanner<'a> {
    fn new(
        catalog: &'a Catalog,
        index: &'a InheritanceIndex,
        resolver: &'a dyn TypeResolver,
        id: ClassId,
    ) -> Self {
        let owner = catalog
            .get(id)
            .map(|info| info.full_name.as_str())
            .unwrap_or_default();
        Self {
            catalog,
            index,
            resolver,
            id,
            owner,
            declarations: catalog.declarations_of(id),
            candidates: Vec::new(),
            seen: 0,
            discarded: 0,
        }
    }

    fn scan(&mut self) {
        let declarations = self.declarations;

        if let Some(base) = declared_base(declarations) {
            if !base.is_root_object() {
                self.emit(base, RelationshipKind::Inherits);
            }
        }

        for decl in declarations {
            for interface in &decl.interfaces {
                self.emit(interface, RelationshipKind::Implements);
            }
        }

        let ctor_params: Vec<&TypeRef> = declarations
            .iter()
            .flat_map(|d| d.members.iter())
            .filter_map(|m| match m {
                Member::Constructor {
                    parameters,
                    is_static: false,
                    ..
                } => Some(parameters),
                _ => None,
            })
            .flatten()
            .filter_map(|p| p.ty.as_ref())
            .collect();

        for decl in declarations {
            for member in &decl.members {
                self.scan_member(member, &ctor_params);
            }
        }
    }

    fn scan_member(&mut self, member: &Member, ctor_params: &[&TypeRef]) {
        match member {
            Member::Field { ty, visibility, .. } | Member::Property { ty, visibility, .. } => {
                let Some(ty) = ty else {
                    return;
                };
                if self.is_owner(ty) {
                    return;
                }
                let kind = self.classify_member(ty, *visibility, ctor_params);
                self.emit(ty, kind);
            }
            Member::Constructor {
                parameters,
                is_static,
                body,
            } => {
                // Static constructors take no part in construction of instances.
                let kind = if *is_static {
                    RelationshipKind::Uses
                } else {
                    RelationshipKind::Aggregates
                };
                for ty in parameters.iter().filter_map(|p| p.ty.as_ref()) {
                    self.emit(ty, kind);
                }
                if let Some(body) = body {
                    self.scan_body(body, *is_static);
                }
            }
            Member::Method {
                parameters,
                return_type,
                is_static,
                body,
                ..
            } => {
                for ty in parameters.iter().filter_map(|p| p.ty.as_ref()) {
                    self.emit(ty, RelationshipKind::Uses);
                }
                if let Some(ret) = return_type {
                    if !self.is_owner(ret) {
                        self.emit(ret, RelationshipKind::Uses);
                    }
                }
                if let Some(body) = body {
                    self.scan_body(body, *is_static);
                }
            }
        }
    }

    fn classify_member(
        &self,
        ty: &TypeRef,
        visibility: Visibility,
        ctor_params: &[&TypeRef],
    ) -> RelationshipKind {
        if self.resolver.is_value_type(ty) || matches!(ty, TypeRef::String) {
            return RelationshipKind::Composes;
        }
        if self.resolver.is_enumerable(ty) {
            return RelationshipKind::Aggregates;
        }
        if ctor_params.contains(&ty) {
            return RelationshipKind::Aggregates;
        }
        if visibility.is_public() {
            RelationshipKind::Aggregates
        } else {
            RelationshipKind::Composes
        }
    }

    fn scan_body(&mut self, body: &Body, is_static: bool) {
        for expr in &body.expressions {
            match expr {
                Expression::Call {
                    declaring_type,
                    type_arguments,
                } => {
                    if let Some(declaring) = declaring_type {
                        if !self.is_related(declaring) && !self.is_descendant(declaring) {
                            self.emit(declaring, RelationshipKind::Uses);
                        }
                    }
                    for arg in type_arguments.iter().flatten() {
                        self.emit(arg, RelationshipKind::Uses);
                    }
                }
                Expression::ObjectCreation {
                    created_type: Some(created),
                } => {
                    if !is_static && !self.is_related(created) {
                        self.emit(created, RelationshipKind::Composes);
                    }
                }
                Expression::Cast {
                    target_type: Some(target),
                }
                | Expression::TypeTest {
                    target_type: Some(target),
                    ..
                } => {
                    if !self.is_related(target) {
                        self.emit(target, RelationshipKind::Uses);
                    }
                }
                Expression::Lambda { parameters } => {
                    for ty in parameters.iter().flatten() {
                        self.emit(ty, RelationshipKind::Uses);
                    }
                }
                Expression::ObjectCreation { created_type: None }
                | Expression::Cast { target_type: None }
                | Expression::TypeTest {
                    target_type: None, ..
                } => {}
            }
        }
    }

    fn is_owner(&self, ty: &TypeRef) -> bool {
        identity_key(ty) == Some(self.owner)
    }

    /// The owner itself or one of its ancestors
    fn is_related(&self, ty: &TypeRef) -> bool {
        identity_key(ty)
            .is_some_and(|key| key == self.owner || self.index.is_ancestor(self.id, key))
    }

    /// A cataloged type deriving from the owner
    fn is_descendant(&self, ty: &TypeRef) -> bool {
        identity_key(ty)
            .and_then(|key| self.catalog.find(key))
            .is_some_and(|other| self.index.is_ancestor(other, self.owner))
    }

    /// Record a candidate, expanding constructed generics and arrays into their arguments
    fn emit(&mut self, ty: &TypeRef, kind: RelationshipKind) {
        let mut visited: HashSet<&TypeRef> = HashSet::new();
        let mut worklist = vec![ty];

        while let Some(current) = worklist.pop() {
            if !visited.insert(current) {
                continue;
            }
            match current {
                TypeRef::Generic { arguments, .. } => worklist.extend(arguments.iter().rev()),
                TypeRef::Array { element } => worklist.push(element),
                TypeRef::Named { name, .. } => self.accept(name, kind),
                TypeRef::Object
                | TypeRef::String
                | TypeRef::Primitive { .. }
                | TypeRef::TypeParameter { .. }
                | TypeRef::Void => {}
            }
        }
    }

    fn accept(&mut self, target: &str, kind: RelationshipKind) {
        self.seen += 1;
        if target == self.owner || !self.catalog.contains(target) {
            self.discarded += 1;
            return;
        }
        self.candidates.push(RelationshipInfo::new(target, kind));
    }
}

/// First non-empty base type among a type's declarations
fn declared_base(declarations: &[TypeDeclaration]) -> Option<&TypeRef> {
    declarations.iter().find_map(|d| d.base_type.as_ref())
}

/// Name used to compare a type with catalog and hierarchy entries.
///
/// Constructed generics compare by their definition.
fn identity_key(ty: &TypeRef) -> Option<&str> {
    match ty {
        TypeRef::Generic { definition, .. } => Some(definition),
        other => other.named_identity(),
    }
}
