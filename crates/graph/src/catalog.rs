use classmap_protocol::TypeDeclaration;
use std::collections::{BTreeSet, HashMap};

use crate::types::{ClassId, ClassInfo};

/// Arena of cataloged types for one analysis run.
///
/// Entries are never removed; every declaration that contributed to an entry
/// (partial types contribute several) is kept for relationship inference.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    classes: Vec<ClassInfo>,
    declarations: Vec<Vec<TypeDeclaration>>,
    index: HashMap<String, ClassId>,
}

/// Build a catalog from every declaration visible in the selected sources
pub fn discover(declarations: impl IntoIterator<Item = TypeDeclaration>) -> Catalog {
    let mut catalog = Catalog::new();
    for declaration in declarations {
        catalog.add_declaration(declaration);
    }
    catalog
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a declaration, reusing the entry of an already known identity.
    ///
    /// Returns `None` when the declaration has no resolvable identity.
    pub fn add_declaration(&mut self, declaration: TypeDeclaration) -> Option<ClassId> {
        let Some(full_name) = declaration
            .full_name
            .clone()
            .filter(|name| !name.trim().is_empty())
        else {
            log::debug!(
                "Skipping declaration '{}' without resolvable identity",
                declaration.name
            );
            return None;
        };

        if let Some(&id) = self.index.get(&full_name) {
            self.declarations[id.0].push(declaration);
            return Some(id);
        }

        let id = ClassId(self.classes.len());
        self.classes.push(ClassInfo::new(
            full_name.clone(),
            declaration.name.clone(),
            declaration.is_interface(),
        ));
        self.declarations.push(vec![declaration]);
        self.index.insert(full_name, id);
        Some(id)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn find(&self, full_name: &str) -> Option<ClassId> {
        self.index.get(full_name).copied()
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.index.contains_key(full_name)
    }

    pub fn get(&self, id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: ClassId) -> Option<&mut ClassInfo> {
        self.classes.get_mut(id.0)
    }

    pub fn lookup(&self, full_name: &str) -> Option<&ClassInfo> {
        self.find(full_name).and_then(|id| self.get(id))
    }

    pub fn declarations_of(&self, id: ClassId) -> &[TypeDeclaration] {
        self.declarations
            .get(id.0)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> {
        (0..self.classes.len()).map(ClassId)
    }

    /// Classes in discovery order
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &ClassInfo)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, info)| (ClassId(idx), info))
    }

    pub fn relationship_count(&self) -> usize {
        self.classes.iter().map(|c| c.relationships().len()).sum()
    }

    /// Copy of the catalog limited to `names`, dropping relationships that leave the set
    pub fn restrict_to(&self, names: &BTreeSet<String>) -> Catalog {
        let mut restricted = Catalog::new();
        for (id, info) in self.classes() {
            if !names.contains(&info.full_name) {
                continue;
            }
            let new_id = ClassId(restricted.classes.len());
            let mut info = info.clone();
            info.retain_relationships(|r| names.contains(&r.target));
            restricted.index.insert(info.full_name.clone(), new_id);
            restricted.classes.push(info);
            restricted
                .declarations
                .push(self.declarations_of(id).to_vec());
        }
        restricted
    }
}
