use std::collections::BTreeMap;

use crate::catalog::Catalog;
use crate::namespace::Namespace;
use crate::types::ClassId;

/// Namespace tree derived from a catalog; children are ordered by segment.
#[derive(Debug, Clone, Default)]
pub struct NamespaceNode {
    namespace: Namespace,
    classes: Vec<ClassId>,
    children: BTreeMap<String, NamespaceNode>,
}

impl NamespaceNode {
    pub fn new(namespace: Namespace) -> Self {
        Self {
            namespace,
            classes: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Build the tree for every cataloged type
    pub fn build(catalog: &Catalog) -> Self {
        let mut root = Self::new(Namespace::root());
        for (id, info) in catalog.classes() {
            let (namespace, _) = Namespace::split_type_name(&info.full_name);
            let mut current = &mut root;
            for part in namespace.parts() {
                let child_namespace = current.namespace.append(part.clone());
                current = current
                    .children
                    .entry(part.clone())
                    .or_insert_with(|| Self::new(child_namespace));
            }
            current.classes.push(id);
        }
        root
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Classes declared directly in this namespace
    pub fn classes(&self) -> &[ClassId] {
        &self.classes
    }

    pub fn children(&self) -> impl Iterator<Item = &NamespaceNode> {
        self.children.values()
    }

    pub fn child(&self, segment: &str) -> Option<&NamespaceNode> {
        self.children.get(segment)
    }

    pub fn owns_classes(&self) -> bool {
        !self.classes.is_empty()
    }

    pub fn find(&self, namespace: &Namespace) -> Option<&NamespaceNode> {
        namespace
            .parts()
            .iter()
            .try_fold(self, |node, part| node.child(part))
    }

    /// Pre-order walk: a node, then its children in segment order
    pub fn walk(&self) -> Vec<&NamespaceNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.values().rev());
        }
        out
    }

    pub fn total_classes(&self) -> usize {
        self.walk().iter().map(|n| n.classes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::discover;
    use classmap_protocol::TypeDeclaration;

    fn decl(full_name: &str) -> TypeDeclaration {
        TypeDeclaration {
            full_name: Some(full_name.to_string()),
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_nested_tree_with_intermediate_nodes() {
        let catalog = discover(vec![
            decl("Shop.Orders.Order"),
            decl("Shop.Orders.Billing.Invoice"),
            decl("Shop.Customer"),
            decl("Global"),
        ]);
        let root = NamespaceNode::build(&catalog);

        assert_eq!(root.classes(), [catalog.find("Global").unwrap()]);
        let shop = root.child("Shop").unwrap();
        assert_eq!(shop.namespace().full_name(), "Shop");
        assert_eq!(shop.classes().len(), 1);

        let billing = root
            .find(&Namespace::parse("Shop.Orders.Billing"))
            .unwrap();
        assert_eq!(billing.namespace().full_name(), "Shop.Orders.Billing");
        assert_eq!(billing.classes(), [catalog.find("Shop.Orders.Billing.Invoice").unwrap()]);
        assert_eq!(root.total_classes(), 4);
    }

    #[test]
    fn namespaces_without_own_classes_hold_none() {
        let catalog = discover(vec![decl("Company.Product.Module.Type")]);
        let root = NamespaceNode::build(&catalog);

        let names: Vec<(String, bool)> = root
            .walk()
            .iter()
            .map(|n| (n.namespace().full_name(), n.owns_classes()))
            .collect();
        assert_eq!(
            names,
            vec![
                (String::new(), false),
                ("Company".to_string(), false),
                ("Company.Product".to_string(), false),
                ("Company.Product.Module".to_string(), true),
            ]
        );
    }
}
