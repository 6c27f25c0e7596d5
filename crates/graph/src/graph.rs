use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::catalog::Catalog;
use crate::error::{GraphError, Result};
use crate::types::RelationshipKind;

/// Directed view of a catalog's relationships (owner -> target)
pub struct RelationshipGraph {
    graph: DiGraph<String, RelationshipKind>,
    index: HashMap<String, NodeIndex>,
}

impl RelationshipGraph {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for (_, info) in catalog.classes() {
            let idx = graph.add_node(info.full_name.clone());
            index.insert(info.full_name.clone(), idx);
        }

        for (_, info) in catalog.classes() {
            let Some(&from) = index.get(&info.full_name) else {
                continue;
            };
            for rel in info.relationships() {
                if let Some(&to) = index.get(&rel.target) {
                    graph.add_edge(from, to, rel.kind);
                }
            }
        }

        Self { graph, index }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn find_node(&self, full_name: &str) -> Option<NodeIndex> {
        self.index.get(full_name).copied()
    }

    /// Types `full_name` relates to, optionally limited to one kind
    pub fn dependencies(
        &self,
        full_name: &str,
        kind: Option<RelationshipKind>,
    ) -> Vec<(String, RelationshipKind)> {
        self.neighbors(full_name, Direction::Outgoing, kind)
    }

    /// Types that relate to `full_name`, optionally limited to one kind
    pub fn dependents(
        &self,
        full_name: &str,
        kind: Option<RelationshipKind>,
    ) -> Vec<(String, RelationshipKind)> {
        self.neighbors(full_name, Direction::Incoming, kind)
    }

    /// Every type within `max_depth` relationship hops of `full_name`, in either
    /// direction, including the type itself
    pub fn neighborhood(&self, full_name: &str, max_depth: usize) -> Result<BTreeSet<String>> {
        let start = self
            .find_node(full_name)
            .ok_or_else(|| GraphError::UnknownType(full_name.to_string()))?;

        let mut visited = BTreeSet::new();
        let mut seen = vec![false; self.graph.node_count()];
        let mut queue = VecDeque::from([(start, 0usize)]);
        seen[start.index()] = true;

        while let Some((current, depth)) = queue.pop_front() {
            visited.insert(self.graph[current].clone());
            if depth == max_depth {
                continue;
            }
            for next in self.graph.neighbors_undirected(current) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back((next, depth + 1));
                }
            }
        }

        Ok(visited)
    }

    fn neighbors(
        &self,
        full_name: &str,
        direction: Direction,
        kind: Option<RelationshipKind>,
    ) -> Vec<(String, RelationshipKind)> {
        let Some(idx) = self.find_node(full_name) else {
            return Vec::new();
        };
        let mut out: Vec<(String, RelationshipKind)> = self
            .graph
            .edges_directed(idx, direction)
            .filter(|edge| kind.map_or(true, |k| *edge.weight() == k))
            .map(|edge| {
                let other = match direction {
                    Direction::Outgoing => edge.target(),
                    Direction::Incoming => edge.source(),
                };
                (self.graph[other].clone(), *edge.weight())
            })
            .collect();
        out.sort();
        out
    }
}
