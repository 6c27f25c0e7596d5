use classmap_protocol::GraphDocument;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::document::{render_with, RenderOptions};
use crate::error::{GraphError, Result};
use crate::graph::RelationshipGraph;
use crate::hierarchy::NamespaceNode;
use crate::namespace::Namespace;
use crate::progress::{ProgressReporter, ProgressTracker};
use crate::relationships::{infer_relationships, InferenceStats};
use crate::resolver::TypeResolver;

const NO_CLASSES_SELECTED: &str = "No classes are selected.";

#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Minimum percentage step between progress reports
    pub progress_threshold: u8,
    /// Replaces the resolver's default namespace when set
    pub default_namespace: Option<String>,
    /// Checked between documents; a set flag aborts the run
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            progress_threshold: 10,
            default_namespace: None,
            cancel: None,
        }
    }
}

impl AnalysisOptions {
    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Classified types of one run, ready for rendering
#[derive(Debug, Clone)]
pub struct Analysis {
    pub catalog: Catalog,
    pub default_namespace: Namespace,
    pub stats: InferenceStats,
}

/// Discover every type in `selection`, then classify relationships between them.
///
/// Discovery of all documents completes before inference starts, so a cancelled
/// or failed run never yields partially classified types.
pub fn analyze(
    resolver: &dyn TypeResolver,
    selection: &[String],
    options: &AnalysisOptions,
    progress: &mut dyn ProgressReporter,
) -> Result<Analysis> {
    if selection.is_empty() {
        return Err(GraphError::empty_selection(NO_CLASSES_SELECTED));
    }

    let mut catalog = Catalog::new();
    let mut tracker = ProgressTracker::new(selection.len(), options.progress_threshold);

    for document in selection {
        if options.is_cancelled() {
            log::info!("Analysis cancelled before '{document}'");
            return Err(GraphError::Cancelled);
        }

        let declarations = resolver.declarations(document)?;
        log::debug!(
            "Document '{document}': {} declarations",
            declarations.len()
        );
        for declaration in declarations {
            catalog.add_declaration(declaration);
        }
        tracker.increment(progress);
    }
    tracker.finish(progress);

    if catalog.is_empty() {
        return Err(GraphError::empty_selection(NO_CLASSES_SELECTED));
    }

    let stats = infer_relationships(&mut catalog, resolver);
    let default_namespace = options
        .default_namespace
        .as_deref()
        .map(Namespace::parse)
        .unwrap_or_else(|| resolver.default_namespace());

    Ok(Analysis {
        catalog,
        default_namespace,
        stats,
    })
}

impl Analysis {
    pub fn hierarchy(&self) -> NamespaceNode {
        NamespaceNode::build(&self.catalog)
    }

    pub fn graph(&self) -> RelationshipGraph {
        RelationshipGraph::from_catalog(&self.catalog)
    }

    pub fn render(&self, options: RenderOptions) -> GraphDocument {
        render_with(
            &self.hierarchy(),
            &self.catalog,
            &self.default_namespace,
            options,
        )
    }

    /// Same analysis restricted to the types within `depth` hops of `type_name`
    pub fn focus(&self, type_name: &str, depth: usize) -> Result<Analysis> {
        let keep = self.graph().neighborhood(type_name, depth)?;
        let catalog = self.catalog.restrict_to(&keep);
        log::info!(
            "Focused on '{type_name}' (depth {depth}): {} of {} types",
            catalog.len(),
            self.catalog.len()
        );
        Ok(Analysis {
            catalog,
            default_namespace: self.default_namespace.clone(),
            stats: self.stats.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use crate::resolver::SnapshotResolver;
    use classmap_protocol::{SemanticSnapshot, SourceDocument, TypeDeclaration, TypeRef};

    fn decl(full_name: &str, base: Option<&str>) -> TypeDeclaration {
        TypeDeclaration {
            full_name: Some(full_name.to_string()),
            name: full_name.rsplit('.').next().unwrap_or(full_name).to_string(),
            base_type: base.map(TypeRef::named),
            ..Default::default()
        }
    }

    fn resolver() -> SnapshotResolver {
        SnapshotResolver::new(SemanticSnapshot {
            default_namespace: "Shop".to_string(),
            documents: vec![
                SourceDocument {
                    path: "Entity.cs".to_string(),
                    declarations: vec![decl("Shop.Entity", None)],
                },
                SourceDocument {
                    path: "Order.cs".to_string(),
                    declarations: vec![decl("Shop.Order", Some("Shop.Entity"))],
                },
                SourceDocument {
                    path: "Empty.cs".to_string(),
                    declarations: Vec::new(),
                },
            ],
            ..Default::default()
        })
    }

    fn selection(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn empty_selection_is_informational() {
        let err = analyze(&resolver(), &[], &AnalysisOptions::default(), &mut NoProgress)
            .unwrap_err();
        assert!(err.is_informational());

        let err = analyze(
            &resolver(),
            &selection(&["Empty.cs"]),
            &AnalysisOptions::default(),
            &mut NoProgress,
        )
        .unwrap_err();
        assert!(err.is_informational());
    }

    #[test]
    fn missing_document_is_a_hard_failure() {
        let err = analyze(
            &resolver(),
            &selection(&["Nope.cs"]),
            &AnalysisOptions::default(),
            &mut NoProgress,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::DocumentNotFound(_)));
        assert!(!err.is_informational());
    }

    #[test]
    fn cancellation_stops_discovery() {
        let options = AnalysisOptions {
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..Default::default()
        };
        let err = analyze(
            &resolver(),
            &selection(&["Entity.cs"]),
            &options,
            &mut NoProgress,
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::Cancelled));
    }

    #[test]
    fn progress_ends_at_100_and_namespace_override_applies() {
        let mut seen = Vec::new();
        let options = AnalysisOptions {
            default_namespace: Some("Other".to_string()),
            ..Default::default()
        };
        let analysis = analyze(
            &resolver(),
            &selection(&["Entity.cs", "Order.cs"]),
            &options,
            &mut |pct: u8| seen.push(pct),
        )
        .unwrap();

        assert_eq!(seen, vec![50, 100]);
        assert_eq!(analysis.default_namespace.full_name(), "Other");
        assert_eq!(analysis.catalog.len(), 2);
        assert_eq!(analysis.catalog.relationship_count(), 1);
    }

    #[test]
    fn focus_drops_unrelated_types() {
        let resolver = SnapshotResolver::new(SemanticSnapshot {
            documents: vec![SourceDocument {
                path: "All.cs".to_string(),
                declarations: vec![
                    decl("A", None),
                    decl("B", Some("A")),
                    decl("C", Some("B")),
                    decl("Unrelated", None),
                ],
            }],
            ..Default::default()
        });
        let analysis = analyze(
            &resolver,
            &selection(&["All.cs"]),
            &AnalysisOptions::default(),
            &mut NoProgress,
        )
        .unwrap();

        let focused = analysis.focus("C", 1).unwrap();
        let names: Vec<&str> = focused
            .catalog
            .classes()
            .map(|(_, info)| info.full_name.as_str())
            .collect();
        assert_eq!(names, ["B", "C"]);
        assert_eq!(focused.catalog.relationship_count(), 1);

        assert!(matches!(
            analysis.focus("Missing", 1),
            Err(GraphError::UnknownType(_))
        ));
    }
}
