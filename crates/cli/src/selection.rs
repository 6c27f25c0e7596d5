use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

/// Picks the documents of a snapshot to analyze.
///
/// Explicit paths are kept as given so that unknown documents surface as errors
/// from the resolver. Glob patterns only ever match documents the resolver lists.
pub(crate) struct DocumentSelector {
    paths: Vec<String>,
    globs: Option<GlobSet>,
}

impl DocumentSelector {
    pub(crate) fn new(paths: &[String], patterns: &[String]) -> Result<Self> {
        let globs = if patterns.is_empty() {
            None
        } else {
            let mut builder = GlobSetBuilder::new();
            for pattern in patterns {
                let glob = GlobBuilder::new(&normalize(pattern))
                    .literal_separator(true)
                    .build()
                    .with_context(|| format!("Invalid glob pattern '{pattern}'"))?;
                builder.add(glob);
            }
            Some(builder.build().context("Failed to compile glob patterns")?)
        };
        Ok(Self {
            paths: paths.to_vec(),
            globs,
        })
    }

    fn selects_everything(&self) -> bool {
        self.paths.is_empty() && self.globs.is_none()
    }

    /// Selected documents in a stable order, duplicates removed
    pub(crate) fn select(&self, available: &[String]) -> Vec<String> {
        if self.selects_everything() {
            return available.to_vec();
        }

        let mut selected: Vec<String> = Vec::new();
        for path in &self.paths {
            if !selected.iter().any(|s| normalize(s) == normalize(path)) {
                selected.push(path.clone());
            }
        }
        if let Some(globs) = &self.globs {
            for doc in available {
                if globs.is_match(normalize(doc))
                    && !selected.iter().any(|s| normalize(s) == normalize(doc))
                {
                    selected.push(doc.clone());
                }
            }
        }
        selected
    }
}

fn normalize(path: &str) -> String {
    path.trim().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<String> {
        ["src/Orders/Order.cs", "src\\Orders\\Line.cs", "tests/OrderTests.cs"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn no_filters_selects_all() {
        let selector = DocumentSelector::new(&[], &[]).unwrap();
        assert_eq!(selector.select(&docs()), docs());
    }

    #[test]
    fn globs_match_normalized_paths() {
        let selector = DocumentSelector::new(&[], &["src/**/*.cs".to_string()]).unwrap();
        assert_eq!(
            selector.select(&docs()),
            vec!["src/Orders/Order.cs".to_string(), "src\\Orders\\Line.cs".to_string()]
        );
    }

    #[test]
    fn explicit_paths_are_kept_and_deduplicated() {
        let selector = DocumentSelector::new(
            &["missing.cs".to_string(), "tests/OrderTests.cs".to_string()],
            &["tests/*.cs".to_string()],
        )
        .unwrap();
        assert_eq!(
            selector.select(&docs()),
            vec!["missing.cs".to_string(), "tests/OrderTests.cs".to_string()]
        );
    }

    #[test]
    fn unmatched_glob_selects_nothing() {
        let selector = DocumentSelector::new(&[], &["*.vb".to_string()]).unwrap();
        assert!(selector.select(&docs()).is_empty());
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(DocumentSelector::new(&[], &["src/[".to_string()]).is_err());
    }
}
