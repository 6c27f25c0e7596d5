use serde::{Deserialize, Serialize};

use crate::document::LabelPolicy;
use crate::error::{GraphError, Result};

/// Settings for one class map run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassMapConfig {
    /// Overrides the default namespace reported by the resolver
    pub default_namespace: Option<String>,

    /// Class node labels
    pub labels: LabelPolicy,

    /// Output encoding
    pub format: OutputFormat,

    /// Minimum percentage step between progress reports
    pub progress_threshold: u8,

    /// Limit the diagram to the neighborhood of one type
    pub focus: Option<FocusConfig>,
}

impl Default for ClassMapConfig {
    fn default() -> Self {
        Self {
            default_namespace: None,
            labels: LabelPolicy::Short,
            format: OutputFormat::Dgml,
            progress_threshold: 10,
            focus: None,
        }
    }
}

impl ClassMapConfig {
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.progress_threshold) {
            return Err(GraphError::invalid_config(format!(
                "progress_threshold ({}) must be within 1..=100",
                self.progress_threshold
            )));
        }

        if let Some(namespace) = &self.default_namespace {
            if namespace.starts_with('.') || namespace.ends_with('.') || namespace.contains("..") {
                return Err(GraphError::invalid_config(format!(
                    "default_namespace '{namespace}' is not a dotted name"
                )));
            }
        }

        if let Some(focus) = &self.focus {
            if focus.type_name.trim().is_empty() {
                return Err(GraphError::invalid_config("focus.type_name must not be empty"));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Visual Studio directed graph markup
    #[default]
    Dgml,
    /// Graph document as JSON
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Dgml => "dgml",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Fully qualified name of the focused type
    pub type_name: String,

    /// Relationship hops kept around the focused type
    #[serde(default = "default_focus_depth")]
    pub depth: usize,
}

fn default_focus_depth() -> usize {
    1
}
