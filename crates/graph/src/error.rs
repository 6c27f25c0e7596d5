use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// Nothing to analyze; hosts show this as a notice, not a failure
    #[error("{0}")]
    EmptySelection(String),

    #[error("Document not found in the current view: {0}")]
    DocumentNotFound(String),

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    pub fn empty_selection(msg: impl Into<String>) -> Self {
        Self::EmptySelection(msg.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// True for benign conditions the user should see as a plain message
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::EmptySelection(_))
    }
}
