use clap::ValueEnum;
use classmap_graph::{LabelPolicy, OutputFormat, RelationshipKind};

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum FormatFlag {
    Dgml,
    Json,
}

impl FormatFlag {
    pub(crate) const fn as_domain(self) -> OutputFormat {
        match self {
            FormatFlag::Dgml => OutputFormat::Dgml,
            FormatFlag::Json => OutputFormat::Json,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum LabelsFlag {
    Short,
    Full,
}

impl LabelsFlag {
    pub(crate) const fn as_domain(self) -> LabelPolicy {
        match self {
            LabelsFlag::Short => LabelPolicy::Short,
            LabelsFlag::Full => LabelPolicy::Full,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum KindFlag {
    Inherits,
    Implements,
    Composes,
    Aggregates,
    Uses,
}

impl KindFlag {
    pub(crate) const fn as_domain(self) -> RelationshipKind {
        match self {
            KindFlag::Inherits => RelationshipKind::Inherits,
            KindFlag::Implements => RelationshipKind::Implements,
            KindFlag::Composes => RelationshipKind::Composes,
            KindFlag::Aggregates => RelationshipKind::Aggregates,
            KindFlag::Uses => RelationshipKind::Uses,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum SchemaTarget {
    /// Semantic snapshot accepted as input
    Snapshot,
    /// Graph document written by `generate --format json`
    Graph,
}
