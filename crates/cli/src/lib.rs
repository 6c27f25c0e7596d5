use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use classmap_graph::{
    analyze, to_dgml, Analysis, AnalysisOptions, ClassMapConfig, FocusConfig, GraphError,
    OutputFormat, RelationshipGraph, RenderOptions, SnapshotResolver, TypeResolver,
};
use classmap_protocol::{graph_document_schema, serialize_json_pretty, snapshot_schema};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::flags::{FormatFlag, KindFlag, LabelsFlag, SchemaTarget};
use crate::progress::BarReporter;
use crate::selection::DocumentSelector;

mod flags;
mod progress;
mod selection;
mod settings;

/// Exit code for benign conditions such as an empty selection
const EXIT_INFO: u8 = 2;

#[derive(Parser)]
#[command(name = "classmap")]
#[command(about = "Generate class relationship diagrams from semantic snapshots", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors and hide progress
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze selected documents and write a class diagram
    Generate(GenerateArgs),

    /// List documents available in a snapshot
    Documents(DocumentsArgs),

    /// Show relationships of one type
    Relations(RelationsArgs),

    /// Print the JSON Schema of the snapshot input or graph output
    Schema(SchemaArgs),
}

#[derive(Args)]
struct SelectionArgs {
    /// Semantic snapshot (JSON) exported by the compiler front end
    snapshot: PathBuf,

    /// Document to analyze (repeatable); defaults to every document
    #[arg(short, long = "document")]
    documents: Vec<String>,

    /// Glob over document paths (repeatable)
    #[arg(short, long = "select")]
    select: Vec<String>,

    /// Override the project's default namespace
    #[arg(long)]
    default_namespace: Option<String>,

    /// Settings file (default: ./classmap.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct GenerateArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output encoding
    #[arg(short, long, value_enum)]
    format: Option<FormatFlag>,

    /// Class node labels
    #[arg(long, value_enum)]
    labels: Option<LabelsFlag>,

    /// Keep only types around this fully qualified type
    #[arg(long)]
    focus: Option<String>,

    /// Relationship hops kept around --focus
    #[arg(long)]
    depth: Option<usize>,

    /// Write the diagram to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct DocumentsArgs {
    snapshot: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct RelationsArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Fully qualified type name
    #[arg(long = "type")]
    type_name: String,

    /// Show types that relate to this type instead of its own relationships
    #[arg(long)]
    dependents: bool,

    /// Only this relationship kind
    #[arg(long, value_enum)]
    kind: Option<KindFlag>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SchemaArgs {
    #[arg(value_enum, default_value = "snapshot")]
    target: SchemaTarget,
}

#[derive(Serialize)]
struct RelationOutput {
    source: String,
    target: String,
    kind: String,
}

pub fn main_entry() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let quiet = cli.quiet;
    let outcome = match cli.command {
        Commands::Generate(args) => run_generate(args, quiet),
        Commands::Documents(args) => run_documents(args),
        Commands::Relations(args) => run_relations(args, quiet),
        Commands::Schema(args) => run_schema(args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => report_error(&err),
    }
}

fn report_error(err: &anyhow::Error) -> ExitCode {
    if let Some(graph_err) = err.downcast_ref::<GraphError>() {
        if graph_err.is_informational() {
            eprintln!("{graph_err}");
            return ExitCode::from(EXIT_INFO);
        }
    }
    eprintln!("Error: {err:#}");
    ExitCode::FAILURE
}

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to resolve working directory")
}

fn load_resolver(path: &Path) -> Result<SnapshotResolver> {
    SnapshotResolver::from_path(path)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

/// Merge file settings with command-line overrides
fn effective_config(selection: &SelectionArgs) -> Result<ClassMapConfig> {
    let mut config = settings::load_config(selection.config.as_deref(), &current_dir()?)?;
    if let Some(ns) = &selection.default_namespace {
        config.default_namespace = Some(ns.clone());
    }
    Ok(config)
}

fn run_analysis(
    selection: &SelectionArgs,
    config: &ClassMapConfig,
    quiet: bool,
) -> Result<Analysis> {
    let resolver = load_resolver(&selection.snapshot)?;
    let selector = DocumentSelector::new(&selection.documents, &selection.select)?;
    let documents = selector.select(&resolver.documents());
    log::info!(
        "Analyzing {} of {} documents",
        documents.len(),
        resolver.documents().len()
    );

    let options = AnalysisOptions {
        progress_threshold: config.progress_threshold,
        default_namespace: config.default_namespace.clone(),
        cancel: None,
    };
    let mut bar = BarReporter::new(quiet);
    let analysis = analyze(&resolver, &documents, &options, &mut bar);
    bar.finish();
    Ok(analysis?)
}

fn run_generate(args: GenerateArgs, quiet: bool) -> Result<()> {
    let mut config = effective_config(&args.selection)?;
    if let Some(format) = args.format {
        config.format = format.as_domain();
    }
    if let Some(labels) = args.labels {
        config.labels = labels.as_domain();
    }
    if let Some(type_name) = args.focus {
        let depth = args
            .depth
            .or(config.focus.as_ref().map(|f| f.depth))
            .unwrap_or(1);
        config.focus = Some(FocusConfig { type_name, depth });
    } else if let (Some(depth), Some(focus)) = (args.depth, config.focus.as_mut()) {
        focus.depth = depth;
    }
    config.validate()?;

    let mut analysis = run_analysis(&args.selection, &config, quiet)?;
    if let Some(focus) = &config.focus {
        analysis = analysis.focus(&focus.type_name, focus.depth)?;
    }

    let document = analysis.render(RenderOptions {
        labels: config.labels,
    });
    let text = match config.format {
        OutputFormat::Dgml => to_dgml(&document)?,
        OutputFormat::Json => serialize_json_pretty(&document)?,
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!(
                "Wrote {} diagram with {} nodes and {} edges to {}",
                config.format.extension(),
                document.nodes.len(),
                document.edges.len(),
                path.display()
            );
        }
        None => print_stdout(text.trim_end())?,
    }
    Ok(())
}

fn run_documents(args: DocumentsArgs) -> Result<()> {
    let resolver = load_resolver(&args.snapshot)?;
    let documents = resolver.documents();
    if args.json {
        print_stdout(&serialize_json_pretty(&documents)?)
    } else {
        print_stdout(&documents.join("\n"))
    }
}

fn run_relations(args: RelationsArgs, quiet: bool) -> Result<()> {
    let config = effective_config(&args.selection)?;
    config.validate()?;
    let analysis = run_analysis(&args.selection, &config, quiet)?;
    let graph = RelationshipGraph::from_catalog(&analysis.catalog);

    if graph.find_node(&args.type_name).is_none() {
        return Err(GraphError::UnknownType(args.type_name).into());
    }

    let kind = args.kind.map(KindFlag::as_domain);
    let rows: Vec<RelationOutput> = if args.dependents {
        graph
            .dependents(&args.type_name, kind)
            .into_iter()
            .map(|(source, kind)| RelationOutput {
                source,
                target: args.type_name.clone(),
                kind: kind.as_str().to_string(),
            })
            .collect()
    } else {
        graph
            .dependencies(&args.type_name, kind)
            .into_iter()
            .map(|(target, kind)| RelationOutput {
                source: args.type_name.clone(),
                target,
                kind: kind.as_str().to_string(),
            })
            .collect()
    };

    if args.json {
        return print_stdout(&serialize_json_pretty(&rows)?);
    }
    let lines: Vec<String> = rows
        .iter()
        .map(|r| format!("{} --{}--> {}", r.source, r.kind, r.target))
        .collect();
    print_stdout(&lines.join("\n"))
}

fn run_schema(args: SchemaArgs) -> Result<()> {
    let schema = match args.target {
        SchemaTarget::Snapshot => snapshot_schema()?,
        SchemaTarget::Graph => graph_document_schema()?,
    };
    print_stdout(&schema)
}
