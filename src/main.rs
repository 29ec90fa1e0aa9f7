use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use configuration::ReportSettings;
use core_types::{AggregationView, FilterState, LiveFilters};
use orchestrator::{Orchestrator, ViewCatalog};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The main entry point for the Vista report generator.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Optional: VISTA_* overrides may live in a .env file.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => handle_generate(args).await,
        Commands::Preview(args) => handle_preview(args),
        Commands::Views(args) => handle_views(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Consolidated, filter-aware text reports over pre-aggregated sales views.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the report artifact for the current filter selection.
    Generate(GenerateArgs),
    /// Print the report to stdout without writing a file.
    Preview(SourceArgs),
    /// List the views in a catalog file.
    Views(CatalogArgs),
}

#[derive(Parser)]
struct CatalogArgs {
    /// JSON file holding the aggregation views.
    #[arg(long)]
    views: PathBuf,
}

#[derive(Parser)]
struct SourceArgs {
    #[command(flatten)]
    catalog: CatalogArgs,

    /// JSON file with the filter selections (dimension -> list of values).
    /// Without it the report covers all data.
    #[arg(long)]
    filters: Option<PathBuf>,

    /// Settings file. Defaults to `vista.toml` in the working directory, if present.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct GenerateArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// The report date stamped on the artifact (format: YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    as_of: Option<NaiveDate>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.source.config.as_deref())?;
    let _log_guard = configuration::logging::init(settings.log_dir.as_deref())?;
    let orchestrator = build_orchestrator(&args.source, settings)?;

    let as_of = args
        .as_of
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let artifact = orchestrator
        .generate(as_of)
        .await
        .context("Report generation failed")?;

    println!("{}", artifact.path.display());
    Ok(())
}

fn handle_preview(args: SourceArgs) -> anyhow::Result<()> {
    let settings = load_settings(args.config.as_deref())?;
    let _log_guard = configuration::logging::init(settings.log_dir.as_deref())?;
    let orchestrator = build_orchestrator(&args, settings)?;

    let report = orchestrator.preview().context("Report preview failed")?;
    print!("{}", report);
    Ok(())
}

fn handle_views(args: CatalogArgs) -> anyhow::Result<()> {
    let _log_guard = configuration::logging::init(None)?;
    let catalog = load_catalog(&args.views)?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["View", "Columns", "Rows"]);
    for summary in catalog.summaries() {
        table.add_row(vec![
            Cell::new(summary.name),
            Cell::new(summary.columns.join(", ")),
            Cell::new(summary.row_count).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");
    Ok(())
}

// ==============================================================================
// Input Loading
// ==============================================================================

fn load_settings(path: Option<&Path>) -> anyhow::Result<ReportSettings> {
    configuration::load_settings(path).context("Failed to load report settings")
}

fn build_orchestrator(args: &SourceArgs, settings: ReportSettings) -> anyhow::Result<Orchestrator> {
    let catalog = load_catalog(&args.catalog.views)?;
    let filters = match &args.filters {
        Some(path) => load_filters(path)?,
        None => FilterState::new(),
    };

    let orchestrator = Orchestrator::new(
        settings,
        Arc::new(LiveFilters::new(filters)),
        Arc::new(catalog),
    )?;
    Ok(orchestrator)
}

fn load_catalog(path: &Path) -> anyhow::Result<ViewCatalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read view catalog '{}'", path.display()))?;
    let views: Vec<AggregationView> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse view catalog '{}'", path.display()))?;
    tracing::info!(views = views.len(), path = %path.display(), "View catalog loaded.");
    Ok(ViewCatalog::from_views(views))
}

fn load_filters(path: &Path) -> anyhow::Result<FilterState> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read filters '{}'", path.display()))?;
    let filters: FilterState = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse filters '{}'", path.display()))?;
    tracing::info!(%filters, "Filter selection loaded.");
    Ok(filters)
}
