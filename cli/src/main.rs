use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use relicport_core::file_utils::find_files_with_extension;
use relicport_core::models::CanonicalRelic;
use relicport_core::{GameCatalog, ImportOutput, ImportPipeline, ImportSummary, ScannerConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "relicport",
    version = "0.1.0",
    about = "Import relic scanner snapshots into canonical character and relic records",
    long_about = None
)]
struct Cli {
    /// Path to log file
    #[arg(long, global = true, default_value = "/tmp/relicport.log")]
    log_file: PathBuf,

    /// Verbosity level (repeat for more verbose output)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to game catalog JSON
    #[arg(long, global = true, env = "RELICPORT_CATALOG", default_value = "catalog.json")]
    catalog: PathBuf,

    /// Built-in scanner preset (kelz, reliquary)
    #[arg(long, global = true, default_value = "kelz")]
    scanner: String,

    /// Scanner config TOML, overrides --scanner
    #[arg(long, global = true)]
    scanner_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one snapshot
    Import {
        /// Snapshot JSON file
        #[arg(long)]
        input: PathBuf,
        /// Output JSON file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Quiet mode (0=show messages/warnings, 1=suppress messages, 2=suppress both)
        #[arg(long, default_value_t = 0)]
        quiet: u8,
    },

    /// Import every snapshot under a directory
    ImportDir {
        /// Directory containing snapshot .json files
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory for normalized output files
        #[arg(long)]
        output_dir: PathBuf,
        /// Quiet mode (0=show messages/warnings, 1=suppress messages, 2=suppress both)
        #[arg(long, default_value_t = 0)]
        quiet: u8,
    },

    /// Import one snapshot and write its relics as CSV
    ExportRelics {
        /// Snapshot JSON file
        #[arg(long)]
        input: PathBuf,
        /// Output CSV file
        #[arg(long = "csv")]
        csv_path: PathBuf,
    },
}

impl Commands {
    fn quiet(&self) -> u8 {
        match self {
            Commands::Import { quiet, .. } | Commands::ImportDir { quiet, .. } => *quiet,
            Commands::ExportRelics { .. } => 0,
        }
    }
}

/// Verbosity sets the global level; quiet caps the library's per-record
/// messages (1 keeps warnings, 2 keeps errors only).
fn build_filter(verbose: u8, quiet: u8) -> Result<EnvFilter> {
    let filter_level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let mut filter = EnvFilter::from_default_env().add_directive(filter_level.into());
    match quiet {
        0 => {}
        1 => filter = filter.add_directive("relicport_core=warn".parse()?),
        _ => filter = filter.add_directive("relicport_core=error".parse()?),
    }
    Ok(filter)
}

fn setup_logging(verbose: u8, quiet: u8, log_file: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let filter = build_filter(verbose, quiet)?;

    let file_appender = tracing_appender::rolling::never(
        log_file.parent().unwrap_or(Path::new(".")),
        log_file.file_name().unwrap_or(std::ffi::OsStr::new("relicport.log")),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().with_writer(std::io::stderr).with_ansi(true))
        .with(fmt::Layer::new().with_writer(non_blocking).with_ansi(false));

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(guard)
}

fn load_pipeline(cli: &Cli) -> Result<ImportPipeline> {
    let config = match &cli.scanner_config {
        Some(path) => ScannerConfig::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load scanner config: {}", e))?,
        None => ScannerConfig::preset(&cli.scanner)?,
    };

    if !cli.catalog.exists() {
        anyhow::bail!("Catalog not found: {:?}", cli.catalog);
    }
    let catalog = GameCatalog::from_file(&cli.catalog)
        .map_err(|e| anyhow::anyhow!("Failed to load catalog: {}", e))?;

    info!("Using scanner '{}' with catalog {:?}", config.name, cli.catalog);
    Ok(ImportPipeline::new(Arc::new(catalog), config))
}

fn write_output(output: &ImportOutput, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

fn log_output(output: &ImportOutput, quiet: u8) {
    if quiet == 0 {
        info!(
            "Accepted {} characters and {} relics, dropped {}",
            output.characters.len(),
            output.relics.len(),
            output.warnings.len()
        );
    }
}

/// Flat relic layout for spreadsheets.
#[derive(Serialize)]
struct RelicRow<'a> {
    part: &'static str,
    set_id: &'a str,
    set: &'a str,
    grade: u8,
    enhance: u8,
    main_stat: &'static str,
    main_value: f64,
    substats: String,
    equipped_by: &'a str,
    verified: bool,
}

impl<'a> From<&'a CanonicalRelic> for RelicRow<'a> {
    fn from(relic: &'a CanonicalRelic) -> Self {
        let substats = relic
            .substats
            .iter()
            .map(|s| format!("{}={}", s.stat.as_str(), s.value))
            .collect::<Vec<_>>()
            .join(";");

        Self {
            part: relic.part.as_str(),
            set_id: &relic.set_id,
            set: &relic.set,
            grade: relic.grade,
            enhance: relic.enhance,
            main_stat: relic.main.stat.as_str(),
            main_value: relic.main.value,
            substats,
            equipped_by: relic.equipped_by.as_deref().unwrap_or(""),
            verified: relic.verified,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _guard = setup_logging(cli.verbose, cli.command.quiet(), &cli.log_file)?;

    info!("Starting relicport CLI");

    let pipeline = load_pipeline(&cli)?;

    match cli.command {
        Commands::Import { input, output, quiet } => {
            if quiet == 0 {
                info!("Importing {:?}", input);
            }

            let result = pipeline.parse_file(&input)?;
            log_output(&result, quiet);

            match output {
                Some(path) => {
                    write_output(&result, &path)?;
                    if quiet == 0 {
                        info!("Wrote {:?}", path);
                    }
                }
                None => println!("{}", serde_json::to_string_pretty(&result)?),
            }
        }
        Commands::ImportDir { input_dir, output_dir, quiet } => {
            let files = find_files_with_extension(&input_dir, "json")?;
            if quiet == 0 {
                info!("Found {} snapshot files in {:?}", files.len(), input_dir);
            }
            std::fs::create_dir_all(&output_dir)?;

            // Import all snapshots in parallel
            let results: Vec<_> = files
                .par_iter()
                .map(|path| {
                    let relative = path.strip_prefix(&input_dir).unwrap_or(path.as_path());
                    let target = output_dir.join(relative);
                    let result = pipeline
                        .parse_file(path)
                        .map_err(anyhow::Error::from)
                        .and_then(|output| write_output(&output, &target).map(|_| output));
                    (path, result)
                })
                .collect();

            let mut summary = ImportSummary::new();
            for (path, result) in &results {
                match result {
                    Ok(output) => {
                        summary.add_output(output);
                        if quiet == 0 {
                            info!(
                                "Imported {:?}: {} characters, {} relics",
                                path,
                                output.characters.len(),
                                output.relics.len()
                            );
                        }
                        if quiet < 2 && !output.warnings.is_empty() {
                            tracing::warn!("{:?}: {} records dropped", path, output.warnings.len());
                        }
                    }
                    Err(e) => {
                        summary.add_failure();
                        if quiet < 2 {
                            tracing::warn!("Failed to import {:?}: {}", path, e);
                        }
                    }
                }
            }

            if quiet == 0 {
                info!("--- Summary ---");
                info!("Snapshots: {}", summary.snapshots);
                info!("Failed: {}", summary.failed);
                info!("Characters: {} ({} dropped)", summary.characters, summary.dropped_characters);
                info!("Relics: {} ({} dropped)", summary.relics, summary.dropped_relics);
                info!("Advisories: {}", summary.advisories);
            }
        }
        Commands::ExportRelics { input, csv_path } => {
            let result = pipeline.parse_file(&input)?;
            log_output(&result, 0);

            let mut writer = csv::Writer::from_path(&csv_path)
                .with_context(|| format!("Failed to create {:?}", csv_path))?;
            for relic in &result.relics {
                writer.serialize(RelicRow::from(relic))?;
            }
            writer.flush()?;

            info!("Wrote {} relics to {:?}", result.relics.len(), csv_path);
        }
    }

    Ok(())
}
