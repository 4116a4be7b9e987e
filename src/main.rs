use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use colmeta::{
    config,
    metadata::{load_model, DiagnosticLevel},
    resolver::{LogSink, MemorySink, ResolutionLogger, TeeSink},
    scanner::EntityScanner,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// colmeta - Resolve column metadata for an entity model
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Model description (YAML, or JSON when the extension is .json)
    #[arg(long)]
    model: PathBuf,

    /// Resolver configuration file (YAML); defaults to COLMETA_* environment variables
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore the deprecated foreign_key annotation
    #[arg(long)]
    no_legacy_foreign_key: bool,

    /// Disable type-shape navigation inference
    #[arg(long)]
    no_structural_heuristic: bool,

    /// Disable `<Nav>Id` foreign-key pairing
    #[arg(long)]
    no_foreign_key_convention: bool,

    /// Extra type names to treat as scalars (repeatable)
    #[arg(long = "scalar-type")]
    extra_scalar_types: Vec<String>,

    /// Scan entities on worker threads
    #[arg(long)]
    parallel: bool,

    /// Maximum concurrently scanned entities
    #[arg(long)]
    max_workers: Option<usize>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Print only the SHA-256 fingerprint of the report
    #[arg(long)]
    fingerprint: bool,
}

impl From<&Cli> for config::CliConfig {
    fn from(cli: &Cli) -> Self {
        config::CliConfig {
            no_legacy_foreign_key: cli.no_legacy_foreign_key,
            no_structural_heuristic: cli.no_structural_heuristic,
            no_foreign_key_convention: cli.no_foreign_key_convention,
            extra_scalar_types: cli.extra_scalar_types.clone(),
            parallel: cli.parallel,
            max_workers: cli.max_workers,
        }
    }
}

fn main() {
    // Initialize logger - defaults to INFO level, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    match run(Cli::parse()) {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every property resolved.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut resolver_config = match &cli.config {
        Some(path) => config::ResolverConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => config::ResolverConfig::from_env().context("reading COLMETA_* environment")?,
    };
    resolver_config.merge_cli(&config::CliConfig::from(&cli));
    resolver_config.check().context("validating configuration")?;

    let model = load_model(&cli.model)?;

    let memory = MemorySink::new();
    let sinks: Vec<&dyn ResolutionLogger> = vec![&LogSink, &memory];
    let logger = TeeSink::new(sinks);

    let scan = EntityScanner::from_config(&resolver_config, &logger).scan_model(&model)?;
    let report = scan.report();

    if cli.fingerprint {
        println!("{}", report.fingerprint()?);
    } else {
        match cli.format {
            Format::Json => println!("{}", report.to_json()?),
            Format::Yaml => print!("{}", report.to_yaml()?),
        }
    }

    let warnings = memory
        .entries()
        .iter()
        .filter(|entry| entry.level == DiagnosticLevel::Warning)
        .count();
    if warnings > 0 {
        log::warn!(
            "{} warnings across {} diagnostics; see the report for details",
            warnings,
            memory.len()
        );
    }
    Ok(!scan.has_unresolved())
}
