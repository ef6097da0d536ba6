//! protogen: generate protobuf message schemas from declaration manifests.

mod config;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use config::ProtogenConfig;
use protogen::{Manifest, ManifestFormat, TypeId, TypeRegistry, generate_with};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Generate a protobuf schema from structured type declarations
#[derive(Parser)]
#[command(name = "protogen", version)]
struct Cli {
    /// Declaration manifest (JSON or TOML)
    manifest: PathBuf,

    /// Manifest format (detected from the file extension if not specified)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Top-level type to emit; repeat to emit several, in order (default: all)
    #[arg(short, long = "model")]
    models: Vec<String>,

    /// Type to treat as already emitted by an earlier run
    #[arg(long = "visited")]
    visited: Vec<String>,

    /// Render `optional` on fields declared as Optional
    #[arg(long)]
    optional_keyword: bool,

    /// Spaces before each field line
    #[arg(long)]
    indent: Option<usize>,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

impl From<Format> for ManifestFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => ManifestFormat::Json,
            Format::Toml => ManifestFormat::Toml,
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_names(registry: &TypeRegistry, names: &[String]) -> anyhow::Result<Vec<TypeId>> {
    names
        .iter()
        .map(|name| {
            registry
                .lookup(name)
                .with_context(|| format!("unknown type `{}`", name))
        })
        .collect()
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let format = match cli.format {
        Some(format) => format.into(),
        None => ManifestFormat::from_path(&cli.manifest).with_context(|| {
            format!(
                "cannot detect format of {}; pass --format",
                cli.manifest.display()
            )
        })?,
    };
    let content = std::fs::read_to_string(&cli.manifest)
        .with_context(|| format!("failed to read {}", cli.manifest.display()))?;
    let registry = Manifest::parse(&content, format)
        .and_then(|manifest| manifest.into_registry())
        .with_context(|| format!("failed to load {}", cli.manifest.display()))?;

    let models = if cli.models.is_empty() {
        registry.ids().collect()
    } else {
        resolve_names(&registry, &cli.models)?
    };
    let visited: HashSet<TypeId> = resolve_names(&registry, &cli.visited)?
        .into_iter()
        .collect();

    let mut options = ProtogenConfig::load(&std::env::current_dir()?)?.proto_options();
    if cli.optional_keyword {
        options.optional_keyword = true;
    }
    if let Some(indent) = cli.indent {
        options.indent = indent;
    }

    tracing::debug!(
        types = registry.len(),
        models = models.len(),
        visited = visited.len(),
        "generating schema"
    );
    let schema = generate_with(&registry, &models, Some(&visited), &options);

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &schema)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Generated {}", path.display());
        }
        None => print!("{}", schema),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
