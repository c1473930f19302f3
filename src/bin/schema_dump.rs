//! Schema Dump CLI
//!
//! Resolves a schema document and prints its type graph.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use racksdb_schema::{SchemaConfig, SchemaFileLoader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-dump")]
#[command(about = "Resolve a schema document and dump its types, objects and content")]
struct Cli {
    /// Path to the schema document (defaults to the configured path)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Additional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not print defined types
    #[arg(long)]
    no_types: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = SchemaConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    let schema_path = cli
        .schema
        .or_else(|| config.schema_path())
        .context("no schema document given, use --schema or set [schema] path")?;

    let types = config.type_directory()?;
    let schema = SchemaFileLoader::new(&schema_path)
        .load(types)
        .with_context(|| format!("resolving schema {}", schema_path.display()))?;

    let show_types = config.dump.show_types && !cli.no_types;
    let stdout = std::io::stdout();
    schema.dump_with(&mut stdout.lock(), show_types)?;
    Ok(())
}
