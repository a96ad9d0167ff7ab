//! SBORCodec CLI: the command-line interface for SBORCodec.
//!
//! # Commands
//! ```text
//! sborcodec parse    --file <defs.yaml>
//! sborcodec check    --schema <Name> --value <tree.json>
//! sborcodec test     --fixtures <dir>
//! sborcodec bench    --schema <Name> --value <tree.json> --iterations <N>
//! sborcodec schemas  list|validate
//! sborcodec info
//! ```

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use sborcodec_core::{definition::SchemaRegistry, ParseOptions};
use sborcodec_registry::MemoryRegistry;
use std::path::{Path, PathBuf};
use tracing::info;

mod cmd_check;
mod cmd_parse;
mod cmd_test;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(
    name = "sborcodec",
    about = "Schema-driven parser for Radix ledger values: SBORCodec CLI",
    long_about = "
SBORCodec CLI: validate schema definitions and parse programmatic SBOR JSON
value trees (as returned by the Radix Gateway) into typed output.

CONFIG FILE (--config, YAML, every key optional):
  log:        { level: info, components: { sborcodec-registry: debug }, json: false }
  parse:      { max_depth: 64 }
  schema_dir: ./schemas
",
    version
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a schema definition file
    Parse {
        /// Path to the .yaml definition file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Parse a value tree with a registered schema
    Check {
        /// Schema name, e.g. FungibleVault
        #[arg(long)]
        schema: String,
        /// Schema version (default: latest non-deprecated)
        #[arg(long)]
        version: Option<u32>,
        /// Path to the value tree JSON file
        #[arg(long)]
        value: PathBuf,
        /// Directory containing schema definitions (default: config `schema_dir`)
        #[arg(long)]
        schema_dir: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run golden test fixtures
    Test {
        /// Directory containing fixture JSON files
        #[arg(long, default_value = "./fixtures")]
        fixtures: PathBuf,
        /// Directory containing schema definitions (default: config `schema_dir`)
        #[arg(long)]
        schema_dir: Option<PathBuf>,
        /// Only run fixtures for this schema name
        #[arg(long)]
        schema: Option<String>,
    },

    /// Benchmark parse throughput
    Bench {
        /// Schema name to benchmark
        #[arg(long)]
        schema: String,
        /// Value tree parsed on every iteration
        #[arg(long)]
        value: PathBuf,
        /// Directory containing schema definitions (default: config `schema_dir`)
        #[arg(long)]
        schema_dir: Option<PathBuf>,
        /// Number of iterations
        #[arg(long, default_value_t = 100_000)]
        iterations: usize,
        /// Number of parallel Rayon threads (0 = use default)
        #[arg(long, default_value_t = 0)]
        threads: usize,
    },

    /// Schema registry management
    Schemas {
        #[command(subcommand)]
        action: SchemasAction,
    },

    /// Show SBORCodec build and capability info
    Info,
}

#[derive(Subcommand)]
enum SchemasAction {
    /// List all schemas in a directory
    List {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Validate all schema files in a directory
    Validate {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if cli.verbose {
        config.log.level = "debug".into();
    }
    sborcodec_observability::init_tracing(&config.log)
        .map_err(|e| anyhow!("initialise logging: {e}"))?;

    let schema_dir = |dir: Option<PathBuf>| dir.unwrap_or_else(|| config.schema_dir.clone());

    match cli.command {
        Commands::Parse { file } => cmd_parse::run(&file, cli.verbose),

        Commands::Check { schema, version, value, schema_dir: dir, json } => {
            let registry = load_registry(&schema_dir(dir))?;
            cmd_check::run(&registry, &schema, version, &value, &config.parse, json)
        }

        Commands::Test { fixtures, schema_dir: dir, schema } => {
            let registry = load_registry(&schema_dir(dir))?;
            cmd_test::run(&fixtures, &registry, schema.as_deref(), &config.parse, cli.verbose)
        }

        Commands::Bench { schema, value, schema_dir: dir, iterations, threads } => {
            let registry = load_registry(&schema_dir(dir))?;
            cmd_bench(&registry, &schema, &value, iterations, threads, &config.parse)
        }

        Commands::Schemas { action } => match action {
            SchemasAction::List { dir } => cmd_schemas_list(&schema_dir(dir)),
            SchemasAction::Validate { dir } => cmd_schemas_validate(&schema_dir(dir)),
        },

        Commands::Info => cmd_info(),
    }
}

fn load_registry(dir: &Path) -> Result<MemoryRegistry> {
    let registry = MemoryRegistry::new();
    let loaded = registry
        .load_directory(dir)
        .with_context(|| format!("load schemas from '{}'", dir.display()))?;
    if loaded == 0 {
        anyhow::bail!("no schemas found in '{}'", dir.display());
    }
    Ok(registry)
}

// ─── Command implementations ─────────────────────────────────────────────────

fn cmd_bench(
    registry: &MemoryRegistry,
    schema: &str,
    value_file: &Path,
    iterations: usize,
    threads: usize,
    options: &ParseOptions,
) -> Result<()> {
    use sborcodec_batch::{BatchEngine, BatchRequest};
    use std::time::Instant;

    let definition = registry
        .get(schema, None)
        .ok_or_else(|| anyhow!("schema '{schema}' not registered"))?;
    let value = cmd_check::read_value(value_file)?;
    let batch = vec![value; iterations];

    let engine = BatchEngine::new(definition.compile());
    let request = BatchRequest::new(batch)
        .concurrency(threads)
        .options(options.clone());

    println!("Benchmarking '{}' v{}: {} iterations ...", definition.name, definition.version, iterations);
    info!(schema, iterations, threads, "bench started");

    let start = Instant::now();
    let result = engine.parse(request)?;
    let elapsed = start.elapsed();

    let total = result.total_input as f64;
    let parsed = result.values.len();
    let throughput = total / elapsed.as_secs_f64();

    println!("Results:");
    println!("  Total:      {} values", result.total_input);
    println!("  Parsed:     {} ({:.1}%)", parsed, 100.0 * parsed as f64 / total.max(1.0));
    println!("  Failed:     {}", result.skipped);
    println!("  Duration:   {:.3}s", elapsed.as_secs_f64());
    println!("  Throughput: {:.0} values/sec", throughput);

    Ok(())
}

fn cmd_schemas_list(dir: &Path) -> Result<()> {
    let registry = MemoryRegistry::new();
    let count = registry
        .load_directory(dir)
        .with_context(|| format!("load schemas from '{}'", dir.display()))?;

    println!("Loaded {} definitions from '{}'", count, dir.display());
    for name in registry.all_names() {
        let versions: Vec<String> = registry
            .history(&name)
            .iter()
            .map(|d| {
                if d.deprecated {
                    format!("v{} (deprecated)", d.version)
                } else {
                    format!("v{}", d.version)
                }
            })
            .collect();
        println!("  {:30} {}", name, versions.join(", "));
    }
    Ok(())
}

fn cmd_schemas_validate(dir: &Path) -> Result<()> {
    use sborcodec_registry::DefinitionParser;

    let mut ok = 0;
    let mut errors = 0;

    for entry in walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "yaml" || ext == "yml"))
    {
        let path = entry.path();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read '{}'", path.display()))?;
        match DefinitionParser::parse_all(&content) {
            Ok(definitions) => {
                ok += definitions.len();
                println!("  ✓ {} ({} definitions)", path.display(), definitions.len());
            }
            Err(e) => {
                errors += 1;
                eprintln!("  ✗ {}: {}", path.display(), e);
            }
        }
    }

    println!("\n{} definitions valid, {} files with errors", ok, errors);
    if errors > 0 {
        anyhow::bail!("{} definition files failed validation", errors);
    }
    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("SBORCodec v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Capabilities:");
    println!("  ✓ Programmatic SBOR JSON   (Radix Gateway value trees)");
    println!("  ✓ Typed schema combinators (struct, tuple, enum, option, map, array)");
    println!("  ✓ Integer range checks     (i8..i128, u8..u128)");
    println!("  ✓ Recursive schemas        (Arc/Weak knot tying)");
    println!("  ✓ YAML schema definitions  (multi-doc, versioned)");
    println!("  ✓ In-memory registry       (indexed by name + version)");
    println!("  ✓ Parallel batch parse     (Rayon)");
    println!();
    println!("Bundled schemas:             vault, account, pool, validator");
    Ok(())
}
