//! `sborcodec check`: parse one value tree with a registered schema.

use anyhow::{anyhow, Context, Result};
use sborcodec_core::{definition::SchemaRegistry, ParseOptions, Schema, SborValue};
use sborcodec_registry::MemoryRegistry;
use std::path::Path;

/// Read a value tree in the gateway's programmatic JSON form.
pub fn read_value(file: &Path) -> Result<SborValue> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("read value file '{}'", file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("'{}' is not a programmatic SBOR JSON value", file.display()))
}

pub fn run(
    registry: &MemoryRegistry,
    schema: &str,
    version: Option<u32>,
    value_file: &Path,
    options: &ParseOptions,
    as_json: bool,
) -> Result<()> {
    let definition = registry
        .get(schema, version)
        .ok_or_else(|| match version {
            Some(v) => anyhow!("schema '{schema}' v{v} is not registered"),
            None => anyhow!("schema '{schema}' has no non-deprecated version registered"),
        })?;
    let value = read_value(value_file)?;

    match definition.compile().safe_parse_with(&value, options) {
        Ok(parsed) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("✓ {} v{}", definition.name, definition.version);
                println!("{parsed}");
            }
            Ok(())
        }
        Err(err) => {
            if as_json {
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "error": err }))?);
            } else {
                eprintln!("✗ {} v{}", definition.name, definition.version);
                eprintln!("  Kind:    {}", err.kind);
                eprintln!("  Message: {}", err.message);
                if !err.path.is_empty() {
                    eprintln!("  Path:    {}", err.path_string());
                }
            }
            anyhow::bail!("value does not match schema '{}'", definition.name)
        }
    }
}
