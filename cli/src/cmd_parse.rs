//! `sborcodec parse`: validate and pretty-print a schema definition file.

use anyhow::{Context, Result};
use sborcodec_registry::DefinitionParser;
use std::path::Path;

pub fn run(file: &Path, verbose: bool) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("read definition file '{}'", file.display()))?;
    let definitions = DefinitionParser::parse_all(&content)
        .with_context(|| format!("parse '{}'", file.display()))?;
    if definitions.is_empty() {
        anyhow::bail!("'{}' contains no schema definitions", file.display());
    }

    for def in &definitions {
        let deprecated = if def.deprecated { " [deprecated]" } else { "" };
        println!("✓ Schema '{}' v{} parsed successfully{}", def.name, def.version, deprecated);
        if let Some(description) = &def.description {
            println!("  Description: {description}");
        }
        if let Some(blueprint) = &def.meta.blueprint {
            println!("  Blueprint:   {blueprint}");
        }
        if let Some(category) = &def.meta.category {
            println!("  Category:    {category}");
        }
        println!("  Type:        {}", def.ty);
        if verbose {
            println!("{}", serde_json::to_string_pretty(def)?);
        }
    }
    Ok(())
}
