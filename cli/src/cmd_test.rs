//! `sborcodec test`: run golden test fixture files.
//!
//! Fixture format (JSON):
//! ```json
//! {
//!   "description": "Fungible vault balance",
//!   "schema": "FungibleVault",
//!   "version": 1,
//!   "value": { "kind": "Tuple", "fields": [ ... ] },
//!   "expected": { "resource_address": "resource_rdx1...", "amount": "12.5" }
//! }
//! ```
//! A fixture that should fail carries `"expectedError": { "kind", "path" }`
//! (both optional) instead of `expected`.

use anyhow::Result;
use sborcodec_core::{definition::SchemaRegistry, ParseOptions, Schema, SborErrorKind, SborValue};
use sborcodec_registry::MemoryRegistry;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    #[serde(default)]
    pub description: Option<String>,
    pub schema: String,
    #[serde(default)]
    pub version: Option<u32>,
    pub value: SborValue,
    #[serde(default)]
    pub expected: Option<serde_json::Value>,
    #[serde(default)]
    pub expected_error: Option<ExpectedError>,
}

#[derive(Debug, Deserialize)]
pub struct ExpectedError {
    #[serde(default)]
    pub kind: Option<SborErrorKind>,
    #[serde(default)]
    pub path: Option<Vec<String>>,
}

pub fn run(
    fixtures_dir: &Path,
    registry: &MemoryRegistry,
    schema_filter: Option<&str>,
    options: &ParseOptions,
    verbose: bool,
) -> Result<()> {
    if !fixtures_dir.exists() {
        println!("Fixtures directory '{}' not found, skipping", fixtures_dir.display());
        return Ok(());
    }

    let fixture_paths = collect_json_files(fixtures_dir);
    let mut passed = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for path in &fixture_paths {
        let fixture: Fixture = match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|c| serde_json::from_str(&c).map_err(anyhow::Error::from))
        {
            Ok(f) => f,
            Err(e) => {
                eprintln!("  ✗ {}: {}", path.display(), e);
                failed += 1;
                continue;
            }
        };

        if schema_filter.is_some_and(|s| s != fixture.schema) {
            skipped += 1;
            continue;
        }

        let desc = fixture.description.as_deref().unwrap_or(&fixture.schema);
        let errors = check_fixture(registry, &fixture, options);
        if errors.is_empty() {
            println!("  ✓ {desc}");
            if verbose {
                println!("      {}", path.display());
            }
            passed += 1;
        } else {
            eprintln!("  ✗ {desc}");
            for e in &errors {
                eprintln!("      {e}");
            }
            failed += 1;
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed, {} skipped  (total fixtures: {})",
        passed,
        failed,
        skipped,
        fixture_paths.len()
    );

    if failed > 0 {
        anyhow::bail!("{} fixture(s) failed", failed);
    }
    Ok(())
}

/// Run one fixture and describe every way it differs from its expectation.
pub fn check_fixture(
    registry: &MemoryRegistry,
    fixture: &Fixture,
    options: &ParseOptions,
) -> Vec<String> {
    let Some(definition) = registry.get(&fixture.schema, fixture.version) else {
        return vec![format!("schema '{}' not registered", fixture.schema)];
    };
    debug!(schema = %definition.name, version = definition.version, "running fixture");
    let result = definition.compile().safe_parse_with(&fixture.value, options);

    let mut errors = Vec::new();
    match (&fixture.expected, &fixture.expected_error, result) {
        (Some(expected), None, Ok(parsed)) => match serde_json::to_value(&parsed) {
            Ok(actual) if &actual == expected => {}
            Ok(actual) => errors.push(format!("output mismatch: got {actual}, want {expected}")),
            Err(e) => errors.push(format!("output not serializable: {e}")),
        },
        (Some(_), None, Err(e)) => errors.push(format!("parse error: {e}")),
        (None, Some(_), Ok(parsed)) => errors.push(format!("expected an error, parsed {parsed}")),
        (None, Some(want), Err(e)) => {
            if let Some(kind) = want.kind.filter(|k| *k != e.kind) {
                errors.push(format!("error kind: got {}, want {kind}", e.kind));
            }
            if let Some(path) = want.path.as_ref().filter(|p| **p != e.path) {
                errors.push(format!("error path: got {:?}, want {:?}", e.path, path));
            }
        }
        _ => errors.push("fixture needs exactly one of expected / expectedError".to_string()),
    }
    errors
}

fn collect_json_files(dir: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use sborcodec_registry::DefinitionParser;
    use serde_json::json;

    fn registry() -> MemoryRegistry {
        let reg = MemoryRegistry::new();
        reg.add(
            DefinitionParser::parse(
                "schema Pair:\n  version: 1\n  type:\n    struct:\n      flag: bool\n      count: number\n",
            )
            .unwrap(),
        )
        .unwrap();
        reg
    }

    fn fixture(raw: serde_json::Value) -> Fixture {
        serde_json::from_value(raw).unwrap()
    }

    fn pair_value() -> serde_json::Value {
        json!({
            "kind": "Tuple",
            "fields": [
                { "kind": "Bool", "field_name": "flag", "value": true },
                { "kind": "U32", "field_name": "count", "value": "7" }
            ]
        })
    }

    #[test]
    fn matching_output_passes() {
        let f = fixture(json!({
            "schema": "Pair",
            "value": pair_value(),
            "expected": { "flag": true, "count": 7 }
        }));
        assert!(check_fixture(&registry(), &f, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn wrong_expectation_is_reported() {
        let f = fixture(json!({
            "schema": "Pair",
            "value": pair_value(),
            "expectedError": { "kind": "missing_fields" }
        }));
        let errors = check_fixture(&registry(), &f, &ParseOptions::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("expected an error"), "{errors:?}");
    }

    #[test]
    fn error_kind_and_path_are_compared() {
        let f = fixture(json!({
            "schema": "Pair",
            "value": { "kind": "Tuple", "fields": [
                { "kind": "String", "field_name": "flag", "value": "yes" },
                { "kind": "U32", "field_name": "count", "value": "7" }
            ]},
            "expectedError": { "kind": "wrong_kind", "path": ["count"] }
        }));
        let errors = check_fixture(&registry(), &f, &ParseOptions::default());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("error path"), "{errors:?}");
    }

    #[test]
    fn wide_integers_compare_as_text() {
        let reg = registry();
        reg.add(DefinitionParser::parse("schema Supply:\n  version: 1\n  type: number\n").unwrap())
            .unwrap();
        let f = fixture(json!({
            "schema": "Supply",
            "value": { "kind": "U128", "value": "340282366920938463463374607431768211455" },
            "expected": "340282366920938463463374607431768211455"
        }));
        assert!(check_fixture(&reg, &f, &ParseOptions::default()).is_empty());
    }

    #[test]
    fn unknown_schema_fails() {
        let f = fixture(json!({ "schema": "Nope", "value": pair_value(), "expected": null }));
        let errors = check_fixture(&registry(), &f, &ParseOptions::default());
        assert_eq!(errors, vec!["schema 'Nope' not registered"]);
    }
}
