//! Schema definition document parser.
//!
//! Definitions are YAML documents that name a schema, version it, and
//! describe its shape with a small type language:
//!
//! ```yaml
//! schema FungibleVault:
//!   version: 1
//!   meta: { blueprint: FungibleVault, category: vault }
//!   type:
//!     struct:
//!       resource_address: address
//!       amount: decimal
//! ```
//!
//! A single file may contain multiple documents separated by `---`. Use
//! `parse_all()` to get every definition, or `parse()` for the first one.

use sborcodec_core::{
    definition::{DefinitionMeta, SchemaDefinition},
    error::RegistryError,
    types::{PayloadType, SchemaType},
};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

// ─── Raw serde types ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DefinitionRaw {
    version: u32,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    meta: MetaRaw,
    // Parsed by hand below: the type language is not a serde enum.
    #[serde(rename = "type")]
    ty: Value,
}

#[derive(Debug, Deserialize, Default)]
struct MetaRaw {
    #[serde(default)]
    blueprint: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    package: Option<String>,
}

// ─── Parser ───────────────────────────────────────────────────────────────────

pub struct DefinitionParser;

impl DefinitionParser {
    /// Parse the first definition document from a YAML string.
    pub fn parse(yaml: &str) -> Result<SchemaDefinition, RegistryError> {
        let mut definitions = Self::parse_all(yaml)?;
        if definitions.is_empty() {
            return Err(RegistryError::ParseError("empty schema definition file".into()));
        }
        Ok(definitions.remove(0))
    }

    /// Parse every definition document, in file order.
    pub fn parse_all(yaml: &str) -> Result<Vec<SchemaDefinition>, RegistryError> {
        let mut definitions = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            let value = Value::deserialize(doc).map_err(|e| RegistryError::ParseError(e.to_string()))?;
            // Skip empty documents (e.g. a trailing `---`)
            if value.is_null() {
                continue;
            }
            definitions.push(Self::parse_value(value)?);
        }
        Ok(definitions)
    }

    /// Parse a single document. Its one top-level key is `schema <Name>`.
    fn parse_value(value: Value) -> Result<SchemaDefinition, RegistryError> {
        let Value::Mapping(mapping) = value else {
            return Err(RegistryError::ParseError(
                "schema definition must be a YAML mapping".into(),
            ));
        };

        let (name, body) = mapping
            .into_iter()
            .find_map(|(k, v)| {
                let name = k.as_str()?.strip_prefix("schema ")?.trim().to_string();
                Some((name, v))
            })
            .ok_or_else(|| RegistryError::ParseError("missing 'schema <Name>' key".into()))?;

        if name.is_empty() {
            return Err(RegistryError::ParseError("schema name is empty".into()));
        }

        let raw: DefinitionRaw = serde_yaml::from_value(body)
            .map_err(|e| RegistryError::ParseError(format!("schema '{name}': {e}")))?;

        let ty = parse_type(&raw.ty)
            .map_err(|e| RegistryError::ParseError(format!("schema '{name}': {e}")))?;

        Ok(SchemaDefinition {
            name,
            version: raw.version,
            description: raw.description,
            deprecated: raw.deprecated,
            meta: DefinitionMeta {
                blueprint: raw.meta.blueprint,
                category: raw.meta.category,
                package: raw.meta.package,
            },
            ty,
        })
    }
}

/// Parse a type expression: a type name, or a single-key mapping naming a
/// composite.
pub fn parse_type(value: &Value) -> Result<SchemaType, String> {
    match value {
        Value::String(s) => parse_type_name(s),
        Value::Mapping(m) => {
            let (key, body) = single_entry(m)?;
            match key {
                "struct" => Ok(SchemaType::Struct {
                    fields: parse_fields(body)?,
                    allow_missing: false,
                }),
                "struct_allowing_missing" => Ok(SchemaType::Struct {
                    fields: parse_fields(body)?,
                    allow_missing: true,
                }),
                "tuple" => Ok(SchemaType::Tuple(parse_elements(body)?)),
                "enum" => Ok(SchemaType::Enum(parse_variants(body)?)),
                "option" => Ok(SchemaType::Option(Box::new(parse_type(body)?))),
                "array" => Ok(SchemaType::Array(Box::new(parse_type(body)?))),
                "map" => {
                    let entry = |name: &str| {
                        body.get(name)
                            .ok_or_else(|| format!("map is missing '{name}'"))
                            .and_then(parse_type)
                    };
                    Ok(SchemaType::Map {
                        key: Box::new(entry("key")?),
                        value: Box::new(entry("value")?),
                    })
                }
                other => Err(format!("unknown composite type: '{other}'")),
            }
        }
        other => Err(format!("expected a type name or mapping, got {other:?}")),
    }
}

/// Type names, with `T[]` and `option<T>` sugar.
fn parse_type_name(s: &str) -> Result<SchemaType, String> {
    let s = s.trim();
    if let Some(inner) = s.strip_suffix("[]") {
        return Ok(SchemaType::Array(Box::new(parse_type_name(inner)?)));
    }
    if let Some(inner) = s.strip_prefix("option<").and_then(|r| r.strip_suffix('>')) {
        return Ok(SchemaType::Option(Box::new(parse_type_name(inner)?)));
    }
    SchemaType::leaf(s).ok_or_else(|| format!("unknown type: '{s}'"))
}

fn single_entry(m: &Mapping) -> Result<(&str, &Value), String> {
    let mut iter = m.iter();
    match (iter.next(), iter.next()) {
        (Some((k, v)), None) => k
            .as_str()
            .map(|k| (k, v))
            .ok_or_else(|| format!("composite type key must be a string, got {k:?}")),
        _ => Err(format!(
            "composite type must be a mapping with exactly one key, got {} keys",
            m.len()
        )),
    }
}

/// Struct fields in document order. `{}` and `~` both mean no fields.
fn parse_fields(body: &Value) -> Result<Vec<(String, SchemaType)>, String> {
    let fields = match body {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(m) => m,
        other => return Err(format!("struct body must be a mapping, got {other:?}")),
    };
    fields
        .iter()
        .map(|(k, v)| {
            let name = k
                .as_str()
                .ok_or_else(|| format!("field name must be a string, got {k:?}"))?;
            let ty = parse_type(v).map_err(|e| format!("field '{name}': {e}"))?;
            Ok((name.to_string(), ty))
        })
        .collect()
}

fn parse_elements(body: &Value) -> Result<Vec<SchemaType>, String> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| parse_type(v).map_err(|e| format!("element {i}: {e}")))
            .collect(),
        other => Err(format!("tuple body must be a sequence, got {other:?}")),
    }
}

/// Variants in document order; `~` marks a unit variant.
fn parse_variants(body: &Value) -> Result<Vec<(String, Option<PayloadType>)>, String> {
    let Value::Mapping(variants) = body else {
        return Err(format!("enum body must be a mapping, got {body:?}"));
    };
    if variants.is_empty() {
        return Err("enum must declare at least one variant".into());
    }
    variants
        .iter()
        .map(|(k, v)| {
            let name = k
                .as_str()
                .ok_or_else(|| format!("variant name must be a string, got {k:?}"))?;
            let payload = parse_payload(v).map_err(|e| format!("variant '{name}': {e}"))?;
            Ok((name.to_string(), payload))
        })
        .collect()
}

fn parse_payload(value: &Value) -> Result<Option<PayloadType>, String> {
    if value.is_null() {
        return Ok(None);
    }
    match parse_type(value)? {
        SchemaType::Struct {
            fields,
            allow_missing,
        } => Ok(Some(PayloadType::Struct {
            fields,
            allow_missing,
        })),
        SchemaType::Tuple(elements) => Ok(Some(PayloadType::Tuple(elements))),
        other => Err(format!("payload must be a struct or tuple, got {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: &str = r#"
schema FungibleVault:
  version: 1
  description: Balance substate of a fungible vault
  meta: { blueprint: FungibleVault, category: vault }
  type:
    struct:
      resource_address: address
      amount: decimal
      frozen: option<bool>
"#;

    const MULTI_DOC: &str = r#"
schema Flag:
  version: 1
  type: bool
---
schema Flag:
  version: 2
  deprecated: true
  type: option<bool>
---
"#;

    #[test]
    fn parse_vault_definition() {
        let def = DefinitionParser::parse(VAULT).unwrap();
        assert_eq!(def.name, "FungibleVault");
        assert_eq!(def.version, 1);
        assert!(!def.deprecated);
        assert_eq!(def.meta.category.as_deref(), Some("vault"));
        assert_eq!(
            def.ty.to_string(),
            "struct{resource_address: address, amount: decimal, frozen: option<bool>}"
        );
    }

    #[test]
    fn parse_multi_doc_skips_trailing_separator() {
        let defs = DefinitionParser::parse_all(MULTI_DOC).unwrap();
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[1].version, 2);
        assert!(defs[1].deprecated);
    }

    #[test]
    fn enum_with_unit_struct_and_tuple_payloads() {
        let yaml: Value = serde_yaml::from_str(
            r#"
enum:
  Empty: ~
  StructBased: { struct: { name: string } }
  Pair: { tuple: [string, number] }
"#,
        )
        .unwrap();
        let ty = parse_type(&yaml).unwrap();
        assert_eq!(
            ty.to_string(),
            "enum{Empty | StructBased{name: string} | Pair(string, number)}"
        );
    }

    #[test]
    fn map_and_array_sugar() {
        let yaml: Value = serde_yaml::from_str("map: { key: string, value: 'number[]' }").unwrap();
        assert_eq!(parse_type(&yaml).unwrap().to_string(), "map<string, number[]>");
        let yaml: Value = serde_yaml::from_str("array: { struct_allowing_missing: { a: bool } }").unwrap();
        assert_eq!(
            parse_type(&yaml).unwrap().to_string(),
            "struct_allowing_missing{a: bool}[]"
        );
    }

    #[test]
    fn errors_name_the_offending_location() {
        let yaml: Value = serde_yaml::from_str("struct: { a: { tuple: [strng] } }").unwrap();
        let err = parse_type(&yaml).unwrap_err();
        assert_eq!(err, "field 'a': element 0: unknown type: 'strng'");

        let yaml: Value = serde_yaml::from_str("enum: { Bad: string }").unwrap();
        let err = parse_type(&yaml).unwrap_err();
        assert!(err.starts_with("variant 'Bad': payload must be a struct or tuple"), "{err}");
    }

    #[test]
    fn missing_schema_key_is_rejected() {
        let err = DefinitionParser::parse("version: 1\ntype: bool\n").unwrap_err();
        assert!(err.to_string().contains("missing 'schema <Name>' key"));
    }
}
