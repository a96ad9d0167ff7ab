//! Named, versioned schema definitions and the registry interface.

use crate::types::{DynSchema, SchemaType};
use serde::{Serialize, Serializer};

/// Metadata block attached to a definition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefinitionMeta {
    /// Blueprint the substate belongs to, e.g. "FungibleVault"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint: Option<String>,
    /// Category, e.g. "vault", "pool", "nft"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Package address the blueprint is published under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

/// A parsed schema definition document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDefinition {
    /// PascalCase schema name, e.g. "FungibleVault"
    pub name: String,
    /// Increments on breaking changes
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub deprecated: bool,
    pub meta: DefinitionMeta,
    #[serde(rename = "type", serialize_with = "display_type")]
    pub ty: SchemaType,
}

fn display_type<S: Serializer>(ty: &SchemaType, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(ty)
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>, version: u32, ty: SchemaType) -> Self {
        Self {
            name: name.into(),
            version,
            description: None,
            deprecated: false,
            meta: DefinitionMeta::default(),
            ty,
        }
    }

    /// Build the runtime schema for this definition.
    pub fn compile(&self) -> DynSchema {
        self.ty.compile()
    }
}

/// A thread-safe, read-only view of a schema registry.
/// Concrete implementations live in `sborcodec-registry`.
pub trait SchemaRegistry: Send + Sync {
    /// Look up a definition by name and optional version.
    /// If `version` is None, returns the latest non-deprecated version.
    fn get(&self, name: &str, version: Option<u32>) -> Option<SchemaDefinition>;

    /// Every version of a definition, oldest first.
    fn history(&self, name: &str) -> Vec<SchemaDefinition>;

    /// Names of every registered definition, sorted.
    fn all_names(&self) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_type_as_text() {
        let def = SchemaDefinition::new("Flag", 2, SchemaType::Option(Box::new(SchemaType::Bool)));
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "name": "Flag",
                "version": 2,
                "deprecated": false,
                "meta": {},
                "type": "option<bool>"
            })
        );
    }
}
