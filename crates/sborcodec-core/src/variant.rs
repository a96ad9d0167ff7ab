//! Enum schemas: dispatch on `variant_name`, then lay the payload out as a
//! tuple.

use crate::error::SborError;
use crate::path::Path;
use crate::schema::{PayloadSchema, Schema};
use crate::value::{KindSet, SborKind, SborNode, SborValue};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// One declared alternative of an enum schema.
pub struct Variant<T> {
    name: String,
    payload: Option<Arc<dyn PayloadSchema<Output = T>>>,
}

impl<T> Variant<T> {
    /// A variant that carries no fields.
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: None,
        }
    }

    /// A variant whose fields are read by a struct or tuple schema.
    pub fn new<P>(name: impl Into<String>, payload: P) -> Self
    where
        P: PayloadSchema<Output = T> + 'static,
    {
        Self {
            name: name.into(),
            payload: Some(Arc::new(payload)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_unit(&self) -> bool {
        self.payload.is_none()
    }
}

impl<T> Clone for Variant<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            payload: self.payload.clone(),
        }
    }
}

impl<T> fmt::Debug for Variant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name)
            .field("unit", &self.is_unit())
            .finish()
    }
}

/// Parsed enum value.
///
/// Unit variants have no `value` and serialize as `{"variant": "..."}`;
/// every other variant serializes as `{"variant": "...", "value": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumValue<T> {
    pub variant: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> EnumValue<T> {
    pub fn unit(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            value: None,
        }
    }

    pub fn with_value(variant: impl Into<String>, value: T) -> Self {
        Self {
            variant: variant.into(),
            value: Some(value),
        }
    }

    pub fn is(&self, variant: &str) -> bool {
        self.variant == variant
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> EnumValue<U> {
        EnumValue {
            variant: self.variant,
            value: self.value.map(f),
        }
    }
}

/// A closed set of variants sharing one payload output type.
pub struct EnumSchema<T> {
    variants: Vec<Variant<T>>,
}

impl<T> Clone for EnumSchema<T> {
    fn clone(&self) -> Self {
        Self {
            variants: self.variants.clone(),
        }
    }
}

impl<T> fmt::Debug for EnumSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.variants).finish()
    }
}

impl<T> EnumSchema<T> {
    pub fn new(variants: Vec<Variant<T>>) -> Self {
        Self { variants }
    }

    pub fn variants(&self) -> &[Variant<T>] {
        &self.variants
    }

    fn resolve<'v>(
        &self,
        value: &'v SborValue,
        path: &Path<'_>,
    ) -> Result<(&Variant<T>, &'v [SborValue]), SborError> {
        let SborNode::Enum {
            variant_name,
            fields,
            ..
        } = &value.node
        else {
            return Err(SborError::wrong_kind(self.kinds_set(), value.kind(), path));
        };

        let variant = variant_name
            .as_deref()
            .and_then(|name| self.variants.iter().find(|v| v.name == name))
            .ok_or_else(|| {
                let known: Vec<&str> = self.variants.iter().map(|v| v.name()).collect();
                SborError::unknown_variant(variant_name.as_deref(), &known, path)
            })?;

        if variant.is_unit() && !fields.is_empty() {
            return Err(SborError::unit_payload(&variant.name, fields.len(), path));
        }
        Ok((variant, fields))
    }

    fn kinds_set(&self) -> KindSet {
        KindSet::single(SborKind::Enum)
    }
}

impl<T> Schema for EnumSchema<T> {
    type Output = EnumValue<T>;

    fn kinds(&self) -> KindSet {
        self.kinds_set()
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        let (variant, fields) = self.resolve(value, path)?;
        match &variant.payload {
            Some(payload) => payload.validate_fields(fields, &path.field(&variant.name)),
            None => Ok(()),
        }
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<EnumValue<T>, SborError> {
        let (variant, fields) = self.resolve(value, path)?;
        match &variant.payload {
            Some(payload) => {
                let parsed = payload.parse_fields(fields, &path.field(&variant.name))?;
                Ok(EnumValue::with_value(variant.name.clone(), parsed))
            }
            None => Ok(EnumValue::unit(variant.name.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SborErrorKind;
    use crate::factory as s;
    use serde_json::json;

    fn empty_or_named() -> EnumSchema<String> {
        s::enumeration(vec![
            s::unit("Empty"),
            s::variant("StructBased", s::structure((("name", s::string()),)).map(|(name,)| name)),
        ])
    }

    #[test]
    fn struct_variant_dispatch() {
        let value = SborValue::enumeration(1, "StructBased", vec![SborValue::string("daan").named("name")]);
        let parsed = empty_or_named().safe_parse(&value).unwrap();
        assert_eq!(parsed, EnumValue::with_value("StructBased", "daan".to_string()));
        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            json!({"variant": "StructBased", "value": "daan"})
        );
    }

    #[test]
    fn unit_variant_has_no_value_field() {
        let value = SborValue::enumeration(0, "Empty", vec![]);
        let parsed = empty_or_named().safe_parse(&value).unwrap();
        assert!(parsed.is("Empty"));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), json!({"variant": "Empty"}));
    }

    #[test]
    fn unit_variant_rejects_payload() {
        let value = SborValue::enumeration(0, "Empty", vec![SborValue::bool(true)]);
        let err = empty_or_named().safe_parse(&value).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::UnitPayload);
    }

    #[test]
    fn unknown_or_missing_variant_name() {
        let value = SborValue::enumeration(7, "Other", vec![]);
        let err = empty_or_named().safe_parse(&value).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::UnknownVariant);
        assert!(err.message.contains("Empty, StructBased"));

        let nameless = SborValue::new(SborNode::Enum {
            variant_id: "0".into(),
            variant_name: None,
            fields: vec![],
        });
        let err = empty_or_named().safe_parse(&nameless).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::UnknownVariant);
    }

    #[test]
    fn payload_errors_carry_variant_name() {
        let value = SborValue::enumeration(1, "StructBased", vec![SborValue::bool(true).named("name")]);
        let err = empty_or_named().safe_parse(&value).unwrap_err();
        assert_eq!(err.path, vec!["StructBased", "name"]);
    }

    #[test]
    fn tuple_payload() {
        let schema = s::enumeration(vec![s::variant("Pair", s::tuple((s::string(), s::bool())))]);
        let value = SborValue::enumeration(0, "Pair", vec![SborValue::string("x"), SborValue::bool(true)]);
        let parsed = schema.safe_parse(&value).unwrap();
        assert_eq!(parsed.value, Some(("x".to_string(), true)));
    }
}
