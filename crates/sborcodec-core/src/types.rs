//! Runtime schema descriptions.
//!
//! The typed combinators need their shape at compile time. Schemas loaded
//! from definition documents only know theirs at runtime, so `SchemaType`
//! describes a shape as data and [`SchemaType::compile`] turns it into a
//! boxed schema whose output is the dynamic [`ParsedValue`].

use crate::factory as s;
use crate::number::Integer;
use crate::schema::{BoxedSchema, PayloadSchema, Schema};
use crate::value::SborValue;
use crate::variant::{EnumValue, Variant};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// A compiled runtime schema.
pub type DynSchema = BoxedSchema<ParsedValue>;

/// The shape of a schema, as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Bool,
    String,
    Bytes,
    Number,
    Decimal,
    Address,
    InternalAddress,
    NonFungibleLocalId,
    Instant,
    Value,
    /// Fields in declaration order.
    Struct {
        fields: Vec<(String, SchemaType)>,
        allow_missing: bool,
    },
    Tuple(Vec<SchemaType>),
    /// Variants in declaration order; `None` marks a unit variant.
    Enum(Vec<(String, Option<PayloadType>)>),
    Option(Box<SchemaType>),
    Map {
        key: Box<SchemaType>,
        value: Box<SchemaType>,
    },
    Array(Box<SchemaType>),
}

/// The payload of a non-unit enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadType {
    Struct {
        fields: Vec<(String, SchemaType)>,
        allow_missing: bool,
    },
    Tuple(Vec<SchemaType>),
}

impl SchemaType {
    /// The leaf type spelled `name` in definition documents.
    pub fn leaf(name: &str) -> Option<SchemaType> {
        Some(match name {
            "bool" => SchemaType::Bool,
            "string" => SchemaType::String,
            "bytes" => SchemaType::Bytes,
            "number" => SchemaType::Number,
            "decimal" => SchemaType::Decimal,
            "address" => SchemaType::Address,
            "internal_address" => SchemaType::InternalAddress,
            "non_fungible_local_id" => SchemaType::NonFungibleLocalId,
            "instant" => SchemaType::Instant,
            "value" => SchemaType::Value,
            _ => return None,
        })
    }

    pub fn compile(&self) -> DynSchema {
        match self {
            SchemaType::Bool => s::bool().map(ParsedValue::Bool).boxed(),
            SchemaType::String => s::string().map(ParsedValue::Str).boxed(),
            SchemaType::Bytes => s::bytes().map(ParsedValue::Bytes).boxed(),
            SchemaType::Number => s::number().map(ParsedValue::Integer).boxed(),
            SchemaType::Decimal => s::decimal().map(ParsedValue::Decimal).boxed(),
            SchemaType::Address => s::address().map(ParsedValue::Address).boxed(),
            SchemaType::InternalAddress => s::internal_address().map(ParsedValue::InternalAddress).boxed(),
            SchemaType::NonFungibleLocalId => s::non_fungible_local_id()
                .map(ParsedValue::NonFungibleLocalId)
                .boxed(),
            SchemaType::Instant => s::instant().map(ParsedValue::Timestamp).boxed(),
            SchemaType::Value => s::value().map(ParsedValue::Raw).boxed(),
            SchemaType::Struct {
                fields,
                allow_missing: false,
            } => strict_struct(fields).boxed(),
            SchemaType::Struct {
                fields,
                allow_missing: true,
            } => partial_struct(fields).boxed(),
            SchemaType::Tuple(elements) => tuple(elements).boxed(),
            SchemaType::Enum(variants) => {
                let variants = variants
                    .iter()
                    .map(|(name, payload)| match payload {
                        None => Variant::unit(name.clone()),
                        Some(PayloadType::Struct {
                            fields,
                            allow_missing: false,
                        }) => Variant::new(name.clone(), strict_struct(fields)),
                        Some(PayloadType::Struct {
                            fields,
                            allow_missing: true,
                        }) => Variant::new(name.clone(), partial_struct(fields)),
                        Some(PayloadType::Tuple(elements)) => Variant::new(name.clone(), tuple(elements)),
                    })
                    .collect();
                s::enumeration(variants)
                    .map(|e: EnumValue<ParsedValue>| ParsedValue::Enum(e.map(Box::new)))
                    .boxed()
            }
            SchemaType::Option(inner) => s::option(inner.compile())
                .map(|o: Option<ParsedValue>| ParsedValue::Option(o.map(Box::new)))
                .boxed(),
            SchemaType::Map { key, value } => s::map(key.compile(), value.compile())
                .map(ParsedValue::Map)
                .boxed(),
            SchemaType::Array(element) => s::array(element.compile()).map(ParsedValue::Array).boxed(),
        }
    }
}

fn compile_fields(fields: &[(String, SchemaType)]) -> Vec<(String, DynSchema)> {
    fields
        .iter()
        .map(|(name, ty)| (name.clone(), ty.compile()))
        .collect()
}

fn strict_struct(fields: &[(String, SchemaType)]) -> impl PayloadSchema<Output = ParsedValue> {
    s::structure(compile_fields(fields))
        .map(|parsed: Vec<(String, ParsedValue)>| ParsedValue::Record(parsed.into_iter().collect()))
}

fn partial_struct(fields: &[(String, SchemaType)]) -> impl PayloadSchema<Output = ParsedValue> {
    s::structure_allowing_missing(compile_fields(fields)).map(|parsed: Vec<(String, Option<ParsedValue>)>| {
        ParsedValue::Record(
            parsed
                .into_iter()
                .map(|(name, value)| (name, value.unwrap_or(ParsedValue::Missing)))
                .collect(),
        )
    })
}

fn tuple(elements: &[SchemaType]) -> impl PayloadSchema<Output = ParsedValue> {
    s::tuple(elements.iter().map(SchemaType::compile).collect::<Vec<_>>()).map(ParsedValue::Tuple)
}

fn write_fields(f: &mut fmt::Formatter<'_>, fields: &[(String, SchemaType)]) -> fmt::Result {
    let parts: Vec<_> = fields.iter().map(|(name, ty)| format!("{name}: {ty}")).collect();
    write!(f, "{{{}}}", parts.join(", "))
}

fn write_elements(f: &mut fmt::Formatter<'_>, elements: &[SchemaType]) -> fmt::Result {
    let parts: Vec<_> = elements.iter().map(|ty| ty.to_string()).collect();
    write!(f, "({})", parts.join(", "))
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaType::Bool => write!(f, "bool"),
            SchemaType::String => write!(f, "string"),
            SchemaType::Bytes => write!(f, "bytes"),
            SchemaType::Number => write!(f, "number"),
            SchemaType::Decimal => write!(f, "decimal"),
            SchemaType::Address => write!(f, "address"),
            SchemaType::InternalAddress => write!(f, "internal_address"),
            SchemaType::NonFungibleLocalId => write!(f, "non_fungible_local_id"),
            SchemaType::Instant => write!(f, "instant"),
            SchemaType::Value => write!(f, "value"),
            SchemaType::Struct {
                fields,
                allow_missing,
            } => {
                f.write_str(if *allow_missing { "struct_allowing_missing" } else { "struct" })?;
                write_fields(f, fields)
            }
            SchemaType::Tuple(elements) => {
                f.write_str("tuple")?;
                write_elements(f, elements)
            }
            SchemaType::Enum(variants) => {
                let parts: Vec<_> = variants
                    .iter()
                    .map(|(name, payload)| match payload {
                        None => name.clone(),
                        Some(p) => format!("{name}{p}"),
                    })
                    .collect();
                write!(f, "enum{{{}}}", parts.join(" | "))
            }
            SchemaType::Option(inner) => write!(f, "option<{inner}>"),
            SchemaType::Map { key, value } => write!(f, "map<{key}, {value}>"),
            SchemaType::Array(element) => write!(f, "{element}[]"),
        }
    }
}

impl fmt::Display for PayloadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadType::Struct {
                fields,
                allow_missing,
            } => {
                if *allow_missing {
                    f.write_str("?")?;
                }
                write_fields(f, fields)
            }
            PayloadType::Tuple(elements) => write_elements(f, elements),
        }
    }
}

/// Output of a compiled [`SchemaType`].
///
/// Serializes to plain JSON: records as objects (`null` for absent
/// permissive fields), enums as `{"variant", "value"?}`, maps as arrays of
/// `[key, value]` pairs, instants as RFC 3339 strings.
///
/// An option is `null` or its inner value. When the inner value is itself
/// an option, `Some` is wrapped in a one-element array so that `Some(None)`
/// (`[null]`) stays distinct from `None` (`null`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedValue {
    /// An absent field of a permissive struct.
    Missing,
    Bool(bool),
    Integer(Integer),
    Str(String),
    /// Hex text.
    Bytes(String),
    Decimal(String),
    Address(String),
    InternalAddress(String),
    NonFungibleLocalId(String),
    Timestamp(DateTime<Utc>),
    Raw(SborValue),
    Record(IndexMap<String, ParsedValue>),
    Tuple(Vec<ParsedValue>),
    Array(Vec<ParsedValue>),
    Map(Vec<(ParsedValue, ParsedValue)>),
    Enum(EnumValue<Box<ParsedValue>>),
    #[serde(serialize_with = "serialize_option")]
    Option(Option<Box<ParsedValue>>),
}

fn serialize_option<S: Serializer>(value: &Option<Box<ParsedValue>>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        None => serializer.serialize_none(),
        Some(inner) if matches!(**inner, ParsedValue::Option(_)) => [inner].serialize(serializer),
        Some(inner) => inner.serialize(serializer),
    }
}

impl ParsedValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, ParsedValue::Missing)
    }

    /// A record field by name.
    pub fn field(&self, name: &str) -> Option<&ParsedValue> {
        match self {
            ParsedValue::Record(fields) => fields.get(name),
            _ => None,
        }
    }

    /// The text of any string-like leaf.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParsedValue::Str(s)
            | ParsedValue::Bytes(s)
            | ParsedValue::Decimal(s)
            | ParsedValue::Address(s)
            | ParsedValue::InternalAddress(s)
            | ParsedValue::NonFungibleLocalId(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<Integer> {
        match self {
            ParsedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Missing => write!(f, "null"),
            ParsedValue::Bool(v) => write!(f, "{v}"),
            ParsedValue::Integer(v) => write!(f, "{v}"),
            ParsedValue::Str(s) => write!(f, "{s:?}"),
            ParsedValue::Bytes(h) => write!(f, "0x{h}"),
            ParsedValue::Decimal(d) => write!(f, "{d}"),
            ParsedValue::Address(a) | ParsedValue::InternalAddress(a) => write!(f, "{a}"),
            ParsedValue::NonFungibleLocalId(id) => write!(f, "{id}"),
            ParsedValue::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            ParsedValue::Raw(v) => write!(f, "<{}>", v.kind()),
            ParsedValue::Record(fields) => {
                let parts: Vec<_> = fields.iter().map(|(k, v)| format!("{k}: {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            ParsedValue::Tuple(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "({})", parts.join(", "))
            }
            ParsedValue::Array(v) => {
                let parts: Vec<_> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            ParsedValue::Map(entries) => {
                let parts: Vec<_> = entries.iter().map(|(k, v)| format!("{k} => {v}")).collect();
                write!(f, "{{{}}}", parts.join(", "))
            }
            ParsedValue::Enum(e) => match &e.value {
                Some(v) => write!(f, "{}({v})", e.variant),
                None => write!(f, "{}", e.variant),
            },
            ParsedValue::Option(Some(v)) => write!(f, "Some({v})"),
            ParsedValue::Option(None) => write!(f, "None"),
        }
    }
}
