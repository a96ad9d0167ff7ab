//! The SBOR value tree.
//!
//! A ledger gateway returns decoded SBOR payloads in a "programmatic JSON"
//! form: every node carries a `kind` discriminator plus kind-specific fields.
//! This module models that tree as a closed sum type so every consumer can
//! match on it exhaustively. Nothing here parses raw SBOR bytes.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// The tag identifying which shape an SBOR node has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SborKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    I128,
    U8,
    U16,
    U32,
    U64,
    U128,
    String,
    Bytes,
    Decimal,
    PreciseDecimal,
    Reference,
    Own,
    NonFungibleLocalId,
    Array,
    Map,
    Tuple,
    Enum,
}

impl SborKind {
    /// Every kind, in declaration order.
    pub const ALL: [SborKind; 22] = [
        SborKind::Bool,
        SborKind::I8,
        SborKind::I16,
        SborKind::I32,
        SborKind::I64,
        SborKind::I128,
        SborKind::U8,
        SborKind::U16,
        SborKind::U32,
        SborKind::U64,
        SborKind::U128,
        SborKind::String,
        SborKind::Bytes,
        SborKind::Decimal,
        SborKind::PreciseDecimal,
        SborKind::Reference,
        SborKind::Own,
        SborKind::NonFungibleLocalId,
        SborKind::Array,
        SborKind::Map,
        SborKind::Tuple,
        SborKind::Enum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SborKind::Bool => "Bool",
            SborKind::I8 => "I8",
            SborKind::I16 => "I16",
            SborKind::I32 => "I32",
            SborKind::I64 => "I64",
            SborKind::I128 => "I128",
            SborKind::U8 => "U8",
            SborKind::U16 => "U16",
            SborKind::U32 => "U32",
            SborKind::U64 => "U64",
            SborKind::U128 => "U128",
            SborKind::String => "String",
            SborKind::Bytes => "Bytes",
            SborKind::Decimal => "Decimal",
            SborKind::PreciseDecimal => "PreciseDecimal",
            SborKind::Reference => "Reference",
            SborKind::Own => "Own",
            SborKind::NonFungibleLocalId => "NonFungibleLocalId",
            SborKind::Array => "Array",
            SborKind::Map => "Map",
            SborKind::Tuple => "Tuple",
            SborKind::Enum => "Enum",
        }
    }

    pub fn is_integer(&self) -> bool {
        KindSet::INTEGERS.contains(*self)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            SborKind::U8 | SborKind::U16 | SborKind::U32 | SborKind::U64 | SborKind::U128
        )
    }
}

impl fmt::Display for SborKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compact, copyable set of [`SborKind`]s.
///
/// Every schema advertises the kinds it accepts as a `KindSet`; the kind gate
/// runs before any structural check.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KindSet(u32);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);
    pub const ALL: KindSet = KindSet((1 << SborKind::ALL.len()) - 1);
    pub const INTEGERS: KindSet = KindSet::of(&[
        SborKind::I8,
        SborKind::I16,
        SborKind::I32,
        SborKind::I64,
        SborKind::I128,
        SborKind::U8,
        SborKind::U16,
        SborKind::U32,
        SborKind::U64,
        SborKind::U128,
    ]);
    pub const DECIMALS: KindSet = KindSet::of(&[SborKind::Decimal, SborKind::PreciseDecimal]);

    pub const fn single(kind: SborKind) -> KindSet {
        KindSet(1 << kind as u32)
    }

    pub const fn of(kinds: &[SborKind]) -> KindSet {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i] as u32;
            i += 1;
        }
        KindSet(bits)
    }

    pub const fn contains(self, kind: SborKind) -> bool {
        self.0 & (1 << kind as u32) != 0
    }

    pub const fn union(self, other: KindSet) -> KindSet {
        KindSet(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = SborKind> {
        SborKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Display for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == KindSet::ALL {
            return f.write_str("any kind");
        }
        if self.is_empty() {
            return f.write_str("no kind");
        }
        let names: Vec<_> = self.iter().map(|k| k.name()).collect();
        f.write_str(&names.join(" | "))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KindSet({self})")
    }
}

/// One node of a decoded SBOR tree.
///
/// `type_name` and `field_name` are diagnostic metadata. The only place the
/// engine reads `field_name` is struct field matching inside a Tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SborValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(flatten)]
    pub node: SborNode,
}

/// The kind-specific body of a [`SborValue`].
///
/// Integer values arrive as decimal text so that 128-bit widths survive JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum SborNode {
    Bool {
        value: bool,
    },
    I8 {
        value: String,
    },
    I16 {
        value: String,
    },
    I32 {
        value: String,
    },
    I64 {
        value: String,
    },
    I128 {
        value: String,
    },
    U8 {
        value: String,
    },
    U16 {
        value: String,
    },
    U32 {
        value: String,
    },
    U64 {
        value: String,
    },
    U128 {
        value: String,
    },
    String {
        value: String,
    },
    Bytes {
        element_kind: SborKind,
        hex: String,
    },
    Decimal {
        value: String,
    },
    PreciseDecimal {
        value: String,
    },
    Reference {
        value: String,
    },
    Own {
        value: String,
    },
    NonFungibleLocalId {
        value: String,
    },
    Array {
        element_kind: SborKind,
        elements: Vec<SborValue>,
    },
    Map {
        key_kind: SborKind,
        value_kind: SborKind,
        entries: Vec<MapEntry>,
    },
    Tuple {
        fields: Vec<SborValue>,
    },
    Enum {
        #[serde(deserialize_with = "variant_id_text")]
        variant_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant_name: Option<String>,
        fields: Vec<SborValue>,
    },
}

/// One `{key, value}` pair of a Map node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: SborValue,
    pub value: SborValue,
}

/// Gateways disagree on whether `variant_id` is a string or a number.
fn variant_id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

impl SborNode {
    pub fn kind(&self) -> SborKind {
        match self {
            SborNode::Bool { .. } => SborKind::Bool,
            SborNode::I8 { .. } => SborKind::I8,
            SborNode::I16 { .. } => SborKind::I16,
            SborNode::I32 { .. } => SborKind::I32,
            SborNode::I64 { .. } => SborKind::I64,
            SborNode::I128 { .. } => SborKind::I128,
            SborNode::U8 { .. } => SborKind::U8,
            SborNode::U16 { .. } => SborKind::U16,
            SborNode::U32 { .. } => SborKind::U32,
            SborNode::U64 { .. } => SborKind::U64,
            SborNode::U128 { .. } => SborKind::U128,
            SborNode::String { .. } => SborKind::String,
            SborNode::Bytes { .. } => SborKind::Bytes,
            SborNode::Decimal { .. } => SborKind::Decimal,
            SborNode::PreciseDecimal { .. } => SborKind::PreciseDecimal,
            SborNode::Reference { .. } => SborKind::Reference,
            SborNode::Own { .. } => SborKind::Own,
            SborNode::NonFungibleLocalId { .. } => SborKind::NonFungibleLocalId,
            SborNode::Array { .. } => SborKind::Array,
            SborNode::Map { .. } => SborKind::Map,
            SborNode::Tuple { .. } => SborKind::Tuple,
            SborNode::Enum { .. } => SborKind::Enum,
        }
    }

    /// Build an integer node of the given width. Returns `None` for
    /// non-integer kinds.
    pub fn integer(kind: SborKind, text: impl Into<String>) -> Option<SborNode> {
        let value = text.into();
        Some(match kind {
            SborKind::I8 => SborNode::I8 { value },
            SborKind::I16 => SborNode::I16 { value },
            SborKind::I32 => SborNode::I32 { value },
            SborKind::I64 => SborNode::I64 { value },
            SborKind::I128 => SborNode::I128 { value },
            SborKind::U8 => SborNode::U8 { value },
            SborKind::U16 => SborNode::U16 { value },
            SborKind::U32 => SborNode::U32 { value },
            SborKind::U64 => SborNode::U64 { value },
            SborKind::U128 => SborNode::U128 { value },
            _ => return None,
        })
    }

    /// The width and decimal text of an integer node.
    pub fn integer_text(&self) -> Option<(SborKind, &str)> {
        match self {
            SborNode::I8 { value }
            | SborNode::I16 { value }
            | SborNode::I32 { value }
            | SborNode::I64 { value }
            | SborNode::I128 { value }
            | SborNode::U8 { value }
            | SborNode::U16 { value }
            | SborNode::U32 { value }
            | SborNode::U64 { value }
            | SborNode::U128 { value } => Some((self.kind(), value.as_str())),
            _ => None,
        }
    }
}

impl From<SborNode> for SborValue {
    fn from(node: SborNode) -> Self {
        SborValue::new(node)
    }
}

impl SborValue {
    pub fn new(node: SborNode) -> Self {
        Self {
            type_name: None,
            field_name: None,
            node,
        }
    }

    pub fn kind(&self) -> SborKind {
        self.node.kind()
    }

    /// Attach a `field_name`, as a struct-shaped Tuple child carries.
    pub fn named(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn bool(value: bool) -> Self {
        SborNode::Bool { value }.into()
    }

    pub fn string(value: impl Into<String>) -> Self {
        SborNode::String {
            value: value.into(),
        }
        .into()
    }

    /// Integer node of the given width; `None` if `kind` is not an integer kind.
    pub fn integer(kind: SborKind, text: impl Into<String>) -> Option<Self> {
        SborNode::integer(kind, text).map(SborValue::new)
    }

    pub fn bytes(hex: impl Into<String>) -> Self {
        SborNode::Bytes {
            element_kind: SborKind::U8,
            hex: hex.into(),
        }
        .into()
    }

    pub fn decimal(value: impl Into<String>) -> Self {
        SborNode::Decimal {
            value: value.into(),
        }
        .into()
    }

    pub fn precise_decimal(value: impl Into<String>) -> Self {
        SborNode::PreciseDecimal {
            value: value.into(),
        }
        .into()
    }

    pub fn reference(address: impl Into<String>) -> Self {
        SborNode::Reference {
            value: address.into(),
        }
        .into()
    }

    pub fn own(address: impl Into<String>) -> Self {
        SborNode::Own {
            value: address.into(),
        }
        .into()
    }

    pub fn non_fungible_local_id(id: impl Into<String>) -> Self {
        SborNode::NonFungibleLocalId { value: id.into() }.into()
    }

    pub fn tuple(fields: Vec<SborValue>) -> Self {
        SborNode::Tuple { fields }.into()
    }

    pub fn array(element_kind: SborKind, elements: Vec<SborValue>) -> Self {
        SborNode::Array {
            element_kind,
            elements,
        }
        .into()
    }

    pub fn map(key_kind: SborKind, value_kind: SborKind, entries: Vec<(SborValue, SborValue)>) -> Self {
        SborNode::Map {
            key_kind,
            value_kind,
            entries: entries
                .into_iter()
                .map(|(key, value)| MapEntry { key, value })
                .collect(),
        }
        .into()
    }

    pub fn enumeration(variant_id: u8, variant_name: impl Into<String>, fields: Vec<SborValue>) -> Self {
        SborNode::Enum {
            variant_id: variant_id.to_string(),
            variant_name: Some(variant_name.into()),
            fields,
        }
        .into()
    }

    /// Direct children of this node, in order. Map entries contribute key then value.
    pub fn children(&self) -> Vec<&SborValue> {
        match &self.node {
            SborNode::Array { elements, .. } => elements.iter().collect(),
            SborNode::Tuple { fields } | SborNode::Enum { fields, .. } => fields.iter().collect(),
            SborNode::Map { entries, .. } => entries
                .iter()
                .flat_map(|e| [&e.key, &e.value])
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Nesting depth of the tree; a leaf has depth 1.
    ///
    /// Computed with an explicit stack so that measuring a hostile tree
    /// cannot itself exhaust the call stack.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 1usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            for child in node.children() {
                stack.push((child, depth + 1));
            }
        }
        max
    }
}
