//! Leaf schemas: one node kind (or a small family of kinds) in, one scalar out.

use crate::error::SborError;
use crate::number::parse_integer;
use crate::path::Path;
use crate::schema::Schema;
use crate::value::{KindSet, SborKind, SborNode, SborValue};
use chrono::{DateTime, Utc};

fn wrong_kind<T>(expected: KindSet, value: &SborValue, path: &Path<'_>) -> Result<T, SborError> {
    Err(SborError::wrong_kind(expected, value.kind(), path))
}

/// Declares a unit schema that copies one string payload out of a single
/// node kind.
macro_rules! text_leaf {
    ($(#[$doc:meta])* $name:ident, $kind:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $name;

        impl Schema for $name {
            type Output = String;

            fn kinds(&self) -> KindSet {
                KindSet::single(SborKind::$kind)
            }

            fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
                match &value.node {
                    SborNode::$kind { .. } => Ok(()),
                    _ => wrong_kind(self.kinds(), value, path),
                }
            }

            fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<String, SborError> {
                match &value.node {
                    SborNode::$kind { value } => Ok(value.clone()),
                    _ => wrong_kind(self.kinds(), value, path),
                }
            }
        }
    };
}

text_leaf!(
    /// A `String` node.
    StringSchema,
    String
);
text_leaf!(
    /// A global entity address (`Reference` node).
    AddressSchema,
    Reference
);
text_leaf!(
    /// An internal, owned entity address (`Own` node). Never interchangeable
    /// with [`AddressSchema`].
    InternalAddressSchema,
    Own
);
text_leaf!(NonFungibleLocalIdSchema, NonFungibleLocalId);

#[derive(Debug, Clone, Copy, Default)]
pub struct BoolSchema;

impl Schema for BoolSchema {
    type Output = bool;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Bool)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.parse(value, path).map(|_| ())
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<bool, SborError> {
        match value.node {
            SborNode::Bool { value } => Ok(value),
            _ => wrong_kind(self.kinds(), value, path),
        }
    }
}

/// A byte string. Only `U8` element kinds with well-formed hex are
/// accepted; the output is the hex text.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesSchema;

impl Schema for BytesSchema {
    type Output = String;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Bytes)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        let SborNode::Bytes { element_kind, hex } = &value.node else {
            return wrong_kind(self.kinds(), value, path);
        };
        if *element_kind != SborKind::U8 {
            return Err(SborError::malformed(
                format!("bytes must have element kind U8, got {element_kind}"),
                path,
            ));
        }
        hex::decode(hex)
            .map(|_| ())
            .map_err(|e| SborError::malformed(format!("invalid hex in bytes: {e}"), path))
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<String, SborError> {
        self.validate(value, path)?;
        match &value.node {
            SborNode::Bytes { hex, .. } => Ok(hex.to_ascii_lowercase()),
            _ => wrong_kind(self.kinds(), value, path),
        }
    }
}

/// `Decimal` or `PreciseDecimal`; the text is returned unchanged so no
/// precision is lost.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecimalSchema;

impl Schema for DecimalSchema {
    type Output = String;

    fn kinds(&self) -> KindSet {
        KindSet::DECIMALS
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.parse(value, path).map(|_| ())
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<String, SborError> {
        match &value.node {
            SborNode::Decimal { value } | SborNode::PreciseDecimal { value } => Ok(value.clone()),
            _ => wrong_kind(self.kinds(), value, path),
        }
    }
}

/// An `I64` holding Unix seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSchema;

impl Schema for InstantSchema {
    type Output = DateTime<Utc>;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::I64)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.parse(value, path).map(|_| ())
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<DateTime<Utc>, SborError> {
        let SborNode::I64 { value: text } = &value.node else {
            return wrong_kind(self.kinds(), value, path);
        };
        let seconds = i64::try_from(parse_integer(SborKind::I64, text, path)?).map_err(|e| {
            SborError::out_of_range(e.to_string(), path)
        })?;
        DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
            SborError::out_of_range(
                format!("timestamp {seconds} is outside the representable date range"),
                path,
            )
        })
    }
}

/// Accepts any node and hands it back untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSchema;

impl Schema for ValueSchema {
    type Output = SborValue;

    fn kinds(&self) -> KindSet {
        KindSet::ALL
    }

    fn validate(&self, _value: &SborValue, _path: &Path<'_>) -> Result<(), SborError> {
        Ok(())
    }

    fn parse(&self, value: &SborValue, _path: &Path<'_>) -> Result<SborValue, SborError> {
        Ok(value.clone())
    }
}
