//! Integer schema and the lossless fixed-width integer output.
//!
//! Integer nodes carry decimal text. The text is read as an arbitrary
//! precision integer first and only then narrowed to the node's declared
//! width, so "256" under U8 and "-1" under U64 are reported as range errors
//! rather than as unparseable text.

use crate::error::SborError;
use crate::path::Path;
use crate::schema::Schema;
use crate::value::{KindSet, SborKind, SborValue};
use num_bigint::{BigInt, Sign};
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// A parsed SBOR integer at its exact declared width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Integer {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
}

impl Integer {
    pub fn kind(&self) -> SborKind {
        match self {
            Integer::I8(_) => SborKind::I8,
            Integer::I16(_) => SborKind::I16,
            Integer::I32(_) => SborKind::I32,
            Integer::I64(_) => SborKind::I64,
            Integer::I128(_) => SborKind::I128,
            Integer::U8(_) => SborKind::U8,
            Integer::U16(_) => SborKind::U16,
            Integer::U32(_) => SborKind::U32,
            Integer::U64(_) => SborKind::U64,
            Integer::U128(_) => SborKind::U128,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.to_i128().map(|v| v < 0).unwrap_or(false)
    }

    /// `None` only for a `U128` above `i128::MAX`.
    pub fn to_i128(&self) -> Option<i128> {
        match *self {
            Integer::I8(v) => Some(v.into()),
            Integer::I16(v) => Some(v.into()),
            Integer::I32(v) => Some(v.into()),
            Integer::I64(v) => Some(v.into()),
            Integer::I128(v) => Some(v),
            Integer::U8(v) => Some(v.into()),
            Integer::U16(v) => Some(v.into()),
            Integer::U32(v) => Some(v.into()),
            Integer::U64(v) => Some(v.into()),
            Integer::U128(v) => i128::try_from(v).ok(),
        }
    }

    /// `None` for negative values.
    pub fn to_u128(&self) -> Option<u128> {
        match *self {
            Integer::U128(v) => Some(v),
            _ => self.to_i128().and_then(|v| u128::try_from(v).ok()),
        }
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Integer::I8(v) => write!(f, "{v}"),
            Integer::I16(v) => write!(f, "{v}"),
            Integer::I32(v) => write!(f, "{v}"),
            Integer::I64(v) => write!(f, "{v}"),
            Integer::I128(v) => write!(f, "{v}"),
            Integer::U8(v) => write!(f, "{v}"),
            Integer::U16(v) => write!(f, "{v}"),
            Integer::U32(v) => write!(f, "{v}"),
            Integer::U64(v) => write!(f, "{v}"),
            Integer::U128(v) => write!(f, "{v}"),
        }
    }
}

/// Largest magnitude a JSON reader holding numbers as `f64` keeps exact.
const MAX_SAFE_JSON_INTEGER: u128 = (1 << 53) - 1;

/// Values within `±(2^53 - 1)` serialize as JSON numbers; anything wider
/// serializes as decimal text so no reader can silently narrow it.
impl Serialize for Integer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_i128().and_then(|v| i64::try_from(v).ok()) {
            Some(v) if u128::from(v.unsigned_abs()) <= MAX_SAFE_JSON_INTEGER => serializer.serialize_i64(v),
            _ => serializer.collect_str(self),
        }
    }
}

/// Conversion of an [`Integer`] to a primitive that cannot hold it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("integer {value} does not fit in {target}")]
pub struct IntegerRangeError {
    pub value: Integer,
    pub target: &'static str,
}

macro_rules! integer_conversions {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Integer {
                fn from(v: $ty) -> Self {
                    Integer::$variant(v)
                }
            }

            impl TryFrom<Integer> for $ty {
                type Error = IntegerRangeError;

                fn try_from(value: Integer) -> Result<Self, Self::Error> {
                    let narrowed = match value.to_i128() {
                        Some(v) => <$ty>::try_from(v).ok(),
                        None => value.to_u128().and_then(|v| <$ty>::try_from(v).ok()),
                    };
                    narrowed.ok_or(IntegerRangeError {
                        value,
                        target: stringify!($ty),
                    })
                }
            }
        )+
    };
}

integer_conversions!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
);

/// Inclusive bounds of an integer kind, as text for error messages.
fn bounds(kind: SborKind) -> (String, String) {
    match kind {
        SborKind::I8 => (i8::MIN.to_string(), i8::MAX.to_string()),
        SborKind::I16 => (i16::MIN.to_string(), i16::MAX.to_string()),
        SborKind::I32 => (i32::MIN.to_string(), i32::MAX.to_string()),
        SborKind::I64 => (i64::MIN.to_string(), i64::MAX.to_string()),
        SborKind::I128 => (i128::MIN.to_string(), i128::MAX.to_string()),
        SborKind::U8 => ("0".into(), u8::MAX.to_string()),
        SborKind::U16 => ("0".into(), u16::MAX.to_string()),
        SborKind::U32 => ("0".into(), u32::MAX.to_string()),
        SborKind::U64 => ("0".into(), u64::MAX.to_string()),
        SborKind::U128 => ("0".into(), u128::MAX.to_string()),
        _ => (String::new(), String::new()),
    }
}

/// Read integer text and narrow it to `kind`'s exact range.
pub(crate) fn parse_integer(kind: SborKind, text: &str, path: &Path<'_>) -> Result<Integer, SborError> {
    let malformed = || SborError::malformed(format!("`{text}` is not a valid {kind} integer"), path);
    // `BigInt`'s parser also takes `+7` and `1_0`; only plain decimal text is valid here.
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let big: BigInt = text.parse().map_err(|_| malformed())?;

    let narrowed = match kind {
        SborKind::I8 => i8::try_from(&big).ok().map(Integer::I8),
        SborKind::I16 => i16::try_from(&big).ok().map(Integer::I16),
        SborKind::I32 => i32::try_from(&big).ok().map(Integer::I32),
        SborKind::I64 => i64::try_from(&big).ok().map(Integer::I64),
        SborKind::I128 => i128::try_from(&big).ok().map(Integer::I128),
        SborKind::U8 => u8::try_from(&big).ok().map(Integer::U8),
        SborKind::U16 => u16::try_from(&big).ok().map(Integer::U16),
        SborKind::U32 => u32::try_from(&big).ok().map(Integer::U32),
        SborKind::U64 => u64::try_from(&big).ok().map(Integer::U64),
        SborKind::U128 => u128::try_from(&big).ok().map(Integer::U128),
        other => return Err(SborError::wrong_kind(KindSet::INTEGERS, other, path)),
    };

    narrowed.ok_or_else(|| {
        if kind.is_unsigned() && big.sign() == Sign::Minus {
            SborError::out_of_range(
                format!("negative value {text} is not allowed for unsigned {kind}"),
                path,
            )
        } else {
            let (min, max) = bounds(kind);
            SborError::out_of_range(
                format!("value {text} is out of range for {kind} ({min}..={max})"),
                path,
            )
        }
    })
}

/// Accepts every integer width; outputs an [`Integer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberSchema;

impl Schema for NumberSchema {
    type Output = Integer;

    fn kinds(&self) -> KindSet {
        KindSet::INTEGERS
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.parse(value, path).map(|_| ())
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Integer, SborError> {
        match value.node.integer_text() {
            Some((kind, text)) => parse_integer(kind, text, path),
            None => Err(SborError::wrong_kind(KindSet::INTEGERS, value.kind(), path)),
        }
    }
}
