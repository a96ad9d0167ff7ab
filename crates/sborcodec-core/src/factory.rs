//! One constructor per schema kind, re-exported as `sborcodec_core::s`.
//!
//! ```
//! use sborcodec_core::{s, Schema, SborValue};
//!
//! let schema = s::structure((("name", s::string()), ("active", s::bool())));
//! let value = SborValue::tuple(vec![
//!     SborValue::string("daan").named("name"),
//!     SborValue::bool(true).named("active"),
//! ]);
//! let (name, active) = schema.safe_parse(&value).unwrap();
//! assert_eq!(name, "daan");
//! assert!(active);
//! ```

use crate::collection::{ArraySchema, MapSchema};
use crate::leaf::{
    AddressSchema, BoolSchema, BytesSchema, DecimalSchema, InstantSchema, InternalAddressSchema,
    NonFungibleLocalIdSchema, StringSchema, ValueSchema,
};
use crate::number::NumberSchema;
use crate::option::OptionSchema;
use crate::recursive::{Recursive, RecursiveRef};
use crate::schema::{PayloadSchema, Schema};
use crate::structure::{Fields, PartialStructSchema, StructSchema};
use crate::tuple::{Elements, TupleSchema};
use crate::variant::{EnumSchema, Variant};

pub fn bool() -> BoolSchema {
    BoolSchema
}

pub fn string() -> StringSchema {
    StringSchema
}

pub fn bytes() -> BytesSchema {
    BytesSchema
}

/// Any integer width.
pub fn number() -> NumberSchema {
    NumberSchema
}

pub fn decimal() -> DecimalSchema {
    DecimalSchema
}

pub fn address() -> AddressSchema {
    AddressSchema
}

pub fn internal_address() -> InternalAddressSchema {
    InternalAddressSchema
}

pub fn non_fungible_local_id() -> NonFungibleLocalIdSchema {
    NonFungibleLocalIdSchema
}

/// Unix seconds in an `I64`.
pub fn instant() -> InstantSchema {
    InstantSchema
}

/// Accepts anything and returns the node as-is.
pub fn value() -> ValueSchema {
    ValueSchema
}

/// A struct whose declared fields must all be present.
pub fn structure<F: Fields>(fields: F) -> StructSchema<F> {
    StructSchema::new(fields)
}

/// A struct whose absent fields parse as `None`.
pub fn structure_allowing_missing<F: Fields>(fields: F) -> PartialStructSchema<F> {
    PartialStructSchema::new(fields)
}

pub fn tuple<E: Elements>(elements: E) -> TupleSchema<E> {
    TupleSchema::new(elements)
}

pub fn enumeration<T>(variants: Vec<Variant<T>>) -> EnumSchema<T> {
    EnumSchema::new(variants)
}

/// A variant with no payload.
pub fn unit<T>(name: impl Into<String>) -> Variant<T> {
    Variant::unit(name)
}

/// A variant whose payload is a struct or tuple schema.
pub fn variant<T, P>(name: impl Into<String>, payload: P) -> Variant<T>
where
    P: PayloadSchema<Output = T> + 'static,
{
    Variant::new(name, payload)
}

pub fn option<S>(inner: S) -> OptionSchema<S::Output>
where
    S: Schema + 'static,
    S::Output: 'static,
{
    OptionSchema::new(inner)
}

pub fn map<K: Schema, V: Schema>(key: K, value: V) -> MapSchema<K, V> {
    MapSchema::new(key, value)
}

pub fn array<S: Schema>(element: S) -> ArraySchema<S> {
    ArraySchema::new(element)
}

/// Build a schema that refers to itself through the handle passed to `build`.
pub fn recursive<T, S, F>(build: F) -> Recursive<T>
where
    F: FnOnce(RecursiveRef<T>) -> S,
    S: Schema<Output = T> + 'static,
{
    Recursive::new(build)
}
