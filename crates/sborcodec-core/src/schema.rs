//! The `Schema` trait and the adapters every schema gets for free.
//!
//! A schema is an immutable description of which value trees are acceptable
//! and how an accepted tree maps to `Self::Output`. Composite schemas derive
//! their output type from their children, so a schema built from the factory
//! carries its full output type with no annotations.

use crate::error::{SborError, SborErrorKind};
use crate::options::ParseOptions;
use crate::path::Path;
use crate::value::{KindSet, SborKind, SborNode, SborValue};
use std::fmt;
use std::sync::Arc;

/// A type-erased, shareable schema.
pub type BoxedSchema<T> = Arc<dyn Schema<Output = T>>;

/// The central trait every schema implements.
///
/// # Thread Safety
/// Schemas hold no mutable state and must be `Send + Sync`, so one instance
/// can be stored in a `static` or shared across Rayon workers.
pub trait Schema: Send + Sync {
    type Output;

    /// The node kinds this schema accepts.
    fn kinds(&self) -> KindSet;

    /// Check `value` without producing output.
    ///
    /// Succeeds exactly when [`parse`](Schema::parse) would. Callers are
    /// expected to have passed the kind gate (see [`check_kind`](Schema::check_kind)).
    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError>;

    /// Map `value` to the schema's output, failing with the same errors as
    /// `validate`.
    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Self::Output, SborError>;

    /// The uniform kind gate run before any structural check.
    fn check_kind(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        let kinds = self.kinds();
        if kinds.contains(value.kind()) {
            Ok(())
        } else {
            Err(SborError::wrong_kind(kinds, value.kind(), path))
        }
    }

    /// The single outer entry point: kind gate, then parse.
    fn safe_parse(&self, value: &SborValue) -> Result<Self::Output, SborError> {
        let root = Path::root();
        self.check_kind(value, &root)?;
        self.parse(value, &root)
    }

    /// Like [`safe_parse`](Schema::safe_parse), rejecting trees deeper than
    /// `options.max_depth` before any recursion happens.
    fn safe_parse_with(
        &self,
        value: &SborValue,
        options: &ParseOptions,
    ) -> Result<Self::Output, SborError> {
        let depth = value.depth();
        if depth > options.max_depth {
            return Err(SborError::depth_exceeded(depth, options.max_depth));
        }
        self.safe_parse(value)
    }

    /// Transform the output with an infallible function.
    fn map<U, F>(self, f: F) -> Mapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U + Send + Sync,
    {
        Mapped { inner: self, f }
    }

    /// Transform the output with a fallible function. A refusal becomes a
    /// [`SborErrorKind::Rejected`] error at the current path.
    fn try_map<U, E, F>(self, f: F) -> TryMapped<Self, F>
    where
        Self: Sized,
        E: fmt::Display,
        F: Fn(Self::Output) -> Result<U, E> + Send + Sync,
    {
        TryMapped { inner: self, f }
    }

    /// Erase the concrete type, e.g. to store heterogeneous schemas together.
    fn boxed(self) -> BoxedSchema<Self::Output>
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// A schema that can lay out an enum variant's payload.
///
/// Only struct- and tuple-shaped schemas (and adapters over them) implement
/// this: a variant's payload fields are read as if they were a Tuple node.
pub trait PayloadSchema: Schema {
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError>;

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError>;
}

/// Kind gate then validate, as composites do for every child.
pub(crate) fn validate_checked<S: Schema + ?Sized>(
    schema: &S,
    value: &SborValue,
    path: &Path<'_>,
) -> Result<(), SborError> {
    schema.check_kind(value, path)?;
    schema.validate(value, path)
}

/// Kind gate then parse, as composites do for every child.
pub(crate) fn parse_checked<S: Schema + ?Sized>(
    schema: &S,
    value: &SborValue,
    path: &Path<'_>,
) -> Result<S::Output, SborError> {
    schema.check_kind(value, path)?;
    schema.parse(value, path)
}

/// The children of a Tuple node, or a wrong-kind error.
pub(crate) fn tuple_fields<'v>(value: &'v SborValue, path: &Path<'_>) -> Result<&'v [SborValue], SborError> {
    match &value.node {
        SborNode::Tuple { fields } => Ok(fields),
        other => Err(SborError::wrong_kind(
            KindSet::single(SborKind::Tuple),
            other.kind(),
            path,
        )),
    }
}

// ─── Blanket impls ────────────────────────────────────────────────────────────

impl<S: Schema + ?Sized> Schema for Arc<S> {
    type Output = S::Output;

    fn kinds(&self) -> KindSet {
        (**self).kinds()
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        (**self).validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Self::Output, SborError> {
        (**self).parse(value, path)
    }
}

impl<S: PayloadSchema + ?Sized> PayloadSchema for Arc<S> {
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        (**self).validate_fields(fields, path)
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError> {
        (**self).parse_fields(fields, path)
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    type Output = S::Output;

    fn kinds(&self) -> KindSet {
        (**self).kinds()
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        (**self).validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Self::Output, SborError> {
        (**self).parse(value, path)
    }
}

// ─── Adapters ─────────────────────────────────────────────────────────────────

/// Output of [`Schema::map`].
#[derive(Clone)]
pub struct Mapped<S, F> {
    inner: S,
    f: F,
}

impl<S, F, U> Schema for Mapped<S, F>
where
    S: Schema,
    F: Fn(S::Output) -> U + Send + Sync,
{
    type Output = U;

    fn kinds(&self) -> KindSet {
        self.inner.kinds()
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.inner.validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<U, SborError> {
        self.inner.parse(value, path).map(&self.f)
    }
}

impl<S, F, U> PayloadSchema for Mapped<S, F>
where
    S: PayloadSchema,
    F: Fn(S::Output) -> U + Send + Sync,
{
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.inner.validate_fields(fields, path)
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<U, SborError> {
        self.inner.parse_fields(fields, path).map(&self.f)
    }
}

/// Output of [`Schema::try_map`].
#[derive(Clone)]
pub struct TryMapped<S, F> {
    inner: S,
    f: F,
}

impl<S, F> TryMapped<S, F> {
    fn apply<T, U, E>(&self, parsed: T, path: &Path<'_>) -> Result<U, SborError>
    where
        F: Fn(T) -> Result<U, E>,
        E: fmt::Display,
    {
        (self.f)(parsed).map_err(|e| SborError::new(SborErrorKind::Rejected, e.to_string(), path))
    }
}

impl<S, F, U, E> Schema for TryMapped<S, F>
where
    S: Schema,
    E: fmt::Display,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
{
    type Output = U;

    fn kinds(&self) -> KindSet {
        self.inner.kinds()
    }

    // Validation has to run the conversion too, or it could pass a value
    // that parse then rejects.
    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.parse(value, path).map(|_| ())
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<U, SborError> {
        let parsed = self.inner.parse(value, path)?;
        self.apply(parsed, path)
    }
}

impl<S, F, U, E> PayloadSchema for TryMapped<S, F>
where
    S: PayloadSchema,
    E: fmt::Display,
    F: Fn(S::Output) -> Result<U, E> + Send + Sync,
{
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.parse_fields(fields, path).map(|_| ())
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<U, SborError> {
        let parsed = self.inner.parse_fields(fields, path)?;
        self.apply(parsed, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory as s;

    #[test]
    fn map_transforms_output() {
        let schema = s::string().map(|name| name.len());
        assert_eq!(schema.safe_parse(&SborValue::string("daan")).unwrap(), 4);
    }

    #[test]
    fn try_map_rejection_is_path_qualified() {
        let schema = s::structure((("amount", s::decimal().try_map(|d| {
            d.parse::<f64>().map_err(|_| format!("`{d}` is not a number"))
        })),));
        let value = SborValue::tuple(vec![SborValue::decimal("abc").named("amount")]);
        let err = schema.safe_parse(&value).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::Rejected);
        assert_eq!(err.path, vec!["amount"]);
        assert!(schema.validate(&value, &Path::root()).is_err());
    }

    #[test]
    fn boxed_schema_keeps_behavior() {
        let boxed: BoxedSchema<bool> = s::bool().boxed();
        assert!(boxed.safe_parse(&SborValue::bool(true)).unwrap());
        assert!(boxed.safe_parse(&SborValue::string("x")).is_err());
    }

    #[test]
    fn safe_parse_with_enforces_depth() {
        let schema = s::value();
        let mut value = SborValue::bool(true);
        for _ in 0..10 {
            value = SborValue::tuple(vec![value]);
        }
        let opts = ParseOptions::default().max_depth(5);
        let err = schema.safe_parse_with(&value, &opts).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::DepthExceeded);
        assert!(schema.safe_parse_with(&value, &ParseOptions::default()).is_ok());
    }
}
