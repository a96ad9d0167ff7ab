//! `Option<T>`: the two-variant enum `None` | `Some(T)` as the ledger encodes it.

use crate::error::SborError;
use crate::path::Path;
use crate::schema::Schema;
use crate::tuple::TupleSchema;
use crate::value::{KindSet, SborValue};
use crate::variant::{EnumSchema, Variant};

fn unwrap_single<T>((value,): (T,)) -> T {
    value
}

/// An enum of a unit `None` and a single-field tuple `Some`.
#[derive(Debug, Clone)]
pub struct OptionSchema<T> {
    inner: EnumSchema<T>,
}

impl<T: 'static> OptionSchema<T> {
    pub fn new<S>(inner: S) -> Self
    where
        S: Schema<Output = T> + 'static,
    {
        let some = TupleSchema::new((inner,)).map(unwrap_single as fn((T,)) -> T);
        Self {
            inner: EnumSchema::new(vec![Variant::unit("None"), Variant::new("Some", some)]),
        }
    }
}

impl<T> Schema for OptionSchema<T> {
    type Output = Option<T>;

    fn kinds(&self) -> KindSet {
        self.inner.kinds()
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.inner.validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Option<T>, SborError> {
        Ok(self.inner.parse(value, path)?.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SborErrorKind;
    use crate::factory as s;

    #[test]
    fn some_and_none() {
        let schema = s::option(s::string());
        let some = SborValue::enumeration(1, "Some", vec![SborValue::string("x")]);
        let none = SborValue::enumeration(0, "None", vec![]);
        assert_eq!(schema.safe_parse(&some).unwrap().as_deref(), Some("x"));
        assert_eq!(schema.safe_parse(&none).unwrap(), None);
    }

    #[test]
    fn some_requires_exactly_one_field() {
        let schema = s::option(s::string());
        let empty_some = SborValue::enumeration(1, "Some", vec![]);
        let err = schema.safe_parse(&empty_some).unwrap_err();
        assert_eq!(err.kind, SborErrorKind::ArityMismatch);
        assert_eq!(err.path, vec!["Some"]);
    }

    #[test]
    fn inner_errors_are_positional() {
        let schema = s::option(s::bool());
        let some = SborValue::enumeration(1, "Some", vec![SborValue::string("x")]);
        let err = schema.safe_parse(&some).unwrap_err();
        assert_eq!(err.path, vec!["Some", "0"]);
    }
}
