//! Struct schemas: a Tuple node whose children are matched by `field_name`.
//!
//! Field sets are either a Rust tuple of `(name, schema)` pairs, which gives
//! a heterogeneous output tuple, or a `Vec` of pairs sharing one schema type
//! (typically a boxed dynamic schema).

use crate::error::SborError;
use crate::path::Path;
use crate::schema::{parse_checked, tuple_fields, validate_checked, PayloadSchema, Schema};
use crate::value::{KindSet, SborKind, SborValue};

/// One declared struct field.
pub trait NamedField: Send + Sync {
    type Schema: Schema;

    fn name(&self) -> &str;

    fn schema(&self) -> &Self::Schema;
}

impl<N, S> NamedField for (N, S)
where
    N: AsRef<str> + Send + Sync,
    S: Schema,
{
    type Schema = S;

    fn name(&self) -> &str {
        self.0.as_ref()
    }

    fn schema(&self) -> &S {
        &self.1
    }
}

type FieldOutput<F> = <<F as NamedField>::Schema as Schema>::Output;

/// An ordered set of declared fields.
pub trait Fields: Send + Sync {
    /// Output when every field is required.
    type Output;
    /// Output when absent fields are allowed.
    type Partial;

    fn names(&self) -> Vec<&str>;

    /// Validate every declared field that is present among `children`.
    fn validate_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError>;

    fn parse_required(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError>;

    fn parse_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Partial, SborError>;
}

/// First child carrying `name` as its `field_name`.
fn find_child<'v>(children: &'v [SborValue], name: &str) -> Option<&'v SborValue> {
    children
        .iter()
        .find(|child| child.field_name.as_deref() == Some(name))
}

fn validate_field<F: NamedField>(field: &F, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
    match find_child(children, field.name()) {
        Some(child) => validate_checked(field.schema(), child, &path.field(field.name())),
        None => Ok(()),
    }
}

fn parse_required_field<F: NamedField>(
    field: &F,
    children: &[SborValue],
    path: &Path<'_>,
) -> Result<FieldOutput<F>, SborError> {
    let name = field.name();
    let child = find_child(children, name).ok_or_else(|| SborError::missing_fields(&[name], path))?;
    parse_checked(field.schema(), child, &path.field(name))
}

fn parse_optional_field<F: NamedField>(
    field: &F,
    children: &[SborValue],
    path: &Path<'_>,
) -> Result<Option<FieldOutput<F>>, SborError> {
    let name = field.name();
    find_child(children, name)
        .map(|child| parse_checked(field.schema(), child, &path.field(name)))
        .transpose()
}

macro_rules! impl_fields {
    ($($F:ident),+) => {
        impl<$($F: NamedField),+> Fields for ($($F,)+) {
            type Output = ($(FieldOutput<$F>,)+);
            type Partial = ($(Option<FieldOutput<$F>>,)+);

            fn names(&self) -> Vec<&str> {
                #[allow(non_snake_case)]
                let ($($F,)+) = self;
                vec![$($F.name()),+]
            }

            fn validate_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
                #[allow(non_snake_case)]
                let ($($F,)+) = self;
                $(validate_field($F, children, path)?;)+
                Ok(())
            }

            fn parse_required(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError> {
                #[allow(non_snake_case)]
                let ($($F,)+) = self;
                Ok(($(parse_required_field($F, children, path)?,)+))
            }

            fn parse_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Partial, SborError> {
                #[allow(non_snake_case)]
                let ($($F,)+) = self;
                Ok(($(parse_optional_field($F, children, path)?,)+))
            }
        }
    };
}

impl_fields!(A);
impl_fields!(A, B);
impl_fields!(A, B, C);
impl_fields!(A, B, C, D);
impl_fields!(A, B, C, D, E);
impl_fields!(A, B, C, D, E, F);
impl_fields!(A, B, C, D, E, F, G);
impl_fields!(A, B, C, D, E, F, G, H);
impl_fields!(A, B, C, D, E, F, G, H, I);
impl_fields!(A, B, C, D, E, F, G, H, I, J);
impl_fields!(A, B, C, D, E, F, G, H, I, J, K);
impl_fields!(A, B, C, D, E, F, G, H, I, J, K, L);

impl<F: NamedField> Fields for Vec<F> {
    type Output = Vec<(String, FieldOutput<F>)>;
    type Partial = Vec<(String, Option<FieldOutput<F>>)>;

    fn names(&self) -> Vec<&str> {
        self.iter().map(|f| f.name()).collect()
    }

    fn validate_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.iter().try_for_each(|f| validate_field(f, children, path))
    }

    fn parse_required(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError> {
        self.iter()
            .map(|f| -> Result<_, SborError> {
                Ok((f.name().to_string(), parse_required_field(f, children, path)?))
            })
            .collect()
    }

    fn parse_present(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Partial, SborError> {
        self.iter()
            .map(|f| -> Result<_, SborError> {
                Ok((f.name().to_string(), parse_optional_field(f, children, path)?))
            })
            .collect()
    }
}

/// A struct whose declared fields must all be present.
///
/// Children without a declared name are ignored, and so are children whose
/// `field_name` is not declared. When names repeat, the first child wins.
#[derive(Debug, Clone)]
pub struct StructSchema<F> {
    fields: F,
}

impl<F: Fields> StructSchema<F> {
    pub fn new(fields: F) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }

    /// Reports every missing field in one error.
    fn check_missing(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        let missing: Vec<&str> = self
            .fields
            .names()
            .into_iter()
            .filter(|name| find_child(children, name).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(SborError::missing_fields(&missing, path))
        }
    }
}

impl<F: Fields> Schema for StructSchema<F> {
    type Output = F::Output;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Tuple)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.validate_fields(tuple_fields(value, path)?, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<F::Output, SborError> {
        self.parse_fields(tuple_fields(value, path)?, path)
    }
}

impl<F: Fields> PayloadSchema for StructSchema<F> {
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.check_missing(fields, path)?;
        self.fields.validate_present(fields, path)
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<F::Output, SborError> {
        self.check_missing(fields, path)?;
        self.fields.parse_required(fields, path)
    }
}

/// A struct whose absent fields parse as `None`.
#[derive(Debug, Clone)]
pub struct PartialStructSchema<F> {
    fields: F,
}

impl<F: Fields> PartialStructSchema<F> {
    pub fn new(fields: F) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &F {
        &self.fields
    }
}

impl<F: Fields> Schema for PartialStructSchema<F> {
    type Output = F::Partial;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Tuple)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.validate_fields(tuple_fields(value, path)?, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<F::Partial, SborError> {
        self.parse_fields(tuple_fields(value, path)?, path)
    }
}

impl<F: Fields> PayloadSchema for PartialStructSchema<F> {
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.fields.validate_present(fields, path)
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<F::Partial, SborError> {
        self.fields.parse_present(fields, path)
    }
}
