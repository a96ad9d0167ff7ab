//! Ordered tuple schemas: positional matching with an exact arity.

use crate::error::SborError;
use crate::path::Path;
use crate::schema::{parse_checked, tuple_fields, validate_checked, PayloadSchema, Schema};
use crate::value::{KindSet, SborKind, SborValue};

/// A fixed-length list of element schemas.
pub trait Elements: Send + Sync {
    type Output;

    fn arity(&self) -> usize;

    /// Check each child against its position. The caller has already
    /// checked the arity.
    fn validate_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError>;

    fn parse_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError>;
}

impl Elements for () {
    type Output = ();

    fn arity(&self) -> usize {
        0
    }

    fn validate_each(&self, _children: &[SborValue], _path: &Path<'_>) -> Result<(), SborError> {
        Ok(())
    }

    fn parse_each(&self, _children: &[SborValue], _path: &Path<'_>) -> Result<(), SborError> {
        Ok(())
    }
}

/// Pull the next child off the positional walk.
fn next_child<'v, I>(iter: &mut I, arity: usize, got: usize, path: &Path<'_>) -> Result<(usize, &'v SborValue), SborError>
where
    I: Iterator<Item = (usize, &'v SborValue)>,
{
    iter.next().ok_or_else(|| SborError::arity_mismatch(arity, got, path))
}

macro_rules! count {
    () => { 0usize };
    ($head:ident $($tail:ident)*) => { 1usize + count!($($tail)*) };
}

macro_rules! impl_elements {
    ($($S:ident),+) => {
        impl<$($S: Schema),+> Elements for ($($S,)+) {
            type Output = ($($S::Output,)+);

            fn arity(&self) -> usize {
                count!($($S)+)
            }

            fn validate_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
                #[allow(non_snake_case)]
                let ($($S,)+) = self;
                let mut walk = children.iter().enumerate();
                $(
                    let (i, child) = next_child(&mut walk, self.arity(), children.len(), path)?;
                    validate_checked($S, child, &path.index(i))?;
                )+
                Ok(())
            }

            fn parse_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError> {
                #[allow(non_snake_case)]
                let ($($S,)+) = self;
                let mut walk = children.iter().enumerate();
                Ok(($({
                    let (i, child) = next_child(&mut walk, self.arity(), children.len(), path)?;
                    parse_checked($S, child, &path.index(i))?
                },)+))
            }
        }
    };
}

impl_elements!(A);
impl_elements!(A, B);
impl_elements!(A, B, C);
impl_elements!(A, B, C, D);
impl_elements!(A, B, C, D, E);
impl_elements!(A, B, C, D, E, F);
impl_elements!(A, B, C, D, E, F, G);
impl_elements!(A, B, C, D, E, F, G, H);
impl_elements!(A, B, C, D, E, F, G, H, I);
impl_elements!(A, B, C, D, E, F, G, H, I, J);
impl_elements!(A, B, C, D, E, F, G, H, I, J, K);
impl_elements!(A, B, C, D, E, F, G, H, I, J, K, L);

impl<S: Schema> Elements for Vec<S> {
    type Output = Vec<S::Output>;

    fn arity(&self) -> usize {
        self.len()
    }

    fn validate_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.iter()
            .zip(children)
            .enumerate()
            .try_for_each(|(i, (schema, child))| validate_checked(schema, child, &path.index(i)))
    }

    fn parse_each(&self, children: &[SborValue], path: &Path<'_>) -> Result<Self::Output, SborError> {
        self.iter()
            .zip(children)
            .enumerate()
            .map(|(i, (schema, child))| parse_checked(schema, child, &path.index(i)))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct TupleSchema<E> {
    elements: E,
}

impl<E: Elements> TupleSchema<E> {
    pub fn new(elements: E) -> Self {
        Self { elements }
    }

    pub fn arity(&self) -> usize {
        self.elements.arity()
    }

    fn check_arity(&self, children: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        let expected = self.elements.arity();
        if children.len() == expected {
            Ok(())
        } else {
            Err(SborError::arity_mismatch(expected, children.len(), path))
        }
    }
}

impl<E: Elements> Schema for TupleSchema<E> {
    type Output = E::Output;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Tuple)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.validate_fields(tuple_fields(value, path)?, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<E::Output, SborError> {
        self.parse_fields(tuple_fields(value, path)?, path)
    }
}

impl<E: Elements> PayloadSchema for TupleSchema<E> {
    fn validate_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<(), SborError> {
        self.check_arity(fields, path)?;
        self.elements.validate_each(fields, path)
    }

    fn parse_fields(&self, fields: &[SborValue], path: &Path<'_>) -> Result<E::Output, SborError> {
        self.check_arity(fields, path)?;
        self.elements.parse_each(fields, path)
    }
}
