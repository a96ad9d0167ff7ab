//! Homogeneous collections: `Array` and `Map` nodes.

use crate::error::SborError;
use crate::path::Path;
use crate::schema::{parse_checked, validate_checked, Schema};
use crate::value::{KindSet, SborKind, SborNode, SborValue};

#[derive(Debug, Clone)]
pub struct ArraySchema<S> {
    element: S,
}

impl<S: Schema> ArraySchema<S> {
    pub fn new(element: S) -> Self {
        Self { element }
    }

    fn elements<'v>(&self, value: &'v SborValue, path: &Path<'_>) -> Result<&'v [SborValue], SborError> {
        match &value.node {
            SborNode::Array { elements, .. } => Ok(elements),
            _ => Err(SborError::wrong_kind(self.kinds(), value.kind(), path)),
        }
    }
}

impl<S: Schema> Schema for ArraySchema<S> {
    type Output = Vec<S::Output>;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Array)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.elements(value, path)?
            .iter()
            .enumerate()
            .try_for_each(|(i, element)| validate_checked(&self.element, element, &path.index(i)))
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Vec<S::Output>, SborError> {
        self.elements(value, path)?
            .iter()
            .enumerate()
            .map(|(i, element)| parse_checked(&self.element, element, &path.index(i)))
            .collect()
    }
}

/// Entries come back as ordered pairs. Collecting them into a map keeps
/// the last of any duplicate keys.
#[derive(Debug, Clone)]
pub struct MapSchema<K, V> {
    key: K,
    value: V,
}

impl<K: Schema, V: Schema> MapSchema<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

impl<K: Schema, V: Schema> Schema for MapSchema<K, V> {
    type Output = Vec<(K::Output, V::Output)>;

    fn kinds(&self) -> KindSet {
        KindSet::single(SborKind::Map)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        let SborNode::Map { entries, .. } = &value.node else {
            return Err(SborError::wrong_kind(self.kinds(), value.kind(), path));
        };
        entries.iter().enumerate().try_for_each(|(i, entry)| {
            let at = path.index(i);
            validate_checked(&self.key, &entry.key, &at)?;
            validate_checked(&self.value, &entry.value, &at)
        })
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<Self::Output, SborError> {
        let SborNode::Map { entries, .. } = &value.node else {
            return Err(SborError::wrong_kind(self.kinds(), value.kind(), path));
        };
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| -> Result<_, SborError> {
                let at = path.index(i);
                Ok((
                    parse_checked(&self.key, &entry.key, &at)?,
                    parse_checked(&self.value, &entry.value, &at)?,
                ))
            })
            .collect()
    }
}
