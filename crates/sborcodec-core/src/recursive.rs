//! Self-referential schemas.
//!
//! [`recursive`](crate::factory::recursive) hands the builder a
//! [`RecursiveRef`], a weak handle to the schema being built. The finished
//! schema lives in an `Arc<OnceLock<..>>` owned by [`Recursive`], so the
//! back-edges never keep it alive and nothing leaks.

use crate::error::{SborError, SborErrorKind};
use crate::path::Path;
use crate::schema::{BoxedSchema, Schema};
use crate::value::{KindSet, SborValue};
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

type Slot<T> = OnceLock<BoxedSchema<T>>;

fn detached(path: &Path<'_>) -> SborError {
    SborError::new(
        SborErrorKind::Detached,
        "recursive schema reference used after its owner was dropped",
        path,
    )
}

/// Owner of a recursive schema.
pub struct Recursive<T> {
    slot: Arc<Slot<T>>,
}

/// Weak back-reference to the enclosing [`Recursive`].
pub struct RecursiveRef<T> {
    slot: Weak<Slot<T>>,
}

impl<T> Recursive<T> {
    pub fn new<S, F>(build: F) -> Self
    where
        F: FnOnce(RecursiveRef<T>) -> S,
        S: Schema<Output = T> + 'static,
    {
        let slot: Arc<Slot<T>> = Arc::new(OnceLock::new());
        let schema = build(RecursiveRef {
            slot: Arc::downgrade(&slot),
        });
        // The lock is fresh and private, so this is the only write.
        let _ = slot.set(schema.boxed());
        Self { slot }
    }
}

impl<T> Clone for Recursive<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Clone for RecursiveRef<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Weak::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Recursive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Recursive({})", self.kinds())
    }
}

impl<T> fmt::Debug for RecursiveRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecursiveRef(attached: {})", self.slot.strong_count() > 0)
    }
}

impl<T> Schema for Recursive<T> {
    type Output = T;

    fn kinds(&self) -> KindSet {
        self.slot.get().map(|s| s.kinds()).unwrap_or(KindSet::EMPTY)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.slot.get().ok_or_else(|| detached(path))?.validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<T, SborError> {
        self.slot.get().ok_or_else(|| detached(path))?.parse(value, path)
    }
}

impl<T> RecursiveRef<T> {
    fn resolve(&self, path: &Path<'_>) -> Result<BoxedSchema<T>, SborError> {
        self.slot
            .upgrade()
            .and_then(|slot| slot.get().cloned())
            .ok_or_else(|| detached(path))
    }
}

impl<T> Schema for RecursiveRef<T> {
    type Output = T;

    /// Empty while the enclosing schema is still being built or after it
    /// was dropped.
    fn kinds(&self) -> KindSet {
        self.slot
            .upgrade()
            .and_then(|slot| slot.get().map(|s| s.kinds()))
            .unwrap_or(KindSet::EMPTY)
    }

    fn validate(&self, value: &SborValue, path: &Path<'_>) -> Result<(), SborError> {
        self.resolve(path)?.validate(value, path)
    }

    fn parse(&self, value: &SborValue, path: &Path<'_>) -> Result<T, SborError> {
        self.resolve(path)?.parse(value, path)
    }
}
