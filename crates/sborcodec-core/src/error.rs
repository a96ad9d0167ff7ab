//! Error types for the SBORCodec parse pipeline.

use crate::path::Path;
use crate::value::{KindSet, SborKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What went wrong while parsing a value tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SborErrorKind {
    /// The node's kind is not in the schema's accepted set.
    WrongKind,
    /// A strict struct is missing one or more declared fields.
    MissingFields,
    /// An ordered tuple has the wrong number of children.
    ArityMismatch,
    /// An enum node names a variant the schema does not declare.
    UnknownVariant,
    /// A unit variant carried a payload.
    UnitPayload,
    /// An integer does not fit its declared width or signedness.
    OutOfRange,
    /// A leaf's textual content is unusable (bad integer text, bad hex).
    Malformed,
    /// A `try_map` conversion refused the parsed value.
    Rejected,
    /// The tree is deeper than the configured limit.
    DepthExceeded,
    /// A recursive schema reference outlived its owner.
    Detached,
}

impl fmt::Display for SborErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SborErrorKind::WrongKind => "wrong_kind",
            SborErrorKind::MissingFields => "missing_fields",
            SborErrorKind::ArityMismatch => "arity_mismatch",
            SborErrorKind::UnknownVariant => "unknown_variant",
            SborErrorKind::UnitPayload => "unit_payload",
            SborErrorKind::OutOfRange => "out_of_range",
            SborErrorKind::Malformed => "malformed",
            SborErrorKind::Rejected => "rejected",
            SborErrorKind::DepthExceeded => "depth_exceeded",
            SborErrorKind::Detached => "detached",
        };
        f.write_str(s)
    }
}

/// The single error a schema raises: a message plus the path to the
/// offending node, e.g. `["items", "3", "StructBased", "name"]`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}{}", render_path(.path))]
pub struct SborError {
    pub kind: SborErrorKind,
    pub message: String,
    pub path: Vec<String>,
}

fn render_path(path: &[String]) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" at `{}`", path.join("."))
    }
}

impl SborError {
    pub fn new(kind: SborErrorKind, message: impl Into<String>, path: &Path<'_>) -> Self {
        Self {
            kind,
            message: message.into(),
            path: path.segments(),
        }
    }

    pub fn wrong_kind(expected: KindSet, got: SborKind, path: &Path<'_>) -> Self {
        Self::new(
            SborErrorKind::WrongKind,
            format!("expected {expected}, got {got}"),
            path,
        )
    }

    pub fn missing_fields(names: &[&str], path: &Path<'_>) -> Self {
        Self::new(
            SborErrorKind::MissingFields,
            format!("missing required field(s): {}", names.join(", ")),
            path,
        )
    }

    pub fn arity_mismatch(expected: usize, got: usize, path: &Path<'_>) -> Self {
        Self::new(
            SborErrorKind::ArityMismatch,
            format!("expected a tuple of {expected} field(s), got {got}"),
            path,
        )
    }

    pub fn unknown_variant(name: Option<&str>, known: &[&str], path: &Path<'_>) -> Self {
        let message = match name {
            Some(name) => format!("unknown variant `{name}` (expected one of: {})", known.join(", ")),
            None => format!("enum node has no variant name (expected one of: {})", known.join(", ")),
        };
        Self::new(SborErrorKind::UnknownVariant, message, path)
    }

    pub fn unit_payload(variant: &str, len: usize, path: &Path<'_>) -> Self {
        Self::new(
            SborErrorKind::UnitPayload,
            format!("unit variant `{variant}` must have no fields, got {len}"),
            path,
        )
    }

    pub fn out_of_range(message: impl Into<String>, path: &Path<'_>) -> Self {
        Self::new(SborErrorKind::OutOfRange, message, path)
    }

    pub fn malformed(message: impl Into<String>, path: &Path<'_>) -> Self {
        Self::new(SborErrorKind::Malformed, message, path)
    }

    pub fn depth_exceeded(depth: usize, limit: usize) -> Self {
        Self::new(
            SborErrorKind::DepthExceeded,
            format!("value tree depth {depth} exceeds the limit of {limit}"),
            &Path::root(),
        )
    }

    /// The path joined with `.`; empty at the root.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}

/// Errors from schema definition parsing and the schema registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Schema '{name}' v{version} already exists")]
    AlreadyExists { name: String, version: u32 },

    #[error("Schema '{name}' not found")]
    NotFound { name: String },

    #[error("Parse error in schema definition: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that abort a batch parse.
#[derive(Debug, Error)]
pub enum BatchParseError {
    #[error("Parse error at index {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: SborError,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),
}
