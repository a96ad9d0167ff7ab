//! # sborcodec-registry
//!
//! Schema registry for SBORCodec.
//!
//! Definitions are written as YAML documents (see [`definition`]), parsed
//! into `SchemaDefinition`s, and stored by name and version in a
//! [`MemoryRegistry`]. The public-facing API is the `SchemaRegistry` trait
//! from `sborcodec-core`.

pub mod definition;
pub mod memory;

pub use definition::DefinitionParser;
pub use memory::MemoryRegistry;
