//! # sborcodec-observability
//!
//! Structured logging for SBORCodec.
//!
//! The library crates only emit `tracing` events; binaries call
//! [`init_tracing`] once at startup to decide where they go.
//! Output is human-readable text or JSON (ELK, Loki, CloudWatch), with log
//! levels configurable per component.

pub mod tracing_setup;

pub use tracing_setup::{init_tracing, LogConfig};
