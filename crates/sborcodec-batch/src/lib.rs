//! # sborcodec-batch
//!
//! High-throughput batch parse engine for bulk ledger data (e.g. every
//! vault substate of a state-version snapshot).
//!
//! ## Features
//! - Memory-bounded chunking (default 10,000 values per chunk)
//! - CPU-parallel parsing via Rayon
//! - Progress callbacks (for progress bars / ETAs)
//! - Three error modes: Skip, Collect, Throw
//!
//! ## Usage
//! ```
//! use sborcodec_batch::{BatchEngine, BatchRequest};
//! use sborcodec_core::{s, SborValue};
//!
//! let engine = BatchEngine::new(s::string());
//! let request = BatchRequest::new(vec![SborValue::string("a"), SborValue::bool(true)]);
//! let result = engine.parse(request).unwrap();
//! assert_eq!(result.values, vec![(0, "a".to_string())]);
//! assert_eq!(result.skipped, 1);
//! ```

pub mod engine;
pub mod request;

pub use engine::{BatchEngine, BatchResult};
pub use request::BatchRequest;
