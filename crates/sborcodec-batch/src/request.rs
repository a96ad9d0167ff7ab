//! Batch parse request configuration.

use sborcodec_core::{options::ErrorMode, options::ParseOptions, value::SborValue};

/// Configuration for a batch parse job.
pub struct BatchRequest {
    /// The value trees to parse
    pub values: Vec<SborValue>,
    /// Number of parallel Rayon workers (0 = use the global pool)
    pub concurrency: usize,
    /// Max values per chunk (memory safety)
    pub chunk_size: usize,
    /// How to handle parse errors
    pub error_mode: ErrorMode,
    /// Per-value parse options (depth limit)
    pub options: ParseOptions,
    /// Called after every chunk with `(processed, total)`
    pub on_progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl BatchRequest {
    pub fn new(values: Vec<SborValue>) -> Self {
        Self {
            values,
            concurrency: 0,
            chunk_size: 10_000,
            error_mode: ErrorMode::Skip,
            options: ParseOptions::default(),
            on_progress: None,
        }
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    pub fn error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn on_progress<F: Fn(usize, usize) + Send + Sync + 'static>(mut self, f: F) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}
