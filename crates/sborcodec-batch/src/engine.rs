//! `BatchEngine`: chunked, parallel parsing of many trees with one schema.

use crate::request::BatchRequest;
use rayon::prelude::*;
use sborcodec_core::{
    error::{BatchParseError, SborError},
    options::ErrorMode,
    schema::Schema,
    value::SborValue,
};
use tracing::{debug, info};

/// Result of a batch parse job.
#[derive(Debug)]
pub struct BatchResult<T> {
    /// (original_index, output) pairs, in input order
    pub values: Vec<(usize, T)>,
    /// (original_index, error) pairs; only populated in Collect mode
    pub errors: Vec<(usize, SborError)>,
    /// Failures dropped in Skip mode
    pub skipped: usize,
    /// Total input values processed
    pub total_input: usize,
}

impl<T> BatchResult<T> {
    /// The outputs without their indices.
    pub fn into_values(self) -> Vec<T> {
        self.values.into_iter().map(|(_, v)| v).collect()
    }
}

/// Batch parse engine around a single shared schema.
pub struct BatchEngine<S> {
    schema: S,
}

impl<S> BatchEngine<S>
where
    S: Schema,
    S::Output: Send,
{
    pub fn new(schema: S) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// Execute a batch parse request.
    ///
    /// With `concurrency > 0` the job runs on a dedicated pool of that many
    /// threads; otherwise on Rayon's global pool.
    pub fn parse(&self, req: BatchRequest) -> Result<BatchResult<S::Output>, BatchParseError> {
        if req.concurrency == 0 {
            return self.run(&req);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(req.concurrency)
            .build()
            .map_err(|e| BatchParseError::ThreadPool(e.to_string()))?;
        pool.install(|| self.run(&req))
    }

    fn run(&self, req: &BatchRequest) -> Result<BatchResult<S::Output>, BatchParseError> {
        let total_input = req.values.len();
        let chunk_size = req.chunk_size.max(1);
        info!(
            total_input,
            chunk_size,
            error_mode = ?req.error_mode,
            "BatchEngine: parsing values"
        );

        let mut values = Vec::with_capacity(total_input);
        let mut errors = Vec::new();
        let mut skipped = 0usize;
        let mut offset = 0usize;

        for chunk in req.values.chunks(chunk_size) {
            for (local_idx, result) in self.parse_chunk(chunk, req) {
                let index = offset + local_idx;
                match result {
                    Ok(v) => values.push((index, v)),
                    Err(source) => match req.error_mode {
                        ErrorMode::Skip => {
                            debug!(index, error = %source, "skipping value");
                            skipped += 1;
                        }
                        ErrorMode::Collect => errors.push((index, source)),
                        // Results are in input order, so this is the lowest failing index.
                        ErrorMode::Throw => return Err(BatchParseError::ItemFailed { index, source }),
                    },
                }
            }

            offset += chunk.len();
            if let Some(cb) = &req.on_progress {
                cb(offset, total_input);
            }
        }

        info!(
            parsed = values.len(),
            errors = errors.len(),
            skipped,
            "BatchEngine: complete"
        );

        Ok(BatchResult {
            values,
            errors,
            skipped,
            total_input,
        })
    }

    fn parse_chunk(
        &self,
        chunk: &[SborValue],
        req: &BatchRequest,
    ) -> Vec<(usize, Result<S::Output, SborError>)> {
        chunk
            .par_iter()
            .enumerate()
            .map(|(idx, value)| (idx, self.schema.safe_parse_with(value, &req.options)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sborcodec_core::{s, ParseOptions, SborErrorKind, SborKind};
    use std::sync::{Arc, Mutex};

    /// U8 values 0..n, with every index in `bad` replaced by a string.
    fn inputs(n: usize, bad: &[usize]) -> Vec<SborValue> {
        (0..n)
            .map(|i| {
                if bad.contains(&i) {
                    SborValue::string("oops")
                } else {
                    SborValue::integer(SborKind::U8, (i % 256).to_string()).unwrap()
                }
            })
            .collect()
    }

    fn engine() -> BatchEngine<impl Schema<Output = u8>> {
        BatchEngine::new(s::number().try_map(u8::try_from))
    }

    #[test]
    fn skip_mode_drops_failures_and_keeps_indices() {
        let req = BatchRequest::new(inputs(10, &[3, 7])).chunk_size(4);
        let result = engine().parse(req).unwrap();
        assert_eq!(result.total_input, 10);
        assert_eq!(result.skipped, 2);
        assert!(result.errors.is_empty());
        let indices: Vec<usize> = result.values.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 4, 5, 6, 8, 9]);
        assert_eq!(result.values[3], (4, 4));
    }

    #[test]
    fn collect_mode_returns_errors_with_global_indices() {
        let req = BatchRequest::new(inputs(10, &[3, 7]))
            .chunk_size(4)
            .error_mode(ErrorMode::Collect);
        let result = engine().parse(req).unwrap();
        assert_eq!(result.values.len(), 8);
        let failed: Vec<usize> = result.errors.iter().map(|(i, _)| *i).collect();
        assert_eq!(failed, vec![3, 7]);
        assert_eq!(result.errors[0].1.kind, SborErrorKind::WrongKind);
    }

    #[test]
    fn throw_mode_reports_lowest_failing_index() {
        let req = BatchRequest::new(inputs(10, &[8, 5]))
            .chunk_size(100)
            .error_mode(ErrorMode::Throw);
        match engine().parse(req) {
            Err(BatchParseError::ItemFailed { index, .. }) => assert_eq!(index, 5),
            other => panic!("expected ItemFailed, got {other:?}"),
        }
    }

    #[test]
    fn progress_is_reported_per_chunk() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let req = BatchRequest::new(inputs(10, &[]))
            .chunk_size(4)
            .on_progress(move |done, total| sink.lock().unwrap().push((done, total)));
        engine().parse(req).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![(4, 10), (8, 10), (10, 10)]);
    }

    #[test]
    fn dedicated_pool_and_zero_chunk_size() {
        let req = BatchRequest::new(inputs(5, &[])).concurrency(2).chunk_size(0);
        let result = engine().parse(req).unwrap();
        assert_eq!(result.into_values(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn depth_limit_applies_per_value() {
        let deep = SborValue::array(
            SborKind::Array,
            vec![SborValue::array(SborKind::Bool, vec![SborValue::bool(true)])],
        );
        let engine = BatchEngine::new(s::value());
        let req = BatchRequest::new(vec![deep, SborValue::bool(false)])
            .options(ParseOptions::default().max_depth(2))
            .error_mode(ErrorMode::Collect);
        let result = engine.parse(req).unwrap();
        assert_eq!(result.values.len(), 1);
        assert_eq!(result.errors[0].0, 0);
        assert_eq!(result.errors[0].1.kind, SborErrorKind::DepthExceeded);
    }
}
