/*! Batch dispatching

Runs sentiment analysis calls concurrently, chunk by chunk.

Chunks are processed one after the other. Within a chunk, each text is a task run on a bounded [rayon] pool,
so at most `worker_limit` calls are in flight at any time.
Results are collected with an indexed parallel iterator: the output at position `i` is the result of the text
at position `i`, whatever the order in which tasks complete.
!*/
use log::debug;
use rayon::prelude::*;

use super::client::{Analyze, Sentiment};
use crate::error::Error;
use crate::io::table::is_blank;

/// Default number of texts per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Default worker limit: twice the available parallelism, calls being network bound.
pub fn default_worker_limit() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get() * 2)
        .unwrap_or(8)
}

/// Result of a single text.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Scored(Sentiment),
    /// null or blank text, the client was not called
    Skipped,
    /// the client failed
    Failed,
}

impl Outcome {
    /// `(polarity, subjectivity)` if the text was scored.
    pub fn scores(&self) -> Option<(f64, f64)> {
        match self {
            Outcome::Scored(s) => Some((s.polarity, s.subjectivity)),
            _ => None,
        }
    }
}

/// Parallel dispatcher over a bounded worker pool.
pub struct Dispatcher {
    pool: rayon::ThreadPool,
    worker_limit: usize,
    chunk_size: usize,
}

impl Dispatcher {
    pub fn new(worker_limit: usize, chunk_size: usize) -> Result<Self, Error> {
        if worker_limit == 0 || chunk_size == 0 {
            return Err(Error::Custom(format!(
                "worker limit ({worker_limit}) and chunk size ({chunk_size}) must be positive"
            )));
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(worker_limit)
            .thread_name(|idx| format!("sentiment-worker-{idx}"))
            .build()
            .map_err(|e| Error::Custom(format!("could not build worker pool: {e}")))?;

        Ok(Self {
            pool,
            worker_limit,
            chunk_size,
        })
    }

    pub fn worker_limit(&self) -> usize {
        self.worker_limit
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Analyze every text of `texts`, one chunk at a time.
    pub fn dispatch<A: Analyze + ?Sized>(&self, texts: &[Option<&str>], client: &A) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.chunk_size) {
            outcomes.extend(self.dispatch_chunk(chunk, client));
        }
        outcomes
    }

    /// Analyze a single chunk, blocking until every task is done.
    ///
    /// Null and blank texts are not sent. A failing call only affects its own position.
    pub fn dispatch_chunk<A: Analyze + ?Sized>(&self, chunk: &[Option<&str>], client: &A) -> Vec<Outcome> {
        self.pool.install(|| {
            chunk
                .par_iter()
                .map(|text| match *text {
                    Some(text) if !is_blank(Some(text)) => match client.analyze(text) {
                        Ok(sentiment) => Outcome::Scored(sentiment),
                        Err(e) => {
                            debug!("analysis failed: {}", e);
                            Outcome::Failed
                        }
                    },
                    _ => Outcome::Skipped,
                })
                .collect()
        })
    }
}
