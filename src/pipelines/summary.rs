//! Run summary and progress reporting.
use std::fmt;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::sentiment::Outcome;

/// Per-record counts of a run.
///
/// Counts are per text field: a row with three text columns counts three times.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// rows in the input table
    pub rows: usize,
    pub scored: usize,
    /// null or blank texts
    pub skipped: usize,
    /// failed service calls
    pub failed: usize,
    /// fields that could not be decoded
    pub malformed: usize,
}

impl RunSummary {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Scored(_) => self.scored += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    /// Log the summary, at `warn` if some records failed.
    pub fn log(&self) {
        if self.failed > 0 || self.malformed > 0 {
            warn!("{}", self);
        } else {
            info!("{}", self);
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows: {} scored, {} skipped, {} failed, {} malformed",
            self.rows, self.scored, self.skipped, self.failed, self.malformed
        )
    }
}

/// Reports throughput every `every` rows.
#[derive(Debug)]
pub struct Progress {
    total: usize,
    every: usize,
    /// rows already done when the run started (resume)
    start: usize,
    last: usize,
    started: Instant,
}

impl Progress {
    /// An `every` of 0 disables reporting.
    pub fn new(total: usize, every: usize, start: usize) -> Self {
        Self {
            total,
            every,
            start,
            last: start,
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Rows per second processed since the start of the run.
    pub fn rate(&self, processed: usize) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            processed.saturating_sub(self.start) as f64 / secs
        } else {
            0.0
        }
    }

    /// Update with the number of `processed` rows, returning `true` if a report was logged.
    pub fn update(&mut self, processed: usize) -> bool {
        if self.every == 0 || processed <= self.last {
            return false;
        }
        if processed < self.last.saturating_add(self.every) && processed < self.total {
            return false;
        }

        self.last = processed;
        let percent = if self.total > 0 {
            processed as f64 * 100.0 / self.total as f64
        } else {
            100.0
        };
        info!(
            "{}/{} rows ({:.1}%), {:.1} rows/s, elapsed {:.1?}",
            processed,
            self.total,
            percent,
            self.rate(processed),
            self.elapsed()
        );
        true
    }
}
