//! Sentiment client trait.
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Polarity/subjectivity of a single text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    /// language detected by the service, if it reports it
    #[serde(default)]
    pub language: Option<String>,
    /// in `[-1, 1]`
    pub polarity: f64,
    /// in `[0, 1]`
    pub subjectivity: f64,
}

impl Sentiment {
    pub fn new(polarity: f64, subjectivity: f64) -> Self {
        Self {
            language: None,
            polarity,
            subjectivity,
        }
    }

    /// Check that values are in range, failing with [Error::TransientService] otherwise.
    pub fn validate(self) -> Result<Self, Error> {
        if !(-1.0..=1.0).contains(&self.polarity) {
            return Err(Error::TransientService(format!(
                "polarity out of range: {}",
                self.polarity
            )));
        }
        if !(0.0..=1.0).contains(&self.subjectivity) {
            return Err(Error::TransientService(format!(
                "subjectivity out of range: {}",
                self.subjectivity
            )));
        }
        Ok(self)
    }
}

/// Single text sentiment analysis.
///
/// Implementors are shared between worker threads, and may be slow (network bound).
/// A failed call returns [Error::TransientService]; callers do not retry.
pub trait Analyze: Sync {
    fn analyze(&self, text: &str) -> Result<Sentiment, Error>;
}

impl<A: Analyze + ?Sized> Analyze for &A {
    fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
        (**self).analyze(text)
    }
}

impl<A: Analyze + ?Sized> Analyze for Box<A> {
    fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
        (**self).analyze(text)
    }
}
