//! Pipeline trait
use crate::error::Error;

/// A runnable annotation pipeline, producing a `T` once every row is processed.
pub trait Pipeline<T> {
    /// Version of the pipeline, logged at startup.
    fn version() -> &'static str
    where
        Self: Sized;

    fn run(&self) -> Result<T, Error>;
}
