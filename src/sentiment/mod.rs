/*! External sentiment service

The service translates a text and returns its polarity and subjectivity.
It is abstracted by the [Analyze] trait; [HttpAnalyzer] is the HTTP implementation.

[Dispatcher] runs many calls concurrently while keeping results in input order.
!*/
pub mod client;
pub mod dispatcher;
pub mod http;

pub use client::{Analyze, Sentiment};
pub use dispatcher::{Dispatcher, Outcome};
pub use http::{HttpAnalyzer, HttpAnalyzerBuilder};
