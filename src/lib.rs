/*! Sentiment annotation of tabular text corpora.

Two independent strategies are provided:

- [pipelines::LexiconPipeline] scores texts against an affect lexicon and an emotion lexicon,
- [pipelines::ServicePipeline] sends texts to an external sentiment service, concurrently,
  with resumable checkpoints.

Both read a CSV corpus and write it back with annotation columns appended,
keeping row order and passthrough columns intact.
!*/
pub mod categories;
pub mod error;
pub mod io;
pub mod lexicon;
pub mod pipelines;
pub mod sentiment;
pub mod tokenizer;
