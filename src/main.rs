//! # sentiscan
//!
//! Sentiment annotation of tabular text corpora (video comments, titles, descriptions, tags).
//!
//! ## Getting started
//!
//! ```sh
//! sentiscan 0.1.0
//! sentiment annotation of tabular corpora.
//!
//! USAGE:
//!     sentiscan <SUBCOMMAND>
//!
//! SUBCOMMANDS:
//!     categories    Replace YouTube category ids with category names, in place
//!     help          Prints this message or the help of the given subcommand(s)
//!     lexicon       Annotate with affect and emotion lexicons
//!     service       Annotate with polarity and subjectivity from a sentiment service
//! ```
//!
//! Logging is controlled by `RUST_LOG` (`RUST_LOG=info sentiscan service ...` shows progress).
use std::time::Duration;

use structopt::StructOpt;

use sentiscan::categories;
use sentiscan::error::Error;
use sentiscan::pipelines::{
    LexiconPipeline, Pipeline, PipelineConfig, ServiceConfig, ServicePipeline,
};
use sentiscan::sentiment::HttpAnalyzerBuilder;

#[macro_use]
extern crate log;

mod cli;

fn main() {
    env_logger::init();

    let opt = cli::Sentiscan::from_args();
    debug!("cli args\n{:#?}", opt);

    if let Err(e) = run(opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(opt: cli::Sentiscan) -> Result<(), Error> {
    match opt {
        cli::Sentiscan::Lexicon(l) => {
            let config = PipelineConfig {
                columns: l.aliases(),
                affect: l.affect,
                emotion: l.emotion,
                dst: l.dst,
            };
            let report = LexiconPipeline::new(l.src, config).run()?;
            info!("annotated table: {:?}", report.output);
        }

        cli::Sentiscan::Service(s) => {
            let client = HttpAnalyzerBuilder::default()
                .endpoint(&s.endpoint)
                .timeout(Duration::from_secs(s.timeout))
                .source(&s.source_lang)
                .target(&s.target_lang)
                .build()?;
            info!("sentiment service: {}", client.endpoint());

            let mut config = ServiceConfig {
                columns: s.aliases(),
                chunk_size: s.chunk_size,
                checkpoint_every: s.checkpoint_every,
                progress_every: s.progress_every,
                resume: s.resume,
                dst: s.dst,
                ..Default::default()
            };
            if let Some(workers) = s.workers {
                config.worker_limit = workers;
            }

            let report = ServicePipeline::new(s.src, client, config).run()?;
            if report.resumed > 0 {
                info!("resumed after {} rows", report.resumed);
            }
            info!("annotated table: {:?}", report.output);
        }

        cli::Sentiscan::Categories(c) => {
            categories::relabel(&c.src, &c.id_column, &c.name_column)?;
        }
    };
    Ok(())
}
