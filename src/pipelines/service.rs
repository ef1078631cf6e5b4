//! Sentiment service annotation pipeline
//!
//! Annotates every text column of a corpus with the polarity and subjectivity
//! given by an external sentiment service.
//!
//! # Processing
//! 1. The corpus is loaded, text columns are resolved from their aliases.
//! 1. If asked to, a previous checkpoint is loaded and processing starts after its last row.
//! 1. Rows are processed chunk by chunk. Within a chunk, each column is dispatched in declared order
//!    on the worker pool. Once a chunk is done, every column of its rows is annotated.
//! 1. Every `checkpoint_every` rows, the annotated prefix is saved to `<stem>_analyzed.partial.csv`.
//! 1. At the end, the complete table is saved and moved to `<stem>_analyzed.csv`.
//!
//! Failed calls and empty texts leave empty annotation fields.
use std::path::{Path, PathBuf};

use csv::StringRecord;
use itertools::Itertools;
use log::{debug, info, warn};

use crate::error::Error;
use crate::io::checkpoint::{self, CheckpointWriter, DEFAULT_INTERVAL};
use crate::io::columns::{default_service_aliases, resolve, Alias, ResolvedColumn};
use crate::io::table::{derive_path, output_dir, Table};
use crate::io::writer::Annotations;
use crate::pipelines::pipeline::Pipeline;
use crate::pipelines::state::{State, StateMachine};
use crate::pipelines::summary::{Progress, RunSummary};
use crate::sentiment::dispatcher::{default_worker_limit, DEFAULT_CHUNK_SIZE};
use crate::sentiment::{Analyze, Dispatcher};

pub const OUTPUT_SUFFIX: &str = "_analyzed.csv";
pub const CHECKPOINT_SUFFIX: &str = "_analyzed.partial.csv";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Service pipeline configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub columns: Vec<Alias>,
    /// maximum number of concurrent service calls
    pub worker_limit: usize,
    /// rows per chunk
    pub chunk_size: usize,
    /// rows between checkpoints, 0 to disable intermediate checkpoints
    pub checkpoint_every: usize,
    /// rows between progress reports, 0 to disable them
    pub progress_every: usize,
    /// continue from an existing checkpoint
    pub resume: bool,
    /// output folder. Defaults to the input folder.
    pub dst: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            columns: default_service_aliases(),
            worker_limit: default_worker_limit(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            checkpoint_every: DEFAULT_INTERVAL,
            progress_every: DEFAULT_PROGRESS_INTERVAL,
            resume: false,
            dst: None,
        }
    }
}

/// Service annotations of a single row: `(polarity, subjectivity)` for each column, if scored.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceAnnotation(Vec<Option<(f64, f64)>>);

impl ServiceAnnotation {
    pub fn scores(&self) -> &[Option<(f64, f64)>] {
        &self.0
    }

    /// Parse annotation fields back, as written by [Annotations::fields].
    fn parse(record: &StringRecord, columns: usize) -> Result<Self, String> {
        if record.len() != columns * 2 {
            return Err(format!(
                "{} annotation fields, expected {}",
                record.len(),
                columns * 2
            ));
        }

        let parse = |field: &str| {
            field
                .parse::<f64>()
                .map_err(|e| format!("invalid score {field:?}: {e}"))
        };
        let mut scores = Vec::with_capacity(columns);
        for (polarity, subjectivity) in record.iter().tuples() {
            match (polarity, subjectivity) {
                ("", "") => scores.push(None),
                (p, s) => scores.push(Some((parse(p)?, parse(s)?))),
            }
        }
        Ok(Self(scores))
    }
}

impl Annotations for ServiceAnnotation {
    fn fields(&self) -> Vec<String> {
        self.0
            .iter()
            .flat_map(|scores| match scores {
                Some((polarity, subjectivity)) => [polarity.to_string(), subjectivity.to_string()],
                None => [String::new(), String::new()],
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct ServiceReport {
    /// annotated table
    pub output: PathBuf,
    /// rows taken from a checkpoint
    pub resumed: usize,
    pub summary: RunSummary,
}

/// Service pipeline, generic over the sentiment client.
///
/// The client is owned by the pipeline and dropped with it.
pub struct ServicePipeline<A> {
    src: PathBuf,
    client: A,
    config: ServiceConfig,
}

impl<A: Analyze> ServicePipeline<A> {
    pub fn new(src: PathBuf, client: A, config: ServiceConfig) -> Self {
        Self {
            src,
            client,
            config,
        }
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Input headers followed by `<column>_polarity` and `<column>_subjectivity` for each column.
    fn output_headers(table: &Table, columns: &[ResolvedColumn]) -> Vec<String> {
        let mut headers = table.headers().to_vec();
        for column in columns {
            headers.push(format!("{}_polarity", column.header));
            headers.push(format!("{}_subjectivity", column.header));
        }
        headers
    }

    /// Annotations of an existing checkpoint, if resuming.
    fn resume(
        &self,
        partial: &Path,
        table: &Table,
        headers: &[String],
        columns: usize,
    ) -> Result<Vec<ServiceAnnotation>, Error> {
        if !partial.exists() {
            if self.config.resume {
                info!("no checkpoint found at {:?}, starting from scratch", partial);
            }
            return Ok(Vec::new());
        }
        if !self.config.resume {
            warn!(
                "checkpoint {:?} exists and will be overwritten (use --resume to continue from it)",
                partial
            );
            return Ok(Vec::new());
        }

        checkpoint::load(partial, table, headers)?
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                ServiceAnnotation::parse(record, columns).map_err(|reason| {
                    Error::IncompatibleCheckpoint {
                        path: partial.to_path_buf(),
                        reason: format!("row {idx}: {reason}"),
                    }
                })
            })
            .collect()
    }

    /// Texts of `column` for rows `[start, end)`. Undecodable fields are null.
    fn texts<'t>(
        table: &'t Table,
        column: &ResolvedColumn,
        start: usize,
        end: usize,
        summary: &mut RunSummary,
    ) -> Vec<Option<&'t str>> {
        (start..end)
            .map(|row| match table.text(row, column.index) {
                Ok(text) => text,
                Err(e) => {
                    debug!("{}", e);
                    summary.malformed += 1;
                    None
                }
            })
            .collect()
    }
}

impl<A: Analyze> Pipeline<ServiceReport> for ServicePipeline<A> {
    fn version() -> &'static str {
        "1.0.0"
    }

    fn run(&self) -> Result<ServiceReport, Error> {
        info!("service pipeline v{}", Self::version());
        let mut sm = StateMachine::default();

        sm.advance(State::LoadingResources)?;
        let table = Table::from_path(&self.src).map_err(|e| sm.fail(e))?;
        let columns = resolve(
            table.headers(),
            &self.config.columns,
            &self.src.to_string_lossy(),
        )
        .map_err(|e| sm.fail(e))?;
        let dispatcher = Dispatcher::new(self.config.worker_limit, self.config.chunk_size)
            .map_err(|e| sm.fail(e))?;

        let dst = self.config.dst.as_deref();
        let dir = output_dir(&self.src, dst);
        if !dir.exists() {
            warn!("Destination folder {:?} does not exist. Creating", dir);
            std::fs::create_dir_all(&dir).map_err(|e| sm.fail(Error::io(&dir, e)))?;
        }

        let headers = Self::output_headers(&table, &columns);
        let partial = derive_path(&self.src, dst, CHECKPOINT_SUFFIX);
        let final_path = derive_path(&self.src, dst, OUTPUT_SUFFIX);

        let mut annotations = self
            .resume(&partial, &table, &headers, columns.len())
            .map_err(|e| sm.fail(e))?;
        let resumed = annotations.len();
        let mut writer = CheckpointWriter::new(
            partial,
            final_path,
            headers,
            self.config.checkpoint_every,
        )
        .resume_at(resumed);

        let total = table.len();
        let mut summary = RunSummary::new(total);
        let mut progress = Progress::new(total, self.config.progress_every, resumed);
        info!(
            "annotating {} rows ({} already done), {} columns, {} workers",
            total,
            resumed,
            columns.len(),
            dispatcher.worker_limit()
        );

        for start in (resumed..total).step_by(dispatcher.chunk_size()) {
            let end = start.saturating_add(dispatcher.chunk_size()).min(total);
            let mut rows: Vec<Vec<Option<(f64, f64)>>> = (start..end)
                .map(|_| Vec::with_capacity(columns.len()))
                .collect();

            for (idx, column) in columns.iter().enumerate() {
                sm.advance(State::Running(idx))?;
                let texts = Self::texts(&table, column, start, end, &mut summary);
                let outcomes = dispatcher.dispatch_chunk(&texts, &self.client);
                for (row, outcome) in rows.iter_mut().zip(&outcomes) {
                    summary.record(outcome);
                    row.push(outcome.scores());
                }
            }

            annotations.extend(rows.into_iter().map(ServiceAnnotation));
            progress.update(end);

            if writer.is_due(end) {
                sm.advance(State::Checkpointing)?;
                writer
                    .checkpoint(table.rows(), &annotations)
                    .map_err(|e| sm.fail(e))?;
            }
        }

        let output = writer
            .finish(table.rows(), &annotations)
            .map_err(|e| sm.fail(e))?;
        sm.advance(State::Done)?;
        info!(
            "done in {:.1?} ({:.1} rows/s)",
            progress.elapsed(),
            progress.rate(total)
        );
        summary.log();

        Ok(ServiceReport {
            output,
            resumed,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::sentiment::Sentiment;

    /// Scores texts by length, fails on "error".
    struct LengthClient {
        calls: AtomicUsize,
    }

    impl LengthClient {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Analyze for LengthClient {
        fn analyze(&self, text: &str) -> Result<Sentiment, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if text == "error" {
                return Err(Error::TransientService("unavailable".to_string()));
            }
            let len = text.chars().count();
            Ok(Sentiment::new((len % 3) as f64 / 2.0 - 0.5, (len % 5) as f64 / 4.0))
        }
    }

    fn config(dir: &Path) -> ServiceConfig {
        ServiceConfig {
            worker_limit: 2,
            chunk_size: 2,
            dst: Some(dir.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn annotate_with_failure_and_blank() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("c.csv");
        fs::write(&src, "id,Comentario\n1,hola\n2,error\n3,\n4,ok\n").unwrap();

        let client = LengthClient::new();
        let p = ServicePipeline::new(src, &client, config(dir.path()));
        let report = p.run().unwrap();

        assert_eq!(report.output, dir.path().join("c_analyzed.csv"));
        assert!(!dir.path().join("c_analyzed.partial.csv").exists());
        assert_eq!(
            fs::read_to_string(&report.output).unwrap(),
            "\u{feff}id,Comentario,Comentario_polarity,Comentario_subjectivity\n\
             1,hola,0,1\n\
             2,error,,\n\
             3,,,\n\
             4,ok,0.5,0.5\n"
        );
        // blank texts never reach the client
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
        assert_eq!(report.summary.scored, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.skipped, 1);
    }

    #[test]
    fn invalid_utf8_field_is_not_sent() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("c.csv");
        fs::write(&src, b"id,Comentario\n1,\xff\xfe\n2,hola\n").unwrap();

        let client = LengthClient::new();
        let report = ServicePipeline::new(src, &client, config(dir.path()))
            .run()
            .unwrap();
        assert_eq!(
            fs::read(&report.output).unwrap(),
            b"\xef\xbb\xbfid,Comentario,Comentario_polarity,Comentario_subjectivity\n\
              1,\xff\xfe,,\n\
              2,hola,0,1\n"
                .to_vec()
        );
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
        assert_eq!(report.summary.malformed, 1);
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.scored, 1);
    }

    #[test]
    fn annotation_fields_roundtrip() {
        let a = ServiceAnnotation(vec![Some((-0.25, 0.1)), None]);
        let fields = a.fields();
        assert_eq!(fields, vec!["-0.25", "0.1", "", ""]);
        let record = StringRecord::from(fields);
        assert_eq!(ServiceAnnotation::parse(&record, 2).unwrap(), a);
        assert!(ServiceAnnotation::parse(&record, 1).is_err());
        assert!(ServiceAnnotation::parse(&StringRecord::from(vec!["x", "0.1"]), 1).is_err());
    }

    #[test]
    fn existing_checkpoint_is_overwritten_without_resume() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("c.csv");
        fs::write(&src, "Comentario\nhola\n").unwrap();
        fs::write(dir.path().join("c_analyzed.partial.csv"), "garbage\n").unwrap();

        let client = LengthClient::new();
        let report = ServicePipeline::new(src, &client, config(dir.path()))
            .run()
            .unwrap();
        assert_eq!(report.resumed, 0);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn incompatible_checkpoint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("c.csv");
        fs::write(&src, "Comentario\nhola\n").unwrap();
        fs::write(dir.path().join("c_analyzed.partial.csv"), "garbage\n").unwrap();

        let client = LengthClient::new();
        let mut cfg = config(dir.path());
        cfg.resume = true;
        let err = ServicePipeline::new(src, &client, cfg).run().unwrap_err();
        assert!(matches!(err, Error::IncompatibleCheckpoint { .. }));
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }
}
