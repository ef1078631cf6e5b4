//! Lexicon annotation pipeline
//!
//! Scores every text column of a corpus against an affect lexicon (signed word scores)
//! and an emotion lexicon (word to emotion labels).
//!
//! # Processing
//! 1. Lexicons and the corpus are loaded, text columns are resolved from their aliases.
//! 1. For each column, in declared order, rows are tokenized and scored in parallel.
//!    Results are collected in row order, and scored words are counted sequentially.
//! 1. The annotated table is written once, as `<stem>_sentiment.csv`.
//! 1. Word frequencies are split into `positive_words.csv` and `negative_words.csv`.
//!
//! The output only depends on the input and the lexicons: running the pipeline twice yields identical files.
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::Error;
use crate::io::columns::{default_lexicon_aliases, resolve, Alias, ResolvedColumn};
use crate::io::table::{derive_path, is_blank, output_dir, Table};
use crate::io::writer::write_table;
use crate::lexicon::{
    score, tally, AffectLexicon, EmotionLexicon, EmotionTally, FrequencyAggregator,
    FrequencyTables,
};
use crate::pipelines::pipeline::Pipeline;
use crate::pipelines::state::{State, StateMachine};
use crate::pipelines::summary::RunSummary;
use crate::tokenizer::tokenize;

pub const OUTPUT_SUFFIX: &str = "_sentiment.csv";

/// Lexicon pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// affect lexicon (word, score)
    pub affect: PathBuf,
    /// emotion lexicon (word, emotion)
    pub emotion: PathBuf,
    pub columns: Vec<Alias>,
    /// output folder. Defaults to the input folder.
    pub dst: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            affect: PathBuf::from("lexico_afinn.csv"),
            emotion: PathBuf::from("lexico_nrc.csv"),
            columns: default_lexicon_aliases(),
            dst: None,
        }
    }
}

#[derive(Debug)]
pub struct LexiconReport {
    /// annotated table
    pub output: PathBuf,
    pub frequencies: FrequencyTables,
    pub summary: RunSummary,
}

/// Scores of a single field.
struct FieldScore {
    tokens: Vec<String>,
    affect: f64,
    emotions: EmotionTally,
    blank: bool,
    malformed: bool,
}

pub struct LexiconPipeline {
    src: PathBuf,
    config: PipelineConfig,
}

impl LexiconPipeline {
    pub fn new(src: PathBuf, config: PipelineConfig) -> Self {
        Self { src, config }
    }

    pub fn src(&self) -> &Path {
        &self.src
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Score every row of `column`, in parallel. Results are in row order.
    fn score_column(
        table: &Table,
        column: &ResolvedColumn,
        affect: &AffectLexicon,
        emotion: &EmotionLexicon,
    ) -> Vec<FieldScore> {
        (0..table.len())
            .into_par_iter()
            .map(|row| {
                let (text, malformed) = match table.text(row, column.index) {
                    Ok(text) => (text, false),
                    Err(e) => {
                        debug!("{}", e);
                        (None, true)
                    }
                };
                let tokens = tokenize(text);
                FieldScore {
                    affect: score(&tokens, affect),
                    emotions: tally(&tokens, emotion),
                    blank: is_blank(text),
                    malformed,
                    tokens,
                }
            })
            .collect()
    }

    /// Input headers followed by `<column>_affect` and `<column>_emotions` for each column.
    fn output_headers(table: &Table, columns: &[ResolvedColumn]) -> Vec<String> {
        let mut headers = table.headers().to_vec();
        for column in columns {
            headers.push(format!("{}_affect", column.header));
            headers.push(format!("{}_emotions", column.header));
        }
        headers
    }
}

impl Pipeline<LexiconReport> for LexiconPipeline {
    fn version() -> &'static str {
        "1.0.0"
    }

    fn run(&self) -> Result<LexiconReport, Error> {
        info!("lexicon pipeline v{}", Self::version());
        let mut sm = StateMachine::default();

        sm.advance(State::LoadingResources)?;
        let affect = AffectLexicon::from_path(&self.config.affect).map_err(|e| sm.fail(e))?;
        let emotion = EmotionLexicon::from_path(&self.config.emotion).map_err(|e| sm.fail(e))?;
        let table = Table::from_path(&self.src).map_err(|e| sm.fail(e))?;
        let columns = resolve(
            table.headers(),
            &self.config.columns,
            &self.src.to_string_lossy(),
        )
        .map_err(|e| sm.fail(e))?;

        let dst = self.config.dst.as_deref();
        let dir = output_dir(&self.src, dst);
        if !dir.exists() {
            warn!("Destination folder {:?} does not exist. Creating", dir);
            std::fs::create_dir_all(&dir).map_err(|e| sm.fail(Error::io(&dir, e)))?;
        }

        let mut summary = RunSummary::new(table.len());
        let mut aggregator = FrequencyAggregator::default();
        let mut annotations: Vec<Vec<String>> = (0..table.len())
            .map(|_| Vec::with_capacity(columns.len() * 2))
            .collect();

        for (idx, column) in columns.iter().enumerate() {
            sm.advance(State::Running(idx))?;
            info!("scoring column {:?}", column.header);

            let scores = Self::score_column(&table, column, &affect, &emotion);
            for (row, field) in annotations.iter_mut().zip(scores) {
                aggregator.add(&field.tokens, &affect);
                if field.malformed {
                    summary.malformed += 1;
                }
                if field.blank {
                    summary.skipped += 1;
                } else {
                    summary.scored += 1;
                }
                row.push(field.affect.to_string());
                row.push(field.emotions.to_string());
            }
        }

        let headers = Self::output_headers(&table, &columns);
        let output = derive_path(&self.src, dst, OUTPUT_SUFFIX);
        write_table(&output, &headers, table.rows(), &annotations).map_err(|e| sm.fail(e))?;
        info!("annotated table saved to {:?}", output);

        let frequencies = aggregator.export(&affect);
        frequencies.save(&dir).map_err(|e| sm.fail(e))?;

        sm.advance(State::Done)?;
        summary.log();

        Ok(LexiconReport {
            output,
            frequencies,
            summary,
        })
    }
}
