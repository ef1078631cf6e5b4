//! Lexicon resources.
//!
//! Both lexicons are two-column CSV files, one association per row:
//! - the affect lexicon maps a word to a signed score (`palabra,puntuacion`),
//! - the emotion lexicon maps a word to an emotion label (`palabra,sentimiento`).
//!   A word can appear on several rows, its labels are merged.
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::error::Error;
use crate::io::columns::require_column;

const WORD_COLUMN: &[&str] = &["word", "palabra", "term"];
const SCORE_COLUMN: &[&str] = &["score", "puntuacion", "value"];
const EMOTION_COLUMN: &[&str] = &["emotion", "sentimiento", "sentiment", "label"];

fn open(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|e| Error::io(path, e))
}

/// Read the header of a lexicon resource and locate the word column and the value column.
fn locate_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    value_column: &[&str],
    resource: &str,
) -> Result<(usize, usize), Error> {
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let headers = headers.iter().map(String::as_str);
    let word = require_column(headers.clone(), WORD_COLUMN, resource)?;
    let value = require_column(headers, value_column, resource)?;
    Ok((word, value))
}

fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

/// Word to signed score mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AffectLexicon {
    scores: HashMap<String, f64>,
}

impl AffectLexicon {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        info!("loading affect lexicon {:?}", path);
        let lexicon = Self::from_reader(open(path)?, &path.to_string_lossy())?;
        info!("affect lexicon: {} words", lexicon.len());
        Ok(lexicon)
    }

    /// Build the lexicon from a CSV stream.
    ///
    /// `resource` is only used in error messages.
    /// When a word appears twice, the last score wins.
    pub fn from_reader<R: Read>(rdr: R, resource: &str) -> Result<Self, Error> {
        let mut reader = csv_reader(rdr);
        let (word_idx, score_idx) = locate_columns(&mut reader, SCORE_COLUMN, resource)?;

        let mut scores = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let (word, score) = match (record.get(word_idx), record.get(score_idx)) {
                (Some(word), Some(score)) if !word.is_empty() => (word, score),
                _ => {
                    debug!("{resource}: skipping incomplete row {:?}", record.position());
                    continue;
                }
            };

            let invalid = || {
                Error::Resource(format!(
                    "{resource}: invalid score {score:?} for {word:?} at line {}",
                    record.position().map(|p| p.line()).unwrap_or_default()
                ))
            };
            let score: f64 = score.parse().map_err(|_| invalid())?;
            if !score.is_finite() {
                return Err(invalid());
            }
            scores.insert(word.to_lowercase(), score);
        }

        Ok(Self { scores })
    }

    /// Score of `word`, which has to be lowercase already.
    #[inline]
    pub fn get(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AffectLexicon {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let scores = iter
            .into_iter()
            .map(|(word, score)| (word.into().to_lowercase(), score))
            .collect();
        Self { scores }
    }
}

/// Word to emotion labels mapping.
///
/// Labels keep the order in which they were first seen for a word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionLexicon {
    labels: HashMap<String, Vec<String>>,
}

impl EmotionLexicon {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        info!("loading emotion lexicon {:?}", path);
        let lexicon = Self::from_reader(open(path)?, &path.to_string_lossy())?;
        info!("emotion lexicon: {} words", lexicon.len());
        Ok(lexicon)
    }

    /// Build the lexicon from a CSV stream.
    pub fn from_reader<R: Read>(rdr: R, resource: &str) -> Result<Self, Error> {
        let mut reader = csv_reader(rdr);
        let (word_idx, label_idx) = locate_columns(&mut reader, EMOTION_COLUMN, resource)?;

        let mut lexicon = Self::default();
        for record in reader.records() {
            let record = record?;
            match (record.get(word_idx), record.get(label_idx)) {
                (Some(word), Some(label)) if !word.is_empty() && !label.is_empty() => {
                    lexicon.insert(word, label)
                }
                _ => debug!("{resource}: skipping incomplete row {:?}", record.position()),
            }
        }

        Ok(lexicon)
    }

    /// Attach `label` to `word`, ignoring duplicates.
    fn insert(&mut self, word: &str, label: &str) {
        let labels = self.labels.entry(word.to_lowercase()).or_default();
        let label = label.to_lowercase();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    /// Labels of `word`, which has to be lowercase already.
    #[inline]
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.labels.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for EmotionLexicon {
    fn from_iter<T: IntoIterator<Item = (&'a str, &'a str)>>(iter: T) -> Self {
        let mut lexicon = Self::default();
        for (word, label) in iter {
            lexicon.insert(word, label);
        }
        lexicon
    }
}
