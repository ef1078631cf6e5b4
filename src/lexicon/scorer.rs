//! Lexicon scoring.
use std::fmt;

use itertools::Itertools;

use super::store::{AffectLexicon, EmotionLexicon};

/// Sum of the affect scores of `tokens`. Unknown tokens count for 0.
pub fn score<S: AsRef<str>>(tokens: &[S], lexicon: &AffectLexicon) -> f64 {
    tokens
        .iter()
        .filter_map(|token| lexicon.get(token.as_ref()))
        .fold(0.0, |acc, score| acc + score)
}

/// Count, for each emotion label, the tokens that carry it.
///
/// A token carrying several labels counts once for each of them,
/// and is counted again on each of its occurrences.
pub fn tally<S: AsRef<str>>(tokens: &[S], lexicon: &EmotionLexicon) -> EmotionTally {
    let mut tally = EmotionTally::default();
    for labels in tokens.iter().filter_map(|token| lexicon.get(token.as_ref())) {
        for label in labels {
            tally.add(label);
        }
    }
    tally
}

/// Emotion label counts, in the order labels were first seen.
///
/// The number of distinct labels is small (NRC has ten of them),
/// so a [Vec] with linear lookups is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmotionTally(Vec<(String, usize)>);

impl EmotionTally {
    fn add(&mut self, label: &str) {
        match self.0.iter_mut().find(|(l, _)| l == label) {
            Some((_, count)) => *count += 1,
            None => self.0.push((label.to_string(), 1)),
        }
    }

    /// Count for `label`, 0 if absent.
    pub fn get(&self, label: &str) -> usize {
        self.0
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, count)| *count)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(label, count)| (label.as_str(), *count))
    }
}

/// `label:count` pairs joined by `, `.
impl fmt::Display for EmotionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(label, count)| format!("{label}:{count}"))
            .join(", ");
        f.write_str(&joined)
    }
}
