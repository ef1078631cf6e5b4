/*! Corpus-wide word frequencies.

Counts how many times each scored word (nonzero affect) appears in the corpus,
then splits counts into positive and negative words for the frequency reports.
!*/
use std::collections::HashMap;
use std::path::Path;

use log::info;

use super::store::AffectLexicon;
use crate::error::Error;
use crate::io::writer::write_bom;

/// Accumulates word hits. Insertion order is kept to break frequency ties.
#[derive(Debug, Default)]
pub struct FrequencyAggregator {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl FrequencyAggregator {
    /// Count the tokens of `tokens` that have a nonzero score in `lexicon`.
    pub fn add<S: AsRef<str>>(&mut self, tokens: &[S], lexicon: &AffectLexicon) {
        for token in tokens {
            let token = token.as_ref();
            if lexicon.get(token).map_or(false, |score| score != 0.0) {
                self.hit(token);
            }
        }
    }

    fn hit(&mut self, word: &str) {
        match self.index.get(word) {
            Some(&idx) => self.counts[idx].1 += 1,
            None => {
                self.index.insert(word.to_string(), self.counts.len());
                self.counts.push((word.to_string(), 1));
            }
        }
    }

    /// Number of occurrences of `word` seen so far.
    pub fn count(&self, word: &str) -> u64 {
        self.index.get(word).map_or(0, |&idx| self.counts[idx].1)
    }

    /// Split counts into positive and negative tables.
    pub fn export(&self, lexicon: &AffectLexicon) -> FrequencyTables {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        for (word, count) in &self.counts {
            match lexicon.get(word) {
                Some(score) if score > 0.0 => positive.push((word.clone(), *count)),
                Some(score) if score < 0.0 => negative.push((word.clone(), *count)),
                _ => (),
            }
        }

        // stable sort: ties stay in first-encountered order
        positive.sort_by(|(_, a), (_, b)| b.cmp(a));
        negative.sort_by(|(_, a), (_, b)| b.cmp(a));

        FrequencyTables { positive, negative }
    }
}

/// Word frequencies, sorted by descending count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTables {
    pub positive: Vec<(String, u64)>,
    pub negative: Vec<(String, u64)>,
}

impl FrequencyTables {
    /// Write both tables as `positive_words.csv` and `negative_words.csv` in `dst`.
    pub fn save(&self, dst: &Path) -> Result<(), Error> {
        let positive = dst.join("positive_words.csv");
        let negative = dst.join("negative_words.csv");
        Self::save_table(&self.positive, &positive)?;
        Self::save_table(&self.negative, &negative)?;
        info!("frequency tables saved: {:?}, {:?}", positive, negative);
        Ok(())
    }

    fn save_table(table: &[(String, u64)], path: &Path) -> Result<(), Error> {
        let mut file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
        write_bom(&mut file).map_err(|e| Error::io(path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(["word", "frequency"])?;
        for (word, count) in table {
            writer.write_record([word.as_str(), count.to_string().as_str()])?;
        }
        writer.flush().map_err(|e| Error::io(path, e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize_str;

    fn lexicon() -> AffectLexicon {
        vec![("bueno", 2.0), ("malo", -3.0), ("feo", -1.0), ("lindo", 1.0), ("meh", 0.0)]
            .into_iter()
            .collect()
    }

    #[test]
    fn counts_only_scored_words() {
        let lex = lexicon();
        let mut agg = FrequencyAggregator::default();
        agg.add(&tokenize_str("bueno meh nada bueno malo"), &lex);
        assert_eq!(agg.count("bueno"), 2);
        assert_eq!(agg.count("malo"), 1);
        assert_eq!(agg.count("meh"), 0);
        assert_eq!(agg.count("nada"), 0);
    }

    #[test]
    fn export_sorted_with_stable_ties() {
        let lex = lexicon();
        let mut agg = FrequencyAggregator::default();
        agg.add(&tokenize_str("lindo feo bueno malo"), &lex);
        agg.add(&tokenize_str("bueno malo"), &lex);

        let tables = agg.export(&lex);
        assert_eq!(
            tables.positive,
            vec![("bueno".to_string(), 2), ("lindo".to_string(), 1)]
        );
        assert_eq!(
            tables.negative,
            vec![("malo".to_string(), 2), ("feo".to_string(), 1)]
        );
    }

    #[test]
    fn save_tables() {
        let lex = lexicon();
        let mut agg = FrequencyAggregator::default();
        agg.add(&tokenize_str("bueno bueno malo"), &lex);
        let dst = tempfile::tempdir().unwrap();
        agg.export(&lex).save(dst.path()).unwrap();

        let positive = std::fs::read_to_string(dst.path().join("positive_words.csv")).unwrap();
        assert_eq!(positive, "\u{feff}word,frequency\nbueno,2\n");
        let negative = std::fs::read_to_string(dst.path().join("negative_words.csv")).unwrap();
        assert_eq!(negative, "\u{feff}word,frequency\nmalo,1\n");
    }
}
