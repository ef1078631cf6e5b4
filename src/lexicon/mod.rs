/*! Lexicon based sentiment

Deterministic scoring of token sequences against two curated word lists:
- an affect lexicon (AFINN-like), giving each word a signed score,
- an emotion lexicon (NRC-like), giving each word a set of emotion labels.

[frequency::FrequencyAggregator] keeps track of which scored words were seen in the corpus.
!*/
pub mod frequency;
pub mod scorer;
pub mod store;

pub use frequency::{FrequencyAggregator, FrequencyTables};
pub use scorer::{score, tally, EmotionTally};
pub use store::{AffectLexicon, EmotionLexicon};
