//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use sentiscan::io::columns::{default_lexicon_aliases, default_service_aliases, Alias};

#[derive(Debug, StructOpt)]
#[structopt(name = "sentiscan", about = "sentiment annotation of tabular corpora.")]
/// Holds every command that is callable by the `sentiscan` command.
pub enum Sentiscan {
    #[structopt(about = "Annotate with affect and emotion lexicons")]
    Lexicon(Lexicon),
    #[structopt(about = "Annotate with polarity and subjectivity from a sentiment service")]
    Service(Service),
    #[structopt(about = "Replace YouTube category ids with category names, in place")]
    Categories(Categories),
}

/// Explicit column names, or `defaults` if none are given.
fn aliases(columns: &[String], defaults: fn() -> Vec<Alias>) -> Vec<Alias> {
    if columns.is_empty() {
        defaults()
    } else {
        columns.iter().map(|c| Alias::exact(c)).collect()
    }
}

#[derive(Debug, StructOpt)]
pub struct Lexicon {
    #[structopt(parse(from_os_str), help = "source corpus (csv)")]
    pub src: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "affect",
        default_value = "lexico_afinn.csv",
        help = "affect lexicon (word, score)"
    )]
    pub affect: PathBuf,
    #[structopt(
        parse(from_os_str),
        long = "emotion",
        default_value = "lexico_nrc.csv",
        help = "emotion lexicon (word, emotion)"
    )]
    pub emotion: PathBuf,
    #[structopt(
        long = "column",
        help = "text column to annotate. Can be repeated. Defaults to comment, title, description and tags aliases."
    )]
    pub columns: Vec<String>,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        help = "output folder. Defaults to the source folder."
    )]
    pub dst: Option<PathBuf>,
}

impl Lexicon {
    pub fn aliases(&self) -> Vec<Alias> {
        aliases(&self.columns, default_lexicon_aliases)
    }
}

#[derive(Debug, StructOpt)]
pub struct Service {
    #[structopt(parse(from_os_str), help = "source corpus (csv)")]
    pub src: PathBuf,
    #[structopt(long = "endpoint", help = "sentiment service URL")]
    pub endpoint: String,
    #[structopt(
        short = "t",
        long = "workers",
        help = "maximum number of concurrent requests. Defaults to twice the number of threads."
    )]
    pub workers: Option<usize>,
    #[structopt(
        short = "s",
        long = "chunk-size",
        default_value = "100",
        help = "rows per chunk"
    )]
    pub chunk_size: usize,
    #[structopt(
        long = "checkpoint-every",
        default_value = "5000",
        help = "rows between two checkpoints (0 disables them)"
    )]
    pub checkpoint_every: usize,
    #[structopt(
        long = "progress-every",
        default_value = "1000",
        help = "rows between two progress reports (0 disables them)"
    )]
    pub progress_every: usize,
    #[structopt(long = "timeout", default_value = "30", help = "request timeout, in seconds")]
    pub timeout: u64,
    #[structopt(long = "source-lang", default_value = "es", help = "language of the corpus")]
    pub source_lang: String,
    #[structopt(
        long = "target-lang",
        default_value = "en",
        help = "language texts are translated to before analysis"
    )]
    pub target_lang: String,
    #[structopt(long = "resume", help = "continue from an existing checkpoint")]
    pub resume: bool,
    #[structopt(
        long = "column",
        help = "text column to annotate. Can be repeated. Defaults to comment, title and description aliases."
    )]
    pub columns: Vec<String>,
    #[structopt(
        parse(from_os_str),
        long = "dst",
        help = "output folder. Defaults to the source folder."
    )]
    pub dst: Option<PathBuf>,
}

impl Service {
    pub fn aliases(&self) -> Vec<Alias> {
        aliases(&self.columns, default_service_aliases)
    }
}

#[derive(Debug, StructOpt)]
pub struct Categories {
    #[structopt(parse(from_os_str), help = "corpus to relabel (rewritten in place)")]
    pub src: PathBuf,
    #[structopt(long = "id-column", default_value = "Categoria_ID", help = "category id column")]
    pub id_column: String,
    #[structopt(
        long = "name-column",
        default_value = "Categoria_Nombre",
        help = "category name column to create"
    )]
    pub name_column: String,
}
