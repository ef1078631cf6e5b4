//! Error enum
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    /// A required column is missing from a resource or from the input table,
    /// or a resource holds an unusable value.
    Resource(String),
    /// IO error tied to a specific file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// IO error with no known path (stdout, temp files...).
    UnlocatedIo(std::io::Error),
    /// A single external service call failed.
    TransientService(String),
    /// A text field is not usable as a string.
    MalformedRow { row: usize, column: String },
    /// An existing checkpoint does not match the current input.
    IncompatibleCheckpoint { path: PathBuf, reason: String },
    Csv(csv::Error),
    Reqwest(reqwest::Error),
    Custom(String),
}

impl Error {
    /// Attach a path to an [std::io::Error].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Resource(msg) => write!(f, "resource error: {msg}"),
            Error::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Error::UnlocatedIo(e) => write!(f, "io error: {e}"),
            Error::TransientService(msg) => write!(f, "sentiment service error: {msg}"),
            Error::MalformedRow { row, column } => {
                write!(f, "row {row}: column {column:?} is not valid UTF-8")
            }
            Error::IncompatibleCheckpoint { path, reason } => {
                write!(f, "checkpoint {} cannot be resumed: {reason}", path.display())
            }
            Error::Csv(e) => write!(f, "csv error: {e}"),
            Error::Reqwest(e) => write!(f, "http error: {e}"),
            Error::Custom(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io { source, .. } => Some(source),
            Error::UnlocatedIo(e) => Some(e),
            Error::Csv(e) => Some(e),
            Error::Reqwest(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::UnlocatedIo(e)
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Error {
        Error::Csv(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Error {
        Error::Reqwest(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
