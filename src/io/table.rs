/*! Input table.

The corpus is a delimited text file with a header row.
Rows are kept as raw [ByteRecord]s so that passthrough columns are written back byte for byte,
text fields are decoded on demand.

Every row is shaped to the header width: short rows are padded with empty fields,
fields past the last header are dropped since the output has no column for them.
The first truncated row is reported at `warn` level.
!*/
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ByteRecord;
use log::{debug, info, warn};

use crate::error::Error;

const BOM: &str = "\u{feff}";

/// Decode a header row, dropping a leading BOM if the csv reader left one.
pub(crate) fn decode_headers(record: &ByteRecord) -> Vec<String> {
    record
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let header = String::from_utf8_lossy(field);
            if idx == 0 {
                header.trim_start_matches(BOM).to_string()
            } else {
                header.into_owned()
            }
        })
        .collect()
}

/// In-memory corpus.
#[derive(Debug, Clone)]
pub struct Table {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<ByteRecord>,
    first_truncated: Option<usize>,
}

impl Table {
    /// Load a table from `path`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let table = Self::from_reader(file, path)?;
        info!(
            "{:?}: {} rows, columns {:?}",
            path,
            table.len(),
            table.headers()
        );
        Ok(table)
    }

    /// Load a table from a stream. `path` is kept to derive output file names.
    ///
    /// Short rows are padded with empty fields, long rows are truncated to the header width.
    pub fn from_reader<R: Read>(rdr: R, path: &Path) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
        let headers = decode_headers(reader.byte_headers()?);
        let width = headers.len();

        let mut rows = Vec::new();
        let mut ragged = 0;
        let mut first_truncated = None;
        let mut record = ByteRecord::new();
        while reader.read_byte_record(&mut record)? {
            if record.len() > width && first_truncated.is_none() {
                first_truncated = Some(rows.len());
            }
            if record.len() != width {
                ragged += 1;
                debug!(
                    "row {}: {} fields, expected {}",
                    rows.len(),
                    record.len(),
                    width
                );
            }
            rows.push(normalize_width(&record, width));
        }

        if ragged > 0 {
            warn!("{:?}: {} rows did not match header width", path, ragged);
        }
        if let Some(row) = first_truncated {
            warn!(
                "{:?}: row {} has more fields than the header, extra fields are dropped",
                path, row
            );
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
            first_truncated,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[ByteRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first row that had fields past the header width.
    pub fn first_truncated(&self) -> Option<usize> {
        self.first_truncated
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Text of `row` at `column`.
    ///
    /// Empty and missing fields are null (`Ok(None)`).
    /// Fields that are not valid UTF-8 yield [Error::MalformedRow].
    pub fn text(&self, row: usize, column: usize) -> Result<Option<&str>, Error> {
        let field = match self.rows.get(row).and_then(|r| r.get(column)) {
            Some(field) if !field.is_empty() => field,
            _ => return Ok(None),
        };

        std::str::from_utf8(field)
            .map(Some)
            .map_err(|_| Error::MalformedRow {
                row,
                column: self
                    .headers
                    .get(column)
                    .cloned()
                    .unwrap_or_else(|| column.to_string()),
            })
    }
}

/// `<dir>/<stem><suffix>`, with `stem` being the file name without extension,
/// and `dir` being `dst` if set, the folder of `path` otherwise.
pub fn derive_path(path: &Path, dst: Option<&Path>, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = format!("{stem}{suffix}");
    match dst {
        Some(dst) => dst.join(name),
        None => path.with_file_name(name),
    }
}

/// Folder where outputs of `path` go: `dst` if set, the folder of `path` otherwise.
pub fn output_dir(path: &Path, dst: Option<&Path>) -> PathBuf {
    match (dst, path.parent()) {
        (Some(dst), _) => dst.to_path_buf(),
        (None, Some(parent)) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Pad or truncate `record` to `width` fields.
pub(crate) fn normalize_width(record: &ByteRecord, width: usize) -> ByteRecord {
    if record.len() == width {
        return record.clone();
    }
    let mut normalized: ByteRecord = record.iter().take(width).collect();
    while normalized.len() < width {
        normalized.push_field(b"");
    }
    normalized
}

/// Checks if a text is null or only whitespace.
#[inline]
pub fn is_blank(text: Option<&str>) -> bool {
    text.map_or(true, |t| t.trim().is_empty())
}
