/*! Annotated table writing.

Output files are UTF-8 CSV files starting with a BOM, so that spreadsheet software picks the right encoding.
Each output row is the input row (verbatim) followed by the annotation fields.

Files are written atomically: content goes to a temporary file in the destination folder,
which is then renamed over the destination. A reader never sees a half-written file.
!*/
use std::io::Write;
use std::path::Path;

use csv::ByteRecord;
use log::debug;
use tempfile::NamedTempFile;

use crate::error::Error;

/// UTF-8 byte order mark.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

pub fn write_bom<W: Write>(w: &mut W) -> std::io::Result<()> {
    w.write_all(BOM)
}

/// Annotation fields appended to an input row.
pub trait Annotations {
    fn fields(&self) -> Vec<String>;
}

impl Annotations for Vec<String> {
    fn fields(&self) -> Vec<String> {
        self.clone()
    }
}

/// CSV writer for annotated rows.
pub struct TableWriter<W: Write> {
    inner: csv::Writer<W>,
    width: usize,
}

impl<W: Write> TableWriter<W> {
    /// Create the writer and emit the BOM and the header row.
    pub fn new(mut w: W, headers: &[String]) -> Result<Self, Error> {
        write_bom(&mut w)?;
        let mut inner = csv::WriterBuilder::new().flexible(false).from_writer(w);
        inner.write_record(headers)?;
        Ok(Self {
            inner,
            width: headers.len(),
        })
    }

    /// Write `row` followed by `annotations`.
    pub fn write_row<A: Annotations + ?Sized>(
        &mut self,
        row: &ByteRecord,
        annotations: &A,
    ) -> Result<(), Error> {
        let mut record = row.clone();
        for field in annotations.fields() {
            record.push_field(field.as_bytes());
        }
        if record.len() != self.width {
            return Err(Error::Custom(format!(
                "annotated row has {} fields, header has {}",
                record.len(),
                self.width
            )));
        }
        self.inner.write_byte_record(&record)?;
        Ok(())
    }

    /// Flush and give back the inner writer.
    pub fn into_inner(self) -> Result<W, Error> {
        self.inner
            .into_inner()
            .map_err(|e| Error::UnlocatedIo(e.into_error()))
    }
}

/// Write a whole table to `path` atomically.
///
/// `rows` and `annotations` are zipped, so the number of written rows is the shortest of both.
pub fn write_table<'a, A: Annotations + 'a>(
    path: &Path,
    headers: &[String],
    rows: impl IntoIterator<Item = &'a ByteRecord>,
    annotations: impl IntoIterator<Item = &'a A>,
) -> Result<usize, Error> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;

    let mut writer = TableWriter::new(tmp, headers)?;
    let mut written = 0;
    for (row, annotation) in rows.into_iter().zip(annotations) {
        writer.write_row(row, annotation)?;
        written += 1;
    }
    let tmp = writer.into_inner()?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| Error::io(path, e.error))?;

    debug!("wrote {} rows to {:?}", written, path);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> ByteRecord {
        fields.iter().collect()
    }

    #[test]
    fn write_atomic_table() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("out.csv");
        let headers: Vec<String> = ["id", "text", "text_affect"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let rows = vec![record(&["1", "hola, mundo"]), record(&["2", ""])];
        let annotations = vec![vec!["2".to_string()], vec!["0".to_string()]];

        let n = write_table(&path, &headers, &rows, &annotations).unwrap();
        assert_eq!(n, 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "\u{feff}id,text,text_affect\n1,\"hola, mundo\",2\n2,,0\n"
        );
    }

    #[test]
    fn overwrite_keeps_single_copy() {
        let dst = tempfile::tempdir().unwrap();
        let path = dst.path().join("out.csv");
        let headers = vec!["id".to_string(), "a".to_string()];
        let rows = vec![record(&["1"]), record(&["2"])];
        let annotations = vec![vec!["x".to_string()], vec!["y".to_string()]];

        write_table(&path, &headers, &rows[..1], &annotations).unwrap();
        write_table(&path, &headers, &rows, &annotations).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "\u{feff}id,a\n1,x\n2,y\n");
        assert_eq!(std::fs::read_dir(dst.path()).unwrap().count(), 1);
    }

    #[test]
    fn width_mismatch_is_an_error() {
        let headers = vec!["id".to_string(), "a".to_string()];
        let mut w = TableWriter::new(Vec::new(), &headers).unwrap();
        let err = w.write_row(&record(&["1"]), &Vec::<String>::new());
        assert!(err.is_err());
    }
}
