/*! Checkpoints

A checkpoint is the annotated prefix (rows `[0, k)`) of the output table, written next to the final artifact.
Each checkpoint replaces the previous one, so the checkpoint file always holds the most advanced prefix.

Once every row is processed, [CheckpointWriter::finish] writes the last prefix (`k = row count`) and
renames the checkpoint file to the final artifact name: a complete run leaves no checkpoint behind,
and an interrupted one leaves a checkpoint that is never mistaken for a final artifact.
!*/
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, StringRecord};
use log::{debug, info};

use crate::error::Error;
use crate::io::table::{decode_headers, normalize_width, Table};
use crate::io::writer::{write_table, Annotations};

/// Default number of rows between two checkpoints.
pub const DEFAULT_INTERVAL: usize = 5000;

/// Writes checkpoints at a fixed row interval and promotes the last one to the final artifact.
#[derive(Debug)]
pub struct CheckpointWriter {
    destination: PathBuf,
    final_path: PathBuf,
    headers: Vec<String>,
    interval: usize,
    /// number of rows in the checkpoint file
    k: usize,
}

impl CheckpointWriter {
    /// `headers` are the full output headers (input ones followed by annotation ones).
    ///
    /// An `interval` of 0 disables intermediate checkpoints.
    pub fn new(destination: PathBuf, final_path: PathBuf, headers: Vec<String>, interval: usize) -> Self {
        Self {
            destination,
            final_path,
            headers,
            interval,
            k: 0,
        }
    }

    /// Start from an already persisted checkpoint of `k` rows.
    pub fn resume_at(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn final_path(&self) -> &Path {
        &self.final_path
    }

    /// Number of rows currently persisted.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Checks if `processed` rows warrant a new checkpoint.
    pub fn is_due(&self, processed: usize) -> bool {
        self.interval > 0 && processed >= self.k.saturating_add(self.interval)
    }

    /// Persist rows `[0, k)`, `k` being the length of `annotations`.
    ///
    /// Does nothing and returns `false` when `k` is 0 or when `k` rows are already persisted.
    pub fn checkpoint<A: Annotations>(
        &mut self,
        rows: &[ByteRecord],
        annotations: &[A],
    ) -> Result<bool, Error> {
        let k = annotations.len();
        if k == 0 || k == self.k {
            return Ok(false);
        }
        if k < self.k {
            return Err(Error::Custom(format!(
                "checkpoint would go back from {} to {} rows",
                self.k, k
            )));
        }

        self.write(rows, annotations)?;
        info!("checkpoint: {} rows saved to {:?}", k, self.destination);
        Ok(true)
    }

    /// Write the complete table and move it to the final artifact path.
    pub fn finish<A: Annotations>(
        mut self,
        rows: &[ByteRecord],
        annotations: &[A],
    ) -> Result<PathBuf, Error> {
        if annotations.len() != rows.len() {
            return Err(Error::Custom(format!(
                "finishing with {} annotated rows out of {}",
                annotations.len(),
                rows.len()
            )));
        }

        // the last interval may have already persisted every row.
        if rows.is_empty() || self.k != rows.len() || !self.destination.exists() {
            self.write(rows, annotations)?;
        }

        std::fs::rename(&self.destination, &self.final_path)
            .map_err(|e| Error::io(&self.final_path, e))?;
        info!("{} rows saved to {:?}", rows.len(), self.final_path);
        Ok(self.final_path)
    }

    fn write<A: Annotations>(&mut self, rows: &[ByteRecord], annotations: &[A]) -> Result<(), Error> {
        let k = annotations.len();
        if k > rows.len() {
            return Err(Error::Custom(format!(
                "{} annotated rows for a {} rows table",
                k,
                rows.len()
            )));
        }
        let written = write_table(&self.destination, &self.headers, &rows[..k], annotations)?;
        debug!("checkpoint write: {} -> {} rows", self.k, written);
        self.k = written;
        Ok(())
    }
}

/// Load the annotation fields of an existing checkpoint.
///
/// The checkpoint has to match `table`: same output header, at most as many rows,
/// and identical passthrough fields for every row it holds.
/// Returns, for each persisted row, the annotation fields (the ones after the input columns).
pub fn load(
    path: &Path,
    table: &Table,
    headers: &[String],
) -> Result<Vec<StringRecord>, Error> {
    let incompatible = |reason: String| Error::IncompatibleCheckpoint {
        path: path.to_path_buf(),
        reason,
    };

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let found = decode_headers(reader.byte_headers()?);
    if found != headers {
        return Err(incompatible(format!(
            "header {found:?} differs from expected {headers:?}"
        )));
    }

    let width = table.headers().len();
    let mut annotations = Vec::new();
    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let idx = annotations.len();
        let input = table.rows().get(idx).ok_or_else(|| {
            incompatible(format!("more rows than the {} input rows", table.len()))
        })?;

        if record.len() != headers.len() {
            return Err(incompatible(format!(
                "row {idx} has {} fields instead of {}",
                record.len(),
                headers.len()
            )));
        }

        let passthrough = normalize_width(&record, width);
        if &passthrough != input {
            return Err(incompatible(format!("row {idx} does not match input")));
        }

        let fields: ByteRecord = record.iter().skip(width).collect();
        let fields = StringRecord::from_byte_record(fields)
            .map_err(|e| incompatible(format!("row {idx}: {e}")))?;
        annotations.push(fields);
    }

    info!("{:?}: resuming after {} rows", path, annotations.len());
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        let data = "id,Comentario\n1,bueno\n2,malo\n3,\n";
        Table::from_reader(data.as_bytes(), Path::new("in.csv")).unwrap()
    }

    fn headers() -> Vec<String> {
        ["id", "Comentario", "Comentario_polarity"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn annotations(n: usize) -> Vec<Vec<String>> {
        (0..n).map(|i| vec![format!("0.{i}")]).collect()
    }

    fn writer(dir: &Path, interval: usize) -> CheckpointWriter {
        CheckpointWriter::new(
            dir.join("in_analyzed.partial.csv"),
            dir.join("in_analyzed.csv"),
            headers(),
            interval,
        )
    }

    #[test]
    fn zero_rows_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 2);
        assert!(!w.checkpoint(t.rows(), &annotations(0)).unwrap());
        assert!(!w.destination().exists());
    }

    #[test]
    fn interval() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), 2);
        assert!(!w.is_due(1));
        assert!(w.is_due(2));
        let w = writer(dir.path(), 0);
        assert!(!w.is_due(100));
    }

    #[test]
    fn huge_interval_after_resume() {
        let dir = tempfile::tempdir().unwrap();
        let w = writer(dir.path(), usize::MAX).resume_at(1);
        assert!(!w.is_due(10));
        assert!(!w.is_due(usize::MAX - 1));
        assert!(w.is_due(usize::MAX));
    }

    #[test]
    fn checkpoint_then_finish() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 2);

        assert!(w.checkpoint(t.rows(), &annotations(2)).unwrap());
        assert_eq!(w.k(), 2);
        let partial = std::fs::read_to_string(w.destination()).unwrap();
        assert_eq!(
            partial,
            "\u{feff}id,Comentario,Comentario_polarity\n1,bueno,0.0\n2,malo,0.1\n"
        );

        // same k again: nothing written
        assert!(!w.checkpoint(t.rows(), &annotations(2)).unwrap());

        let final_path = w.finish(t.rows(), &annotations(3)).unwrap();
        assert!(!dir.path().join("in_analyzed.partial.csv").exists());
        let content = std::fs::read_to_string(final_path).unwrap();
        assert_eq!(
            content,
            "\u{feff}id,Comentario,Comentario_polarity\n1,bueno,0.0\n2,malo,0.1\n3,,0.2\n"
        );
    }

    #[test]
    fn finish_after_last_interval() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 3);
        assert!(w.checkpoint(t.rows(), &annotations(3)).unwrap());
        let before = std::fs::read(w.destination()).unwrap();
        let final_path = w.finish(t.rows(), &annotations(3)).unwrap();
        assert_eq!(std::fs::read(final_path).unwrap(), before);
    }

    #[test]
    fn going_back_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 1);
        w.checkpoint(t.rows(), &annotations(2)).unwrap();
        assert!(w.checkpoint(t.rows(), &annotations(1)).is_err());
    }

    #[test]
    fn load_matching_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 2);
        w.checkpoint(t.rows(), &annotations(2)).unwrap();

        let loaded = load(w.destination(), &t, &headers()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].get(0), Some("0.1"));
    }

    #[test]
    fn load_rejects_other_input() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 2);
        w.checkpoint(t.rows(), &annotations(2)).unwrap();

        let other = Table::from_reader(
            "id,Comentario\n1,bueno\n2,otro\n".as_bytes(),
            Path::new("in.csv"),
        )
        .unwrap();
        let err = load(w.destination(), &other, &headers()).unwrap_err();
        assert!(matches!(err, Error::IncompatibleCheckpoint { .. }));
    }

    #[test]
    fn load_rejects_other_header() {
        let dir = tempfile::tempdir().unwrap();
        let t = table();
        let mut w = writer(dir.path(), 2);
        w.checkpoint(t.rows(), &annotations(2)).unwrap();

        let mut other_headers = headers();
        other_headers.push("Comentario_subjectivity".to_string());
        let err = load(w.destination(), &t, &other_headers).unwrap_err();
        assert!(matches!(err, Error::IncompatibleCheckpoint { .. }));
    }
}
