//! The per-directory result ledger.
//!
//! An append-only table of curated results, persisted as CSV so a
//! partially-failed run can be resumed without re-querying images that
//! already have a row. Exactly one writer (the directory curator) mutates
//! a ledger during a run.

use std::path::Path;

use crate::error::{CurationError, CurationResult};

/// One curated image: its directory, file name, normalized label, and the
/// normalized responses with their similarity scores.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerRow {
    pub directory: String,
    pub image_file: String,
    pub actual_label: String,
    pub responses: Vec<String>,
    pub similarities: Vec<f32>,
}

/// Ordered collection of ledger rows with CSV persistence.
#[derive(Debug, Clone)]
pub struct ResultLedger {
    rows: Vec<LedgerRow>,
    samples: usize,
}

impl ResultLedger {
    /// Create an empty ledger expecting `samples` responses per row.
    pub fn new(samples: usize) -> Self {
        Self {
            rows: Vec::new(),
            samples,
        }
    }

    /// Load a ledger persisted by a prior run.
    ///
    /// The samples-per-row count is recovered from the header width.
    pub fn load(path: &Path) -> CurationResult<Self> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| ledger_err(path, e))?;
        let headers = reader.headers().map_err(|e| ledger_err(path, e))?.clone();

        // Index, Directory, Image File, Actual Label, then response/score pairs
        if headers.len() < 6 || (headers.len() - 4) % 2 != 0 {
            return Err(CurationError::Ledger {
                path: path.to_path_buf(),
                message: format!("malformed header with {} columns", headers.len()),
            });
        }
        let samples = (headers.len() - 4) / 2;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| ledger_err(path, e))?;
            if record.len() != headers.len() {
                return Err(CurationError::Ledger {
                    path: path.to_path_buf(),
                    message: format!(
                        "row {} has {} fields, expected {}",
                        rows.len(),
                        record.len(),
                        headers.len()
                    ),
                });
            }

            let mut responses = Vec::with_capacity(samples);
            let mut similarities = Vec::with_capacity(samples);
            for i in 0..samples {
                responses.push(record[4 + 2 * i].to_string());
                let raw = &record[5 + 2 * i];
                let score = raw.parse::<f32>().map_err(|_| CurationError::Ledger {
                    path: path.to_path_buf(),
                    message: format!("invalid similarity value '{raw}' in row {}", rows.len()),
                })?;
                similarities.push(score);
            }

            rows.push(LedgerRow {
                directory: record[1].to_string(),
                image_file: record[2].to_string(),
                actual_label: record[3].to_string(),
                responses,
                similarities,
            });
        }

        Ok(Self { rows, samples })
    }

    /// Persist the ledger, overwriting any prior file.
    ///
    /// Writes to a sibling temp file first and renames into place so a
    /// crash mid-write never clobbers the previous ledger.
    pub fn save(&self, path: &Path) -> CurationResult<()> {
        let temp_path = path.with_extension("csv.tmp");

        let mut writer = csv::Writer::from_path(&temp_path).map_err(|e| ledger_err(path, e))?;
        writer
            .write_record(self.header())
            .map_err(|e| ledger_err(path, e))?;

        for (index, row) in self.rows.iter().enumerate() {
            let mut record = vec![
                index.to_string(),
                row.directory.clone(),
                row.image_file.clone(),
                row.actual_label.clone(),
            ];
            for (response, similarity) in row.responses.iter().zip(&row.similarities) {
                record.push(response.clone());
                record.push(similarity.to_string());
            }
            writer.write_record(&record).map_err(|e| ledger_err(path, e))?;
        }

        writer.flush().map_err(|e| CurationError::Ledger {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        drop(writer);

        std::fs::rename(&temp_path, path).map_err(|e| CurationError::Ledger {
            path: path.to_path_buf(),
            message: format!("failed to rename temp ledger: {e}"),
        })
    }

    /// Whether a row for this image file already exists.
    pub fn contains(&self, image_file: &str) -> bool {
        self.rows.iter().any(|row| row.image_file == image_file)
    }

    /// Append a row. Callers check `contains` first; the (directory, file)
    /// uniqueness invariant lives there.
    pub fn push(&mut self, row: LedgerRow) {
        debug_assert_eq!(row.responses.len(), self.samples);
        debug_assert_eq!(row.similarities.len(), self.samples);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[LedgerRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Responses-per-row this ledger was created or loaded with.
    pub fn samples(&self) -> usize {
        self.samples
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec![
            "Index".to_string(),
            "Directory".to_string(),
            "Image File".to_string(),
            "Actual Label".to_string(),
        ];
        for i in 0..self.samples {
            header.push(format!("Response{i}"));
            header.push(format!("Similarity{i}"));
        }
        header
    }
}

fn ledger_err(path: &Path, e: csv::Error) -> CurationError {
    CurationError::Ledger {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(file: &str) -> LedgerRow {
        LedgerRow {
            directory: "data/owls".to_string(),
            image_file: file.to_string(),
            actual_label: "barn owl".to_string(),
            responses: (0..5).map(|i| format!("an owl {i}")).collect(),
            similarities: vec![0.9, 0.8, 0.7, 0.6, 0.5],
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut ledger = ResultLedger::new(5);
        ledger.push(sample_row("image001.jpg"));
        ledger.push(sample_row("image002.jpg"));
        ledger.save(&path).unwrap();

        let loaded = ResultLedger::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.samples(), 5);
        assert_eq!(loaded.rows()[0], ledger.rows()[0]);
        assert_eq!(loaded.rows()[1].image_file, "image002.jpg");
    }

    #[test]
    fn test_contains() {
        let mut ledger = ResultLedger::new(5);
        ledger.push(sample_row("image001.jpg"));
        assert!(ledger.contains("image001.jpg"));
        assert!(!ledger.contains("image002.jpg"));
    }

    #[test]
    fn test_save_overwrites_prior_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut ledger = ResultLedger::new(5);
        ledger.push(sample_row("image001.jpg"));
        ledger.save(&path).unwrap();

        ledger.push(sample_row("image002.jpg"));
        ledger.save(&path).unwrap();

        let loaded = ResultLedger::load(&path).unwrap();
        assert_eq!(loaded.len(), 2);
        // No temp file left behind
        assert!(!path.with_extension("csv.tmp").exists());
    }

    #[test]
    fn test_index_column_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        let mut ledger = ResultLedger::new(5);
        ledger.push(sample_row("image001.jpg"));
        ledger.push(sample_row("image002.jpg"));
        ledger.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert!(lines.next().unwrap().starts_with("Index,Directory,Image File,Actual Label,Response0,Similarity0"));
        assert!(lines.next().unwrap().starts_with("0,"));
        assert!(lines.next().unwrap().starts_with("1,"));
    }

    #[test]
    fn test_load_rejects_malformed_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(&path, "Index,Directory,Image File\n").unwrap();

        let err = ResultLedger::load(&path).unwrap_err();
        assert!(matches!(err, CurationError::Ledger { .. }));
    }

    #[test]
    fn test_load_rejects_bad_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        std::fs::write(
            &path,
            "Index,Directory,Image File,Actual Label,Response0,Similarity0\n\
             0,data,img.jpg,cat,a cat,not-a-number\n",
        )
        .unwrap();

        let err = ResultLedger::load(&path).unwrap_err();
        assert!(err.to_string().contains("not-a-number"));
    }

    #[test]
    fn test_empty_ledger_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");

        ResultLedger::new(5).save(&path).unwrap();
        let loaded = ResultLedger::load(&path).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.samples(), 5);
    }
}
