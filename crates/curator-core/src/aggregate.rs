//! Combine per-directory ledgers into one batch-level CSV.

use std::path::Path;

use crate::error::{CurationError, CurationResult};
use crate::ledger::ResultLedger;

/// Concatenate every subdirectory's ledger under `root` into
/// `root/output_file`, renumbering rows 0..N-1 across the whole batch.
///
/// Subdirectories without a ledger are skipped with a warning. Returns the
/// number of rows written; if no ledger was found, no output file is
/// created and the count is zero.
pub fn aggregate(root: &Path, ledger_file: &str, output_file: &str) -> CurationResult<usize> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();

    let output_path = root.join(output_file);
    let mut writer: Option<csv::Writer<std::fs::File>> = None;
    let mut samples = 0usize;
    let mut written = 0usize;

    for dir in &dirs {
        let ledger_path = dir.join(ledger_file);
        if !ledger_path.exists() {
            tracing::warn!("No ledger in {}, skipping", dir.display());
            continue;
        }
        let ledger = ResultLedger::load(&ledger_path)?;

        // The first ledger fixes the batch's column layout.
        if writer.is_none() {
            samples = ledger.samples();
            let mut new_writer =
                csv::Writer::from_path(&output_path).map_err(|e| CurationError::Ledger {
                    path: output_path.clone(),
                    message: e.to_string(),
                })?;
            let mut header = vec![
                "DirIndex".to_string(),
                "Directory".to_string(),
                "Image File".to_string(),
                "Actual Label".to_string(),
            ];
            for i in 0..samples {
                header.push(format!("Response{i}"));
                header.push(format!("Similarity{i}"));
            }
            new_writer
                .write_record(&header)
                .map_err(|e| CurationError::Ledger {
                    path: output_path.clone(),
                    message: e.to_string(),
                })?;
            writer = Some(new_writer);
        } else if ledger.samples() != samples {
            return Err(CurationError::Ledger {
                path: ledger_path,
                message: format!(
                    "ledger has {} samples per image, batch started with {}",
                    ledger.samples(),
                    samples
                ),
            });
        }

        if let Some(writer) = writer.as_mut() {
            for row in ledger.rows() {
                let mut record = vec![
                    written.to_string(),
                    row.directory.clone(),
                    row.image_file.clone(),
                    row.actual_label.clone(),
                ];
                for (response, similarity) in row.responses.iter().zip(&row.similarities) {
                    record.push(response.clone());
                    record.push(similarity.to_string());
                }
                writer.write_record(&record).map_err(|e| CurationError::Ledger {
                    path: output_path.clone(),
                    message: e.to_string(),
                })?;
                written += 1;
            }
        }
    }

    if let Some(mut writer) = writer {
        writer.flush().map_err(|e| CurationError::Ledger {
            path: output_path.clone(),
            message: e.to_string(),
        })?;
        tracing::info!("Aggregated {written} rows into {}", output_path.display());
    } else {
        tracing::warn!("No ledgers found under {}", root.display());
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::LedgerRow;
    use std::path::PathBuf;

    fn make_ledger_dir(root: &Path, name: &str, files: &[&str]) -> PathBuf {
        let dir = root.join(name);
        std::fs::create_dir(&dir).unwrap();
        let mut ledger = ResultLedger::new(2);
        for file in files {
            ledger.push(LedgerRow {
                directory: dir.display().to_string(),
                image_file: file.to_string(),
                actual_label: "a label".to_string(),
                responses: vec!["first".to_string(), "second".to_string()],
                similarities: vec![0.9, 0.1],
            });
        }
        ledger.save(&dir.join("results.csv")).unwrap();
        dir
    }

    #[test]
    fn test_aggregate_renumbers_across_directories() {
        let root = tempfile::tempdir().unwrap();
        make_ledger_dir(root.path(), "birds", &["b0.jpg", "b1.jpg"]);
        make_ledger_dir(root.path(), "cats", &["c0.jpg", "c1.jpg"]);

        let written = aggregate(root.path(), "results.csv", "all_results.csv").unwrap();
        assert_eq!(written, 4);

        let content = std::fs::read_to_string(root.path().join("all_results.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("DirIndex,Directory,Image File,Actual Label,Response0"));
        // Directories in lexicographic order, indices renumbered 0..3
        assert!(lines[1].starts_with("0,") && lines[1].contains("b0.jpg"));
        assert!(lines[2].starts_with("1,") && lines[2].contains("b1.jpg"));
        assert!(lines[3].starts_with("2,") && lines[3].contains("c0.jpg"));
        assert!(lines[4].starts_with("3,") && lines[4].contains("c1.jpg"));
    }

    #[test]
    fn test_aggregate_skips_directories_without_ledger() {
        let root = tempfile::tempdir().unwrap();
        make_ledger_dir(root.path(), "cats", &["c0.jpg"]);
        std::fs::create_dir(root.path().join("empty")).unwrap();

        let written = aggregate(root.path(), "results.csv", "all_results.csv").unwrap();
        assert_eq!(written, 1);
    }

    #[test]
    fn test_aggregate_no_ledgers_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        std::fs::create_dir(root.path().join("empty")).unwrap();

        let written = aggregate(root.path(), "results.csv", "all_results.csv").unwrap();
        assert_eq!(written, 0);
        assert!(!root.path().join("all_results.csv").exists());
    }

    #[test]
    fn test_aggregate_rejects_mixed_sample_counts() {
        let root = tempfile::tempdir().unwrap();
        make_ledger_dir(root.path(), "cats", &["c0.jpg"]);

        let dir = root.path().join("dogs");
        std::fs::create_dir(&dir).unwrap();
        let mut ledger = ResultLedger::new(3);
        ledger.push(LedgerRow {
            directory: dir.display().to_string(),
            image_file: "d0.jpg".to_string(),
            actual_label: "a dog".to_string(),
            responses: vec!["a".into(), "b".into(), "c".into()],
            similarities: vec![0.1, 0.2, 0.3],
        });
        ledger.save(&dir.join("results.csv")).unwrap();

        let err = aggregate(root.path(), "results.csv", "all_results.csv").unwrap_err();
        assert!(matches!(err, CurationError::Ledger { .. }));
    }
}
