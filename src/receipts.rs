//! Receipt files attached to expenses.
//!
//! Receipts are copied into the configured upload directory and referenced
//! from `Expense::receipt_filename` by their stored name only.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;

pub struct ReceiptStore {
    dir: PathBuf,
}

impl ReceiptStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Copy `source` into the store and return the name it was saved under
    pub fn store(&self, source: &Path) -> Result<String> {
        fs::create_dir_all(&self.dir)?;

        let original = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut name = stored_name(&original, Utc::now());

        // Two uploads in the same millisecond with the same name
        let mut suffix = 1;
        while self.dir.join(&name).exists() {
            name = format!("{}-{}", suffix, stored_name(&original, Utc::now()));
            suffix += 1;
        }

        fs::copy(source, self.dir.join(&name))?;
        info!("Stored receipt {:?} as {}", source, name);
        Ok(name)
    }

    /// Full path of a stored receipt
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(sanitize(filename))
    }
}

fn stored_name(original: &str, now: DateTime<Utc>) -> String {
    let clean = sanitize(original);
    let clean = if clean.is_empty() { "receipt".to_string() } else { clean };
    format!("{}_{}", now.format("%Y%m%d%H%M%S%3f"), clean)
}

/// Keep only characters that are safe in a file name on every platform
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn stored_names_are_timestamped_and_sanitized() {
        let now = Utc.with_ymd_and_hms(2024, 8, 3, 14, 5, 9).unwrap();
        assert_eq!(
            stored_name("thinset receipt (1).pdf", now),
            "20240803140509000_thinset_receipt__1_.pdf"
        );
        assert_eq!(stored_name("../../etc/passwd", now), "20240803140509000__.._etc_passwd");
        assert_eq!(stored_name("", now), "20240803140509000_receipt");
    }

    #[test]
    fn sanitize_strips_path_separators() {
        assert_eq!(sanitize("../secret"), "_secret");
        assert_eq!(sanitize("a/b\\c.jpg"), "a_b_c.jpg");
    }

    #[test]
    fn store_copies_file_into_upload_dir() {
        let src_dir = tempdir().unwrap();
        let source = src_dir.path().join("lumber.jpg");
        fs::write(&source, b"jpeg bytes").unwrap();

        let upload_dir = tempdir().unwrap();
        let store = ReceiptStore::new(upload_dir.path().join("uploads"));

        let first = store.store(&source).unwrap();
        let second = store.store(&source).unwrap();

        assert!(first.ends_with("_lumber.jpg"));
        assert_ne!(first, second);
        assert_eq!(fs::read(store.path_of(&first)).unwrap(), b"jpeg bytes");
        assert!(store.path_of(&second).exists());
    }
}
