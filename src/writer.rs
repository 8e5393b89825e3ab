//! JSON output file handling.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::{Result, ReviewRecord};

/// Default output file name.
pub const DEFAULT_OUTPUT_FILE: &str = "game_reviews_keywords_with_sites.json";

/// Writes `records` to `path` as a pretty-printed UTF-8 JSON array,
/// replacing any existing file.
///
/// Non-ASCII text is written as-is. The write is not atomic.
pub fn write_records(records: &[ReviewRecord], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Reads records previously written by [`write_records`].
pub fn read_records(path: impl AsRef<Path>) -> Result<Vec<ReviewRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::OrganicResult;
    use crate::ReviewError;

    fn sample_records() -> Vec<ReviewRecord> {
        let base = ReviewRecord::from_organic(
            OrganicResult {
                link: Some("https://www.inven.co.kr/board/lordnine/1".to_string()),
                title: Some("로드나인 후기".to_string()),
                snippet: Some("과금 구조가 아쉽지만 재밌습니다".to_string()),
                date: None,
            },
            "google",
            "로드나인 후기",
            "inven.co.kr",
        );
        vec![
            base.clone(),
            base.with_comment("동의합니다"),
            ReviewRecord::from_organic(OrganicResult::default(), "google", "review", "gamespot.com"),
        ]
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let records = sample_records();

        write_records(&records, &path).unwrap();
        let read_back = read_records(&path).unwrap();

        assert_eq!(read_back, records);
    }

    #[test]
    fn test_write_preserves_non_ascii_and_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_records(&sample_records(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("로드나인 후기"));
        assert!(text.contains("날짜 없음"));
        assert!(!text.contains("\\u"));
        assert!(text.starts_with("[\n  {\n    \"url\""));
        assert!(text.contains("\"comment\": null"));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale content that is much longer than an empty array").unwrap();

        write_records(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_records(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ReviewError::Io(_)));
    }
}
