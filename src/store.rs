//! Reading and writing record files.
//!
//! Every write goes through a temporary file in the destination directory
//! followed by an atomic rename, so a crash mid-write never leaves a
//! truncated JSON file behind.

use crate::error::Result;
use crate::models::ContentRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Write `records` to `path` as a pretty-printed JSON array.
pub fn save(records: &[ContentRecord], path: &Path) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;

    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| e.error)?;

    info!(path = %path.display(), records = records.len(), "Wrote records");
    Ok(())
}

/// Load a JSON array of records from `path`.
pub fn load(path: &Path) -> Result<Vec<ContentRecord>> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use chrono::{TimeZone, Utc};

    fn sample(n: usize) -> Vec<ContentRecord> {
        (0..n)
            .map(|i| ContentRecord {
                source: "metr.org".to_string(),
                url: format!("https://metr.org/blog/post-{i}"),
                title: Some(format!("Post {i}")),
                body: format!("Body of post {i}."),
                content_type: ContentType::Blog,
                retrieved_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, i as u32).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_round_trip_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metr_org_data.json");
        let records = sample(3);

        save(&records, &path).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_save_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/out.json");

        save(&sample(1), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_array_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");

        save(&[], &path).unwrap();
        assert_eq!(load(&path).unwrap(), Vec::new());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(load(&path).is_err());
    }
}
