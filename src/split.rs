//! Splitting a record file into a fixed number of parts.
//!
//! Records keep their order: part 1 holds the first chunk, part N the last,
//! and chunk sizes differ by at most one. Concatenating the parts in order
//! reproduces the input exactly.

use crate::error::{Result, ScrapeError};
use crate::models::ContentRecord;
use crate::store;
use std::path::{Path, PathBuf};
use tracing::info;

/// Split `input` into `parts` sibling files named `<stem>_part{i}.json`.
/// Returns the output paths in part order.
///
/// `parts` must be between 1 and the number of records in the file;
/// anything else is [`ScrapeError::InvalidSplitCount`], and nothing is
/// written in that case.
pub fn split_file(input: &Path, parts: usize) -> Result<Vec<PathBuf>> {
    let records = store::load(input)?;
    if parts == 0 || parts > records.len() {
        return Err(ScrapeError::InvalidSplitCount {
            requested: parts,
            available: records.len(),
        });
    }

    let mut outputs = Vec::with_capacity(parts);
    for (i, chunk) in chunks(&records, parts).into_iter().enumerate() {
        let path = part_path(input, i + 1);
        store::save(chunk, &path)?;
        outputs.push(path);
    }

    info!(
        input = %input.display(),
        records = records.len(),
        parts,
        "Split records"
    );
    Ok(outputs)
}

/// Divide `records` into `parts` contiguous chunks. The first
/// `len % parts` chunks carry one extra record.
fn chunks(records: &[ContentRecord], parts: usize) -> Vec<&[ContentRecord]> {
    let base = records.len() / parts;
    let extra = records.len() % parts;

    let mut out = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let size = base + usize::from(i < extra);
        out.push(&records[start..start + size]);
        start += size;
    }
    out
}

fn part_path(input: &Path, part: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records");
    input.with_file_name(format!("{stem}_part{part}.json"))
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
                title: None,
                body: format!("post {i}"),
                content_type: ContentType::Blog,
                retrieved_at: Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, i as u32).unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_chunk_sizes_differ_by_at_most_one() {
        let records = sample(7);
        let sizes: Vec<usize> = chunks(&records, 3).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![3, 2, 2]);

        let sizes: Vec<usize> = chunks(&records, 7).iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![1; 7]);
    }

    #[test]
    fn test_split_is_lossless_and_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        let records = sample(7);
        store::save(&records, &input).unwrap();

        let outputs = split_file(&input, 3).unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!(
            outputs[0].file_name().unwrap().to_str().unwrap(),
            "data_part1.json"
        );

        let mut rejoined = Vec::new();
        for path in &outputs {
            rejoined.extend(store::load(path).unwrap());
        }
        assert_eq!(rejoined, records);
    }

    #[test]
    fn test_single_part_copies_everything() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        let records = sample(4);
        store::save(&records, &input).unwrap();

        let outputs = split_file(&input, 1).unwrap();
        assert_eq!(store::load(&outputs[0]).unwrap(), records);
    }

    #[test]
    fn test_invalid_part_counts_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        store::save(&sample(3), &input).unwrap();

        for parts in [0, 4, 100] {
            let err = split_file(&input, parts).unwrap_err();
            assert!(
                matches!(err, ScrapeError::InvalidSplitCount { .. }),
                "parts = {parts}"
            );
        }
        assert!(!input.with_file_name("data_part1.json").exists());
    }
}
