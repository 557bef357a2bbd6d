//! Filtering record files by date and keyword.
//!
//! The input array is streamed: records are deserialized one element at a
//! time and matches are written straight to the output file, so a large
//! archive never has to fit in memory. A record's date is the first
//! `Mon D, YYYY` style date found in its body text, falling back to the
//! retrieval timestamp when the body carries none.

use crate::error::{Result, ScrapeError};
use crate::models::ContentRecord;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::{self, DeserializeSeed, SeqAccess, Visitor};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

static BODY_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]*\s+\d{1,2},\s+\d{4}")
        .unwrap()
});

/// What to keep. All bounds are inclusive; unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub keyword: Option<String>,
}

impl FilterCriteria {
    pub fn matches(&self, record: &ContentRecord) -> bool {
        let date = record_date(record);
        if self.from.is_some_and(|from| date < from) {
            return false;
        }
        if self.to.is_some_and(|to| date > to) {
            return false;
        }
        if let Some(keyword) = &self.keyword {
            let keyword = keyword.to_lowercase();
            let in_title = record
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&keyword));
            if !in_title && !record.body.to_lowercase().contains(&keyword) {
                return false;
            }
        }
        true
    }
}

/// The date a record is filtered on: the first publication-style date in
/// the body, otherwise the retrieval timestamp.
fn record_date(record: &ContentRecord) -> NaiveDate {
    if let Some(m) = BODY_DATE.find(&record.body) {
        let text = m.as_str().split_whitespace().collect::<Vec<_>>().join(" ");
        for fmt in ["%b %d, %Y", "%B %d, %Y"] {
            if let Ok(date) = NaiveDate::parse_from_str(&text, fmt) {
                return date;
            }
        }
    }
    record.retrieved_at.date_naive()
}

/// Filter `input` into a sibling `<stem>_filtered.json` file, preserving
/// record order. Returns the output path. An empty result still produces a
/// valid (empty) JSON array.
pub fn filter_file(input: &Path, criteria: &FilterCriteria) -> Result<PathBuf> {
    let output = output_path(input);
    let dir = input.parent().unwrap_or_else(|| Path::new("."));

    let reader = BufReader::new(File::open(input)?);
    let tmp = NamedTempFile::new_in(dir)?;
    let (kept, total) = {
        let mut writer = BufWriter::new(tmp.as_file());
        let mut de = serde_json::Deserializer::from_reader(reader);
        let pass = FilterPass {
            criteria,
            writer: &mut writer,
            kept: 0,
            total: 0,
        };
        let counts = pass
            .deserialize(&mut de)
            .map_err(|e| ScrapeError::MalformedInput(e.to_string()))?;
        de.end()
            .map_err(|e| ScrapeError::MalformedInput(e.to_string()))?;
        writer.flush()?;
        counts
    };
    tmp.persist(&output).map_err(|e| e.error)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        kept,
        total,
        "Filtered records"
    );
    Ok(output)
}

fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("records");
    input.with_file_name(format!("{stem}_filtered.json"))
}

/// One streaming pass over the input array: deserializes each element,
/// applies the criteria, and writes survivors to the output immediately.
struct FilterPass<'a, W: Write> {
    criteria: &'a FilterCriteria,
    writer: &'a mut W,
    kept: usize,
    total: usize,
}

impl<'de, W: Write> DeserializeSeed<'de> for FilterPass<'_, W> {
    type Value = (usize, usize);

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, W: Write> Visitor<'de> for FilterPass<'_, W> {
    type Value = (usize, usize);

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON array of content records")
    }

    fn visit_seq<A>(mut self, mut seq: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        self.writer.write_all(b"[").map_err(de::Error::custom)?;
        while let Some(record) = seq.next_element::<ContentRecord>()? {
            self.total += 1;
            if !self.criteria.matches(&record) {
                continue;
            }
            let sep: &[u8] = if self.kept == 0 { b"\n  " } else { b",\n  " };
            self.writer.write_all(sep).map_err(de::Error::custom)?;
            serde_json::to_writer(&mut *self.writer, &record).map_err(de::Error::custom)?;
            self.kept += 1;
        }
        self.writer.write_all(b"\n]\n").map_err(de::Error::custom)?;
        Ok((self.kept, self.total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentType;
    use crate::store;
    use chrono::{TimeZone, Utc};

    fn record(url: &str, title: &str, body: &str) -> ContentRecord {
        ContentRecord {
            source: "metr.org".to_string(),
            url: url.to_string(),
            title: Some(title.to_string()),
            body: body.to_string(),
            content_type: ContentType::Blog,
            retrieved_at: Utc.with_ymd_and_hms(2026, 3, 15, 9, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_body_date_preferred_over_retrieval_time() {
        let rec = record("https://a/1", "t", "Published on Jan 5, 2024 by the team.");
        assert_eq!(record_date(&rec), date(2024, 1, 5));

        let rec = record("https://a/2", "t", "No date in this body.");
        assert_eq!(record_date(&rec), date(2026, 3, 15));
    }

    #[test]
    fn test_full_month_names_parse() {
        let rec = record("https://a/1", "t", "Posted December 31, 2023.");
        assert_eq!(record_date(&rec), date(2023, 12, 31));
    }

    #[test]
    fn test_keyword_is_case_insensitive_over_title_and_body() {
        let criteria = FilterCriteria {
            keyword: Some("EVALUATION".to_string()),
            ..Default::default()
        };
        assert!(criteria.matches(&record("https://a/1", "Model evaluations", "body")));
        assert!(criteria.matches(&record("https://a/2", "t", "an evaluation of risks")));
        assert!(!criteria.matches(&record("https://a/3", "t", "nothing relevant")));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            from: Some(date(2024, 1, 5)),
            to: Some(date(2024, 1, 5)),
            ..Default::default()
        };
        assert!(criteria.matches(&record("https://a/1", "t", "Jan 5, 2024")));
        assert!(!criteria.matches(&record("https://a/2", "t", "Jan 6, 2024")));
        assert!(!criteria.matches(&record("https://a/3", "t", "Jan 4, 2024")));
    }

    #[test]
    fn test_filter_file_preserves_order_and_names_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("metr_org_data.json");
        let records = vec![
            record("https://a/1", "keep", "alignment research Jan 1, 2024"),
            record("https://a/2", "drop", "unrelated Jan 2, 2024"),
            record("https://a/3", "keep", "more alignment notes Jan 3, 2024"),
        ];
        store::save(&records, &input).unwrap();

        let criteria = FilterCriteria {
            keyword: Some("alignment".to_string()),
            ..Default::default()
        };
        let output = filter_file(&input, &criteria).unwrap();
        assert_eq!(
            output.file_name().unwrap().to_str().unwrap(),
            "metr_org_data_filtered.json"
        );

        let kept = store::load(&output).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].url, "https://a/1");
        assert_eq!(kept[1].url, "https://a/3");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        let records = vec![
            record("https://a/1", "t", "safety Jan 1, 2024"),
            record("https://a/2", "t", "other Jan 2, 2024"),
        ];
        store::save(&records, &input).unwrap();

        let criteria = FilterCriteria {
            keyword: Some("safety".to_string()),
            ..Default::default()
        };
        let first = filter_file(&input, &criteria).unwrap();
        let second = filter_file(&first, &criteria).unwrap();
        assert_eq!(store::load(&first).unwrap(), store::load(&second).unwrap());
    }

    #[test]
    fn test_no_matches_yields_valid_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.json");
        store::save(&[record("https://a/1", "t", "body")], &input).unwrap();

        let criteria = FilterCriteria {
            keyword: Some("absent-term".to_string()),
            ..Default::default()
        };
        let output = filter_file(&input, &criteria).unwrap();
        assert_eq!(store::load(&output).unwrap(), Vec::new());
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.json");
        std::fs::write(&input, "[{\"source\": \"x\"").unwrap();

        let err = filter_file(&input, &FilterCriteria::default()).unwrap_err();
        assert!(matches!(err, ScrapeError::MalformedInput(_)));
    }
}
