use crate::utils::error::EtlError;
use serde::{Deserialize, Serialize};

/// 單一活動紀錄，解析後不再變動
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    pub data: serde_json::Value,
}

impl Record {
    pub fn new(data: serde_json::Value) -> Self {
        Self { data }
    }
}

/// One step of a field path: a sequence position or a map key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Index(usize),
    Key(String),
}

/// `/`-delimited path into a record, e.g. `lineup/0`.
///
/// The literal text is kept because it doubles as the column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    raw: String,
    segments: Vec<Segment>,
}

impl FieldPath {
    pub const DELIMITER: char = '/';

    pub fn parse(text: &str) -> Self {
        let segments = text
            .split(Self::DELIMITER)
            .map(|segment| {
                if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                    // 超出 usize 的索引一律視為越界
                    Segment::Index(segment.parse().unwrap_or(usize::MAX))
                } else {
                    Segment::Key(segment.to_string())
                }
            })
            .collect();

        Self {
            raw: text.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Rendered cells of one record, one per column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(pub Vec<String>);

/// Header plus one row per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Row>,
}

/// Result of reading one configured source.
#[derive(Debug)]
pub enum SourceOutcome {
    Collected { source: String, records: Vec<Record> },
    Failed { source: String, reason: EtlError },
}

impl SourceOutcome {
    pub fn source(&self) -> &str {
        match self {
            SourceOutcome::Collected { source, .. } | SourceOutcome::Failed { source, .. } => {
                source
            }
        }
    }
}

/// A source that contributed nothing, kept for reporting.
#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub reason: EtlError,
}

/// Records from every successful source, in source order, plus the failures.
#[derive(Debug, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub failures: Vec<SourceFailure>,
    pub source_count: usize,
}

impl Extraction {
    pub fn from_outcomes(outcomes: Vec<SourceOutcome>) -> Self {
        let source_count = outcomes.len();
        let mut extraction = Extraction {
            source_count,
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                SourceOutcome::Collected { records, .. } => extraction.records.extend(records),
                SourceOutcome::Failed { source, reason } => {
                    extraction.failures.push(SourceFailure { source, reason })
                }
            }
        }

        extraction
    }
}

#[derive(Debug, Clone)]
pub struct ExportResult {
    pub records: Vec<Record>,
    pub table: Table,
    pub csv_output: String,
    pub failed_sources: Vec<String>,
    pub source_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_path_segments() {
        let path = FieldPath::parse("lineup/0/name");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("lineup".to_string()),
                Segment::Index(0),
                Segment::Key("name".to_string()),
            ]
        );
        assert_eq!(path.as_str(), "lineup/0/name");
    }

    #[test]
    fn test_signed_or_mixed_segments_are_keys() {
        let path = FieldPath::parse("+1/-1/1a/");
        assert_eq!(
            path.segments(),
            &[
                Segment::Key("+1".to_string()),
                Segment::Key("-1".to_string()),
                Segment::Key("1a".to_string()),
                Segment::Key(String::new()),
            ]
        );
    }

    #[test]
    fn test_overflowing_index_is_out_of_range() {
        let path = FieldPath::parse("99999999999999999999999999");
        assert_eq!(path.segments(), &[Segment::Index(usize::MAX)]);
    }

    #[test]
    fn test_extraction_preserves_source_order() {
        let outcomes = vec![
            SourceOutcome::Collected {
                source: "a".to_string(),
                records: vec![Record::new(json!({"id": 1})), Record::new(json!({"id": 2}))],
            },
            SourceOutcome::Failed {
                source: "b".to_string(),
                reason: EtlError::ProcessingError {
                    message: "boom".to_string(),
                },
            },
            SourceOutcome::Collected {
                source: "c".to_string(),
                records: vec![Record::new(json!({"id": 3}))],
            },
        ];

        let extraction = Extraction::from_outcomes(outcomes);

        assert_eq!(extraction.source_count, 3);
        assert_eq!(extraction.records.len(), 3);
        assert_eq!(extraction.records[2].data["id"], json!(3));
        assert_eq!(extraction.failures.len(), 1);
        assert_eq!(extraction.failures[0].source, "b");
    }
}
