//! CSV decoding for bulk import
//!
//! Every data line becomes a [`CsvRow`]: a closed set of named string fields,
//! with absent columns and cells present as empty strings. Short rows are
//! kept and left to row validation. Decoding is otherwise all or nothing: a
//! stream that cannot be read as CSV is rejected before any row is looked at.

use csv::{ReaderBuilder, Trim};
use serde::Deserialize;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Columns every upload must name in its header
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "title",
    "abstract",
    "domain",
    "category",
    "difficulty",
    "duration",
];

/// Separator inside list-valued cells
pub const LIST_SEPARATOR: char = ';';

/// Whole-batch import failure
#[derive(Debug, Error)]
pub enum ImportError {
    /// Stream is not readable as CSV (bad UTF-8, broken quoting)
    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),

    /// Header row lacks required columns
    #[error("CSV header is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}

/// One data line of an upload, cells untrimmed
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CsvRow {
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub domain: String,
    pub category: String,
    pub difficulty: String,
    pub duration: String,
    pub technologies: String,
    pub deliverables: String,
    pub prerequisites: String,
    #[serde(rename = "learningOutcomes")]
    pub learning_outcomes: String,
    pub tags: String,
    pub status: String,
    pub featured: String,
}

/// Decode an uploaded CSV document into rows, in source order
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<CsvRow>, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    let rows = reader
        .deserialize()
        .collect::<Result<Vec<CsvRow>, csv::Error>>()?;

    Ok(rows)
}

/// Split a `;`-separated cell, trimming parts and dropping empty ones
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(LIST_SEPARATOR)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Only the literal `true`, in any case, is true
pub fn parse_featured(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "title,abstract,domain,category,difficulty,duration";

    #[test]
    fn test_absent_optional_columns_are_empty() {
        let csv = format!("{}\nT,A,Blockchain,Major,Beginner,2 months\n", HEADER);
        let rows = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "T");
        assert_eq!(rows[0].technologies, "");
        assert_eq!(rows[0].featured, "");
    }

    #[test]
    fn test_header_names_are_trimmed_and_bom_stripped() {
        let csv = "\u{FEFF} title , abstract ,domain,category,difficulty,duration,learningOutcomes\n\
                   T,A,Blockchain,Major,Beginner,2 months,Ship it\n";
        let rows = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows[0].title, "T");
        assert_eq!(rows[0].abstract_text, "A");
        assert_eq!(rows[0].learning_outcomes, "Ship it");
    }

    #[test]
    fn test_quoted_cells_keep_commas() {
        let csv = format!(
            "{}\n\"Title, with comma\",A,Blockchain,Major,Beginner,2 months\n",
            HEADER
        );
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].title, "Title, with comma");
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let csv = format!("{},notes\nT,A,Blockchain,Major,Beginner,2 months,x\n", HEADER);
        assert_eq!(parse_csv(csv.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "title,abstract,domain,category,duration\nT,A,Blockchain,Major,2 months\n";
        match parse_csv(csv.as_bytes()) {
            Err(ImportError::MissingColumns(missing)) => assert_eq!(missing, vec!["difficulty"]),
            other => panic!("expected missing columns, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_stream_is_missing_columns() {
        assert!(matches!(parse_csv(b""), Err(ImportError::MissingColumns(_))));
    }

    #[test]
    fn test_short_row_gets_empty_cells() {
        let csv = format!(
            "{}\nT,A,Blockchain,Major,Beginner,2 months\nShort,A,Blockchain\n",
            HEADER
        );
        let rows = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].title, "Short");
        assert_eq!(rows[1].domain, "Blockchain");
        assert_eq!(rows[1].category, "");
        assert_eq!(rows[1].duration, "");
    }

    #[test]
    fn test_long_row_extra_cells_ignored() {
        let csv = format!("{}\nT,A,Blockchain,Major,Beginner,2 months,extra\n", HEADER);
        let rows = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].duration, "2 months");
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut bytes = format!("{}\n", HEADER).into_bytes();
        bytes.extend_from_slice(b"\xFF\xFE,A,Blockchain,Major,Beginner,2 months\n");
        assert!(matches!(parse_csv(&bytes), Err(ImportError::Malformed(_))));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("Python;TensorFlow; React "),
            vec!["Python", "TensorFlow", "React"]
        );
        assert_eq!(split_list("a;;b; ;"), vec!["a", "b"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_parse_featured() {
        for raw in ["TRUE", "true", "True", " true "] {
            assert!(parse_featured(raw), "{} should be true", raw);
        }
        for raw in ["", "false", "yes", "1", "truthy"] {
            assert!(!parse_featured(raw), "{} should be false", raw);
        }
    }
}
