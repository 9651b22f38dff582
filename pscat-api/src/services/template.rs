//! Downloadable bulk import template
//!
//! A fixed asset compiled into the binary. Bump the version in
//! [`TEMPLATE_FILENAME`] whenever the column contract changes.

/// File name offered to clients
pub const TEMPLATE_FILENAME: &str = "problem_statements_template_v1.csv";

const TEMPLATE_CSV: &str = include_str!("../../assets/problem_statements_template.csv");

/// Header plus five example rows
pub fn download_template() -> &'static [u8] {
    TEMPLATE_CSV.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::csv_rows::parse_csv;
    use crate::services::row_validator::validate_row;
    use uuid::Uuid;

    #[test]
    fn test_template_has_five_valid_rows() {
        let rows = parse_csv(download_template()).unwrap();
        assert_eq!(rows.len(), 5);

        let owner = Uuid::new_v4();
        for (idx, row) in rows.iter().enumerate() {
            assert!(
                validate_row(row, idx + 2, owner).is_ok(),
                "template row {} invalid",
                idx + 2
            );
        }
    }

    #[test]
    fn test_template_header_names_every_column() {
        let text = std::str::from_utf8(download_template()).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "title,abstract,domain,category,difficulty,duration,technologies,deliverables,\
             prerequisites,learningOutcomes,tags,status,featured"
        );
    }
}
