//! Custom identifier format
//!
//! Human-readable record keys of the form `PPPNNN`: two or three uppercase
//! prefix letters followed by a three digit, zero-padded sequence number
//! (`AIM001`, `IOT042`). Distinct from the internal UUID storage key.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Error, Result};

/// Width of the zero-padded sequence suffix
pub const SEQUENCE_WIDTH: usize = 3;

/// Largest sequence expressible in [`SEQUENCE_WIDTH`] digits
pub const MAX_SEQUENCE: i64 = 999;

static CUSTOM_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{2,3}\d{3}$").expect("custom id pattern is valid"));

/// Check whether `id` is a well-formed custom identifier
///
/// # Examples
///
/// ```
/// use pscat_common::custom_id::is_valid_custom_id;
///
/// assert!(is_valid_custom_id("AIM001"));
/// assert!(is_valid_custom_id("AB123"));
/// assert!(!is_valid_custom_id("aim001"));
/// assert!(!is_valid_custom_id("AIM1000"));
/// ```
pub fn is_valid_custom_id(id: &str) -> bool {
    CUSTOM_ID_PATTERN.is_match(id)
}

/// Build a custom identifier from a prefix and a sequence number
///
/// Fails with [`Error::SequenceExhausted`] when the sequence needs more than
/// three digits, since the result would not match the identifier format.
///
/// # Examples
///
/// ```
/// use pscat_common::custom_id::format_custom_id;
///
/// assert_eq!(format_custom_id("AIM", 4, "AI & Machine Learning").unwrap(), "AIM004");
/// assert!(format_custom_id("AIM", 1000, "AI & Machine Learning").is_err());
/// ```
pub fn format_custom_id(prefix: &str, sequence: i64, domain: &str) -> Result<String> {
    if !(1..=MAX_SEQUENCE).contains(&sequence) {
        return Err(Error::SequenceExhausted {
            domain: domain.to_string(),
        });
    }
    Ok(format!("{}{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH))
}
