//! Free-text coordinate cell parsing.
//!
//! Survey enumerators typed coordinate pairs by hand, so the cells arrive
//! with every delimiter convention imaginable: commas, runs of spaces, a
//! period doubling as the field separator, or nothing at all between the two
//! numbers. The parser imposes structure in a fixed priority order and never
//! fails hard; an unrecoverable cell yields an empty-string pair plus a
//! diagnostic.

use regex::Regex;

use crate::core::corrections::ManualCorrectionTable;
use crate::core::diagnostics::{DiagnosticSink, Severity, Stage};
use crate::types::{MilpaError, MilpaResult};

/// Splits one raw coordinate cell into (latitude, longitude) candidate tokens.
pub struct CoordinateTokenParser {
    /// Two signed decimal tokens separated by a comma or whitespace.
    pair_pattern: Regex,
    /// Two digit-only tokens separated by a single period acting as a field
    /// separator rather than a decimal mark.
    period_pattern: Regex,
    /// Two concatenated tokens where only the longitude's `-` sign marks the
    /// boundary.
    glued_pattern: Regex,
    corrections: ManualCorrectionTable,
}

impl CoordinateTokenParser {
    pub fn new(corrections: &ManualCorrectionTable) -> MilpaResult<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| MilpaError::Processing(format!("Regex error: {}", e)))
        };
        Ok(Self {
            pair_pattern: compile(r"^(-?\d+(?:\.\d+)?)(?:\s*,\s*|\s+)(-?\d+(?:\.\d+)?)$")?,
            period_pattern: compile(r"^(-?\d+)\.(-?\d+)$")?,
            glued_pattern: compile(r"^(\d+(?:\.\d+)?)(-\d+(?:\.\d+)?)$")?,
            corrections: corrections.clone(),
        })
    }

    /// Split one raw cell into a (latitude, longitude) token pair.
    ///
    /// Known-bad literal strings are substituted from the correction table
    /// before any structural matching. On unrecoverable input the empty-pair
    /// sentinel is returned and a warning diagnostic is recorded; this
    /// function never errors.
    pub fn split_coordinates(
        &self,
        raw: &str,
        row_id: Option<&str>,
        sink: &mut DiagnosticSink,
    ) -> (String, String) {
        let mut cell = raw.trim().to_string();
        if let Some(fixed) = self.corrections.lookup_string(&cell) {
            log::debug!("Correction table substitution: {:?} -> {:?}", cell, fixed);
            cell = fixed.to_string();
        }
        let cell = cell.trim_matches(|c| c == '"' || c == '\'').trim();
        if cell.is_empty() {
            return (String::new(), String::new());
        }

        if let Some(captures) = self.pair_pattern.captures(cell) {
            return (
                normalize_decimal(&captures[1]),
                normalize_decimal(&captures[2]),
            );
        }

        // Later patterns tolerate stray interior whitespace.
        let compact: String = cell.chars().filter(|c| !c.is_whitespace()).collect();
        if let Some(captures) = self.period_pattern.captures(&compact) {
            return (
                normalize_decimal(&captures[1]),
                normalize_decimal(&captures[2]),
            );
        }
        if let Some(captures) = self.glued_pattern.captures(&compact) {
            return (
                normalize_decimal(&captures[1]),
                normalize_decimal(&captures[2]),
            );
        }

        sink.push(
            Severity::Warning,
            Stage::Parse,
            row_id,
            format!("unparseable coordinate cell: {:?}", raw),
        );
        (String::new(), String::new())
    }
}

/// Repair a numeric token that lost its decimal point.
///
/// Guatemala's latitudes and longitudes always have two-digit integer parts,
/// so for an all-digit token the point goes after the first two digits
/// (after the sign for negatives). Tokens that already contain a `.`, or are
/// not purely digits, pass through unchanged.
pub fn normalize_decimal(token: &str) -> String {
    if token.contains('.') {
        return token.to_string();
    }
    let (sign, digits) = match token.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", token),
    };
    if digits.len() <= 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return token.to_string();
    }
    format!("{}{}.{}", sign, &digits[..2], &digits[2..])
}
