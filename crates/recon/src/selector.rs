//! Name-column detection.
//!
//! Three rules, first hit wins:
//! 1. a header equal (ignoring case) to a vocabulary term,
//! 2. a header containing a vocabulary term,
//! 3. the first text column, other than the timepoint column, whose first
//!    ten non-missing values average 5 to 100 characters.

use serde::Serialize;

use crate::error::ReconError;
use crate::model::{is_missing, Record};

pub const NAME_VOCABULARY: [&str; 8] = [
    "name",
    "full_name",
    "fullname",
    "participant_name",
    "participant",
    "person",
    "individual",
    "client",
];

const SAMPLE_SIZE: usize = 10;
const MIN_MEAN_LEN: f64 = 5.0;
const MAX_MEAN_LEN: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionRule {
    /// Set explicitly in config; detection skipped.
    Configured,
    ExactName,
    PartialName,
    SampledLength,
}

impl std::fmt::Display for DetectionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configured => write!(f, "configured"),
            Self::ExactName => write!(f, "exact_name"),
            Self::PartialName => write!(f, "partial_name"),
            Self::SampledLength => write!(f, "sampled_length"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnChoice {
    pub column: String,
    pub rule: DetectionRule,
}

/// Pick the key column. See [`detect_name_column`] for the rule that fired.
pub fn select_name_column(
    headers: &[String],
    rows: &[Record],
    timepoint_column: &str,
    missing_sentinel: &str,
) -> Result<String, ReconError> {
    detect_name_column(headers, rows, timepoint_column, missing_sentinel).map(|c| c.column)
}

pub fn detect_name_column(
    headers: &[String],
    rows: &[Record],
    timepoint_column: &str,
    missing_sentinel: &str,
) -> Result<ColumnChoice, ReconError> {
    let choice = |column: &String, rule| ColumnChoice {
        column: column.clone(),
        rule,
    };

    if let Some(h) = headers
        .iter()
        .find(|h| NAME_VOCABULARY.contains(&h.to_lowercase().as_str()))
    {
        log::debug!("name column '{h}' matched vocabulary exactly");
        return Ok(choice(h, DetectionRule::ExactName));
    }

    if let Some(h) = headers.iter().find(|h| {
        let lower = h.to_lowercase();
        NAME_VOCABULARY.iter().any(|term| lower.contains(term))
    }) {
        log::debug!("name column '{h}' contains a vocabulary term");
        return Ok(choice(h, DetectionRule::PartialName));
    }

    let timepoint_lower = timepoint_column.to_lowercase();
    for (idx, h) in headers.iter().enumerate() {
        if h.to_lowercase() == timepoint_lower {
            continue;
        }
        if !is_text_column(rows, idx, missing_sentinel) {
            continue;
        }
        if let Some(mean) = sample_mean_len(rows, idx, missing_sentinel) {
            if (MIN_MEAN_LEN..=MAX_MEAN_LEN).contains(&mean) {
                log::debug!("name column '{h}' picked by sample length (mean {mean:.1})");
                return Ok(choice(h, DetectionRule::SampledLength));
            }
        }
    }

    Err(ReconError::NoSuitableColumn {
        columns: headers.to_vec(),
    })
}

/// A column is text when it has at least one non-missing value and not every
/// non-missing value parses as a number.
fn is_text_column(rows: &[Record], idx: usize, missing_sentinel: &str) -> bool {
    rows.iter()
        .map(|r| r.value(idx))
        .filter(|v| !is_missing(v, missing_sentinel))
        .any(|v| v.trim().parse::<f64>().is_err())
}

/// Mean character length of the first ten non-missing values.
fn sample_mean_len(rows: &[Record], idx: usize, missing_sentinel: &str) -> Option<f64> {
    let lens: Vec<usize> = rows
        .iter()
        .map(|r| r.value(idx))
        .filter(|v| !is_missing(v, missing_sentinel))
        .take(SAMPLE_SIZE)
        .map(|v| v.chars().count())
        .collect();

    if lens.is_empty() {
        return None;
    }
    Some(lens.iter().sum::<usize>() as f64 / lens.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn rows(data: &[&[&str]]) -> Vec<Record> {
        data.iter()
            .enumerate()
            .map(|(i, r)| Record::new(i, r.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn exact_match_ignores_case() {
        let h = headers(&["Timepoint", "ID", "NAME"]);
        let choice = detect_name_column(&h, &[], "Timepoint", "nan").unwrap();
        assert_eq!(choice.column, "NAME");
        assert_eq!(choice.rule, DetectionRule::ExactName);
    }

    #[test]
    fn exact_match_beats_earlier_partial_match() {
        // "Name of village" contains "name" and comes first, but "Client" is exact
        let h = headers(&["Name of village", "Client"]);
        let choice = detect_name_column(&h, &[], "Timepoint", "nan").unwrap();
        assert_eq!(choice.column, "Client");
        assert_eq!(choice.rule, DetectionRule::ExactName);
    }

    #[test]
    fn partial_match_in_declared_order() {
        let h = headers(&["Timepoint", "Respondent Name", "Person_ID"]);
        let choice = detect_name_column(&h, &[], "Timepoint", "nan").unwrap();
        assert_eq!(choice.column, "Respondent Name");
        assert_eq!(choice.rule, DetectionRule::PartialName);
    }

    #[test]
    fn fallback_uses_sample_length() {
        let h = headers(&["Timepoint", "Code", "Age", "Respondent"]);
        let r = rows(&[
            &["Baseline", "AB", "34", "Maria Lopez"],
            &["Endline", "CD", "41", "Tom Okafor"],
        ]);
        let choice = detect_name_column(&h, &r, "Timepoint", "nan").unwrap();
        // "Code" is text but averages 2 chars; "Age" is numeric
        assert_eq!(choice.column, "Respondent");
        assert_eq!(choice.rule, DetectionRule::SampledLength);
    }

    #[test]
    fn fallback_skips_timepoint_column() {
        let h = headers(&["timepoint", "Who"]);
        let r = rows(&[&["Baseline", "Anna Berg"], &["Endline", "Anna Berg"]]);
        let column = select_name_column(&h, &r, "Timepoint", "nan").unwrap();
        assert_eq!(column, "Who");
    }

    #[test]
    fn fallback_ignores_missing_values_in_sample() {
        let h = headers(&["Timepoint", "Who"]);
        let r = rows(&[
            &["Baseline", ""],
            &["Baseline", "NaN"],
            &["Endline", "Grace Hopper"],
        ]);
        let column = select_name_column(&h, &r, "Timepoint", "nan").unwrap();
        assert_eq!(column, "Who");
    }

    #[test]
    fn fallback_only_samples_first_ten() {
        let h = headers(&["Timepoint", "Note"]);
        let mut data: Vec<Vec<String>> = (0..10)
            .map(|_| vec!["Baseline".to_string(), "ab".to_string()])
            .collect();
        data.push(vec!["Endline".into(), "x".repeat(500)]);
        let r: Vec<Record> = data
            .into_iter()
            .enumerate()
            .map(|(i, v)| Record::new(i, v))
            .collect();
        let err = select_name_column(&h, &r, "Timepoint", "nan").unwrap_err();
        assert!(matches!(err, ReconError::NoSuitableColumn { .. }));
    }

    #[test]
    fn fallback_rejects_overlong_text() {
        let h = headers(&["Timepoint", "Comment"]);
        let long = "y".repeat(101);
        let r = vec![Record::new(0, vec!["Baseline".into(), long])];
        assert!(select_name_column(&h, &r, "Timepoint", "nan").is_err());
    }

    #[test]
    fn no_suitable_column() {
        let h = headers(&["Timepoint", "Score"]);
        let r = rows(&[&["Baseline", "12.5"], &["Endline", "13"]]);
        let err = select_name_column(&h, &r, "Timepoint", "nan").unwrap_err();
        assert_eq!(
            err.to_string(),
            "could not detect a name column among [Timepoint, Score]"
        );
    }
}
