//! Core data model types for gradepred.
//!
//! Stored types (`StudentData`, `GradeRecord`, `PredictionRecord`) keep the
//! field names of the persisted JSON documents, so files written by earlier
//! versions of the app load unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single recorded course grade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    /// Unique identifier, assigned at creation. Older documents stored
    /// numeric ids; those are read back as their decimal text.
    #[serde(deserialize_with = "id_from_text_or_number")]
    pub id: String,
    /// Course name (non-empty).
    pub course_name: String,
    /// Optional course code (e.g. "CS 101").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    /// Letter grade, expected to be a key of the grade-point table.
    pub grade: String,
    /// Credit hours.
    pub credits: u32,
    /// Optional semester label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// Where the record came from ("manual" or "prediction").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl GradeRecord {
    /// Create a new manually entered record with a fresh id and timestamp.
    pub fn new(course_name: impl Into<String>, grade: impl Into<String>, credits: u32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_name: course_name.into(),
            course_code: None,
            grade: grade.into(),
            credits,
            semester: None,
            timestamp: Utc::now(),
            source: Some("manual".to_string()),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.course_code = Some(code.into());
        self
    }

    pub fn with_semester(mut self, semester: impl Into<String>) -> Self {
        self.semester = Some(semester.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

fn id_from_text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

/// The per-user aggregate of grades and the values derived from them.
///
/// `current_gpa`, `current_cwa` and `total_credits` are derived; they are
/// stored so the JSON document is self-describing, but they are always
/// recomputed from `grades` by the aggregator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentData {
    #[serde(default)]
    pub grades: Vec<GradeRecord>,
    #[serde(default)]
    pub current_gpa: f64,
    #[serde(default)]
    pub current_cwa: f64,
    #[serde(default)]
    pub total_credits: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A loosely typed numeric field: a JSON number or a numeric string.
///
/// The original request is echoed back verbatim in prediction records, so the
/// representation the caller used is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Lenient numeric value; `NaN` when the text has no numeric prefix.
    pub fn value(&self) -> f64 {
        match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => parse_lenient(s),
        }
    }
}

impl From<f64> for Numeric {
    fn from(n: f64) -> Self {
        Numeric::Number(n)
    }
}

impl From<&str> for Numeric {
    fn from(s: &str) -> Self {
        Numeric::Text(s.to_string())
    }
}

/// Parse the longest leading decimal number of `s`, ignoring leading
/// whitespace and trailing garbage. Returns `NaN` when there is none.
///
/// `"3.5"` → 3.5, `" 12abc"` → 12.0, `".5"` → 0.5, `"-Infinity"` → -inf,
/// `"abc"` → NaN.
pub fn parse_lenient(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut saw_digit = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let mut frac = end + 1;
        while frac < bytes.len() && bytes[frac].is_ascii_digit() {
            frac += 1;
        }
        saw_digit |= frac > end + 1;
        if saw_digit {
            end = frac;
        }
    }

    if !saw_digit {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_digits = exp;
        while exp < bytes.len() && bytes[exp].is_ascii_digit() {
            exp += 1;
        }
        if exp > exp_digits {
            end = exp;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// A course entry supplied alongside a prediction request.
///
/// `grade` is a numeric score (a percentage), not a letter grade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseScore {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<Numeric>,
    #[serde(default, alias = "credit", skip_serializing_if = "Option::is_none")]
    pub credits: Option<Numeric>,
}

impl CourseScore {
    pub fn new(name: impl Into<String>, grade: impl Into<Numeric>, credits: u32) -> Self {
        Self {
            name: Some(name.into()),
            grade: Some(grade.into()),
            credits: Some(Numeric::Number(f64::from(credits))),
        }
    }
}

/// Parameters of a prediction request. Also the JSON body sent to the
/// remote predictor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_gpa: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_gpa: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_hours: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<Numeric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<Vec<CourseScore>>,
}

/// Which path produced a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Remote,
    Fallback,
}

impl fmt::Display for PredictionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionSource::Remote => write!(f, "remote"),
            PredictionSource::Fallback => write!(f, "fallback"),
        }
    }
}

impl FromStr for PredictionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "remote" | "backend" => Ok(PredictionSource::Remote),
            "fallback" | "local" => Ok(PredictionSource::Fallback),
            other => Err(format!("unknown prediction source: {other}")),
        }
    }
}

/// A stored prediction. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Creation-time-derived id (Unix milliseconds, bumped to stay unique).
    pub id: u64,
    pub predicted_gpa: f64,
    /// Integer percentage in `[0, 100]`.
    pub confidence: u8,
    #[serde(default)]
    pub insights: Vec<String>,
    /// The request that produced this prediction.
    #[serde(rename = "inputData")]
    pub input_data: PredictionInput,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "isFallback", default)]
    pub is_fallback: bool,
}

impl PredictionRecord {
    pub fn source(&self) -> PredictionSource {
        if self.is_fallback {
            PredictionSource::Fallback
        } else {
            PredictionSource::Remote
        }
    }
}
