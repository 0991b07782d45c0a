//! Input validation for grades and prediction requests.
//!
//! The aggregator itself is lenient; callers run these checks before
//! mutating state and decide what to do with the issues.

use std::fmt;

use crate::grading::{is_known_grade, MAX_GPA, MIN_GPA};
use crate::model::{GradeRecord, Numeric, PredictionInput};

pub const MIN_COURSE_NAME_LENGTH: usize = 1;
pub const MAX_COURSE_NAME_LENGTH: usize = 100;
pub const MIN_CREDITS: u32 = 1;
pub const MAX_CREDITS: u32 = 6;
pub const MAX_STUDY_HOURS: f64 = 168.0;
pub const MAX_ATTENDANCE: f64 = 100.0;

/// A single validation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Field the issue applies to.
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Join issues into one line, e.g. for an error message.
pub fn describe(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check a grade record before it is added or used as a replacement.
pub fn validate_grade(record: &GradeRecord) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let name_len = record.course_name.trim().chars().count();
    if !(MIN_COURSE_NAME_LENGTH..=MAX_COURSE_NAME_LENGTH).contains(&name_len) {
        issues.push(ValidationIssue::new(
            "courseName",
            format!(
                "course name is required and must be between {MIN_COURSE_NAME_LENGTH} and {MAX_COURSE_NAME_LENGTH} characters"
            ),
        ));
    }

    if !is_known_grade(&record.grade) {
        issues.push(ValidationIssue::new(
            "grade",
            format!("'{}' is not a valid letter grade", record.grade),
        ));
    }

    if !(MIN_CREDITS..=MAX_CREDITS).contains(&record.credits) {
        issues.push(ValidationIssue::new(
            "credits",
            format!("credits must be between {MIN_CREDITS} and {MAX_CREDITS}"),
        ));
    }

    issues
}

fn check_range(
    issues: &mut Vec<ValidationIssue>,
    field: &'static str,
    value: Option<&Numeric>,
    max: f64,
    unit: &str,
) {
    let Some(value) = value.map(Numeric::value) else {
        return;
    };
    if value.is_nan() || !(0.0..=max).contains(&value) {
        issues.push(ValidationIssue::new(
            field,
            format!("must be a number between 0 and {max}{unit}"),
        ));
    }
}

/// Check a prediction request.
pub fn validate_prediction_input(input: &PredictionInput) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    match input.current_gpa.as_ref().map(Numeric::value) {
        None => issues.push(ValidationIssue::new(
            "current_gpa",
            "current GPA is required",
        )),
        Some(gpa) if gpa.is_nan() => issues.push(ValidationIssue::new(
            "current_gpa",
            "current GPA must be a number",
        )),
        Some(gpa) if !(MIN_GPA..=MAX_GPA).contains(&gpa) => issues.push(ValidationIssue::new(
            "current_gpa",
            format!("current GPA must be between {MIN_GPA} and {MAX_GPA}"),
        )),
        Some(_) => {}
    }

    check_range(
        &mut issues,
        "study_hours",
        input.study_hours.as_ref(),
        MAX_STUDY_HOURS,
        " hours",
    );
    check_range(
        &mut issues,
        "attendance",
        input.attendance.as_ref(),
        MAX_ATTENDANCE,
        "%",
    );

    issues
}
