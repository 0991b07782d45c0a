//! Local fallback prediction heuristic.
//!
//! Used whenever no remote prediction is available. Every adjustment band is
//! evaluated first-match-wins in the listed order, and values that do not
//! parse (NaN) fall through every band unchanged.

use chrono::{DateTime, Utc};

use crate::grading::{MAX_GPA, MIN_GPA};
use crate::model::{Numeric, PredictionInput, PredictionRecord};

/// Base score used when `current_gpa` is missing, unparseable or zero.
pub const DEFAULT_BASE_SCORE: f64 = 3.0;

/// Fixed confidence reported for fallback predictions.
pub const FALLBACK_CONFIDENCE: u8 = 75;

pub const FALLBACK_INSIGHTS: [&str; 3] = [
    "This prediction was generated offline using a simplified algorithm.",
    "It only considers your current GPA, study hours, attendance and course scores.",
    "Connect to the prediction service for a more accurate estimate.",
];

fn value_of(field: &Option<Numeric>) -> Option<f64> {
    field.as_ref().map(Numeric::value)
}

/// Study-hours adjustment: `>20 +0.2`, `>15 +0.1`, `<10 -0.1`.
pub fn study_hours_adjustment(hours: f64) -> f64 {
    if hours > 20.0 {
        0.2
    } else if hours > 15.0 {
        0.1
    } else if hours < 10.0 {
        -0.1
    } else {
        0.0
    }
}

/// Attendance adjustment: `>90 +0.15`, `>80 +0.1`, `<70 -0.1`.
pub fn attendance_adjustment(attendance: f64) -> f64 {
    if attendance > 90.0 {
        0.15
    } else if attendance > 80.0 {
        0.1
    } else if attendance < 70.0 {
        -0.1
    } else {
        0.0
    }
}

/// Course-performance adjustment on the mean course score:
/// `>80 +0.1`, `<60 -0.1`.
pub fn course_adjustment(average: f64) -> f64 {
    if average > 80.0 {
        0.1
    } else if average < 60.0 {
        -0.1
    } else {
        0.0
    }
}

/// Unclamped score for an input, before wrapping as a record.
pub fn fallback_score(input: &PredictionInput) -> f64 {
    let mut score = value_of(&input.current_gpa)
        .filter(|gpa| !gpa.is_nan() && *gpa != 0.0)
        .unwrap_or(DEFAULT_BASE_SCORE);

    if let Some(hours) = value_of(&input.study_hours) {
        score += study_hours_adjustment(hours);
    }

    if let Some(attendance) = value_of(&input.attendance) {
        score += attendance_adjustment(attendance);
    }

    if let Some(courses) = input.courses.as_deref().filter(|c| !c.is_empty()) {
        let total: f64 = courses
            .iter()
            .map(|c| course_score(&c.grade))
            .sum();
        score += course_adjustment(total / courses.len() as f64);
    }

    score
}

/// A missing or blank course score counts as 0.
fn course_score(grade: &Option<Numeric>) -> f64 {
    match grade {
        Some(Numeric::Text(s)) if s.trim().is_empty() => 0.0,
        other => value_of(other).unwrap_or(0.0),
    }
}

/// Produce a fallback prediction record for `input`.
pub fn fallback_prediction(
    input: &PredictionInput,
    id: u64,
    timestamp: DateTime<Utc>,
) -> PredictionRecord {
    let predicted_gpa = fallback_score(input).clamp(MIN_GPA, MAX_GPA);

    PredictionRecord {
        id,
        predicted_gpa,
        confidence: FALLBACK_CONFIDENCE,
        insights: FALLBACK_INSIGHTS.iter().map(|s| s.to_string()).collect(),
        input_data: input.clone(),
        timestamp,
        is_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CourseScore;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn input(gpa: impl Into<Numeric>) -> PredictionInput {
        PredictionInput {
            current_gpa: Some(gpa.into()),
            ..Default::default()
        }
    }

    #[test]
    fn study_and_attendance_bonus() {
        let mut req = input(3.0);
        req.study_hours = Some(25.0.into());
        req.attendance = Some(95.0.into());

        let record = fallback_prediction(&req, 1, Utc::now());
        assert!(approx(record.predicted_gpa, 3.35));
        assert_eq!(record.confidence, 75);
        assert!(record.is_fallback);
        assert_eq!(record.insights.len(), 3);
        assert_eq!(record.input_data, req);
    }

    #[test]
    fn unparseable_gpa_uses_default() {
        assert!(approx(fallback_score(&input("abc")), 3.0));
        assert!(approx(fallback_score(&PredictionInput::default()), 3.0));
        assert!(approx(fallback_score(&input(0.0)), 3.0));
        assert!(approx(fallback_score(&input("2.5")), 2.5));
    }

    #[test]
    fn bands_are_first_match_wins() {
        assert_eq!(study_hours_adjustment(21.0), 0.2);
        assert_eq!(study_hours_adjustment(20.0), 0.1);
        assert_eq!(study_hours_adjustment(15.0), 0.0);
        assert_eq!(study_hours_adjustment(10.0), 0.0);
        assert_eq!(study_hours_adjustment(9.9), -0.1);
        assert_eq!(study_hours_adjustment(f64::NAN), 0.0);

        assert_eq!(attendance_adjustment(91.0), 0.15);
        assert_eq!(attendance_adjustment(90.0), 0.1);
        assert_eq!(attendance_adjustment(75.0), 0.0);
        assert_eq!(attendance_adjustment(69.0), -0.1);
        assert_eq!(attendance_adjustment(f64::NAN), 0.0);
    }

    #[test]
    fn course_average_adjusts_score() {
        let mut req = input(3.0);
        req.courses = Some(vec![
            CourseScore::new("Math", "85", 3),
            CourseScore::new("Physics", "90", 4),
        ]);
        assert!(approx(fallback_score(&req), 3.1));

        req.courses = Some(vec![CourseScore::new("Chemistry", "50", 3)]);
        assert!(approx(fallback_score(&req), 2.9));

        req.courses = Some(vec![]);
        assert!(approx(fallback_score(&req), 3.0));
    }

    #[test]
    fn unparseable_course_score_skips_adjustment() {
        let mut req = input(3.0);
        req.courses = Some(vec![
            CourseScore::new("Math", "95", 3),
            CourseScore::new("Art", "n/a", 2),
        ]);
        assert!(approx(fallback_score(&req), 3.0));
    }

    #[test]
    fn missing_course_score_counts_as_zero() {
        let mut req = input(3.0);
        req.courses = Some(vec![CourseScore {
            name: Some("Music".into()),
            grade: None,
            credits: None,
        }]);
        assert!(approx(fallback_score(&req), 2.9));
    }

    #[test]
    fn blank_course_score_counts_as_zero() {
        for blank in ["", "   "] {
            let mut req = input(3.0);
            req.courses = Some(vec![CourseScore::new("Music", blank, 2)]);
            assert!(approx(fallback_score(&req), 2.9), "grade {blank:?}");
        }
    }

    #[test]
    fn infinite_gpa_text_clamps_to_scale_ends() {
        let req = input("Infinity");
        assert_eq!(fallback_prediction(&req, 1, Utc::now()).predicted_gpa, 4.0);

        let req = input("-Infinity");
        assert_eq!(fallback_prediction(&req, 1, Utc::now()).predicted_gpa, 0.0);
    }

    #[test]
    fn prediction_is_clamped() {
        let mut req = input(3.95);
        req.study_hours = Some(40.0.into());
        req.attendance = Some(100.0.into());
        assert_eq!(fallback_prediction(&req, 1, Utc::now()).predicted_gpa, 4.0);

        let mut req = input(-12.0);
        req.study_hours = Some(1.0.into());
        assert_eq!(fallback_prediction(&req, 1, Utc::now()).predicted_gpa, 0.0);

        let req = input(1e9);
        assert_eq!(fallback_prediction(&req, 1, Utc::now()).predicted_gpa, 4.0);
    }
}
