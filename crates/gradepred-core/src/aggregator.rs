//! The academic record aggregator.
//!
//! Owns a student's grades and prediction history and keeps the derived
//! GPA, CWA and credit totals consistent. Every grade mutation recomputes
//! the derived values from scratch over the full grade list.

use std::collections::HashSet;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::PredictorError;
use crate::grading::{grade_points, percentage_to_letter, round_to, CWA_SCALE};
use crate::history::{GpaTrend, PredictionHistory};
use crate::model::{CourseScore, GradeRecord, Numeric, PredictionInput, StudentData};
use crate::predictor::{PredictionOutcome, PredictionService};
use crate::traits::RemotePredictor;

/// Totals derived from a list of grades.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeSummary {
    pub total_points: f64,
    pub total_credits: u64,
    /// Rounded to 2 decimals; 0 without credits.
    pub gpa: f64,
    /// `round(gpa * 25, 1)`; 0 without credits.
    pub cwa: f64,
}

/// Compute totals, GPA and CWA for `grades`.
pub fn summarize<'a>(grades: impl IntoIterator<Item = &'a GradeRecord>) -> GradeSummary {
    let (total_points, total_credits) = grades.into_iter().fold((0.0, 0u64), |(pts, cr), g| {
        (
            pts + grade_points(&g.grade) * f64::from(g.credits),
            cr.saturating_add(u64::from(g.credits)),
        )
    });

    let (gpa, cwa) = if total_credits > 0 {
        let gpa = round_to(total_points / total_credits as f64, 2);
        (gpa, round_to(gpa * CWA_SCALE, 1))
    } else {
        (0.0, 0.0)
    };

    GradeSummary {
        total_points,
        total_credits,
        gpa,
        cwa,
    }
}

/// Display statistics derived from a student's grades.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicStats {
    pub total_courses: usize,
    pub total_credits: u64,
    pub current_gpa: f64,
    pub current_cwa: f64,
    /// GPA over the grades that carry a semester label.
    pub semester_gpa: f64,
    pub average_credits_per_course: f64,
}

/// Maintains `StudentData` and `PredictionHistory` for one student.
///
/// Mutations take `&mut self`, so two of them can never interleave on the
/// same aggregate.
#[derive(Debug, Clone, Default)]
pub struct AcademicRecordAggregator {
    student: StudentData,
    history: PredictionHistory,
}

impl AcademicRecordAggregator {
    /// Wrap previously loaded state. Derived fields are recomputed so
    /// stale or hand-edited totals do not survive loading.
    pub fn new(student: StudentData, history: PredictionHistory) -> Self {
        let mut aggregator = Self { student, history };
        aggregator.apply_summary();
        aggregator
    }

    pub fn student(&self) -> &StudentData {
        &self.student
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn into_parts(self) -> (StudentData, PredictionHistory) {
        (self.student, self.history)
    }

    fn apply_summary(&mut self) {
        let summary = summarize(&self.student.grades);
        self.student.current_gpa = summary.gpa;
        self.student.current_cwa = summary.cwa;
        self.student.total_credits = summary.total_credits;
    }

    fn touch(&mut self) {
        self.apply_summary();
        self.student.last_updated = Some(Utc::now());
    }

    /// Append a grade and recompute.
    pub fn add_grade(&mut self, record: GradeRecord) -> &StudentData {
        tracing::debug!(id = %record.id, course = %record.course_name, "adding grade");
        self.student.grades.push(record);
        self.touch();
        &self.student
    }

    /// Replace the grade with the same id in place and recompute.
    /// Returns `None`, leaving state untouched, if no grade has that id.
    pub fn update_grade(&mut self, record: GradeRecord) -> Option<&StudentData> {
        let slot = self.student.grades.iter_mut().find(|g| g.id == record.id)?;
        *slot = record;
        self.touch();
        Some(&self.student)
    }

    /// Remove every grade whose id is in `ids` and recompute.
    pub fn delete_grades(&mut self, ids: &HashSet<String>) -> &StudentData {
        let before = self.student.grades.len();
        self.student.grades.retain(|g| !ids.contains(&g.id));
        tracing::debug!(
            removed = before - self.student.grades.len(),
            "deleted grades"
        );
        self.touch();
        &self.student
    }

    /// Turn prediction-input courses into grade records.
    ///
    /// Courses need a name, a numeric percentage and numeric credits; names
    /// already recorded (case-insensitive) are skipped.
    pub fn import_course_scores(&mut self, courses: &[CourseScore]) -> &StudentData {
        let mut known: HashSet<String> = self
            .student
            .grades
            .iter()
            .map(|g| g.course_name.to_lowercase())
            .collect();

        let mut imported = 0usize;
        for course in courses {
            let Some(record) = course_to_grade(course) else {
                continue;
            };
            if !known.insert(record.course_name.to_lowercase()) {
                continue;
            }
            self.student.grades.push(record);
            imported += 1;
        }

        if imported > 0 {
            tracing::info!(imported, "imported courses from prediction input");
            self.touch();
        }
        &self.student
    }

    /// Request a prediction and prepend the result to the history.
    ///
    /// The remote path is tried first when `service` has one; any failure
    /// yields a fallback record. Exactly one record is appended either way.
    pub async fn request_prediction(
        &mut self,
        service: &PredictionService,
        input: PredictionInput,
    ) -> PredictionOutcome {
        let id = self.history.next_id(Utc::now());
        let outcome = service.predict(&input, id).await;
        self.history.prepend(outcome.record().clone());
        outcome
    }

    /// Pull the service's copy of the student data and prediction history.
    ///
    /// Student data is overlaid field by field on the local document and the
    /// derived totals are recomputed; the history is replaced wholesale. A
    /// part the service answers with an error status is left alone. Transport
    /// failures and unusable bodies abort the sync with local state unchanged.
    pub async fn sync_from(
        &mut self,
        remote: &dyn RemotePredictor,
    ) -> Result<SyncReport, PredictorError> {
        let student = match remote.fetch_student_data().await {
            Ok(fields) => Some(merge_student_data(&self.student, fields)?),
            Err(e) if e.is_transport() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "student data not synced");
                None
            }
        };

        let history = match remote.fetch_predictions().await {
            Ok(history) => Some(history),
            Err(e) if e.is_transport() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "prediction history not synced");
                None
            }
        };

        let report = SyncReport {
            student_data: student.is_some(),
            predictions: history.as_ref().map(PredictionHistory::len),
        };
        if let Some(student) = student {
            self.student = student;
            self.apply_summary();
        }
        if let Some(history) = history {
            self.history = history;
        }
        tracing::info!(?report, "synced with remote");
        Ok(report)
    }

    /// Remove predictions by id. Returns how many were removed.
    pub fn delete_predictions(&mut self, ids: &HashSet<u64>) -> usize {
        self.history.delete_by_ids(ids)
    }

    pub fn gpa_trend(&self) -> GpaTrend {
        self.history.trend()
    }

    pub fn computed_stats(&self) -> AcademicStats {
        let grades = &self.student.grades;
        let total_courses = grades.len();
        let semester = summarize(grades.iter().filter(|g| g.semester.is_some()));

        AcademicStats {
            total_courses,
            total_credits: self.student.total_credits,
            current_gpa: self.student.current_gpa,
            current_cwa: self.student.current_cwa,
            semester_gpa: semester.gpa,
            average_credits_per_course: if total_courses > 0 {
                round_to(self.student.total_credits as f64 / total_courses as f64, 1)
            } else {
                0.0
            },
        }
    }
}

/// What [`AcademicRecordAggregator::sync_from`] took from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub student_data: bool,
    /// Size of the replacing history, if one was received.
    pub predictions: Option<usize>,
}

fn merge_student_data(
    local: &StudentData,
    fields: serde_json::Map<String, serde_json::Value>,
) -> Result<StudentData, PredictorError> {
    let malformed =
        |e: serde_json::Error| PredictorError::MalformedResponse(format!("student data: {e}"));

    let mut merged = match serde_json::to_value(local).map_err(malformed)? {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    merged.extend(fields);
    serde_json::from_value(serde_json::Value::Object(merged)).map_err(malformed)
}

fn course_to_grade(course: &CourseScore) -> Option<GradeRecord> {
    let name = course.name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    let percentage = course.grade.as_ref().map(Numeric::value).filter(|p| !p.is_nan())?;
    let credits = course
        .credits
        .as_ref()
        .map(Numeric::value)
        .filter(|c| (1.0..=f64::from(u32::MAX)).contains(c))?;

    Some(
        GradeRecord::new(name, percentage_to_letter(percentage), credits.trunc() as u32)
            .with_source("prediction"),
    )
}
