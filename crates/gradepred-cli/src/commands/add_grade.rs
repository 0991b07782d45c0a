//! The `gradepred add-grade` command.

use anyhow::Result;

use gradepred_core::validation::validate_grade;
use gradepred_core::GradeRecord;

use super::{ensure_valid, GlobalOpts, Workspace};

pub fn execute(
    opts: &GlobalOpts,
    course: String,
    grade: String,
    credits: u32,
    code: Option<String>,
    semester: Option<String>,
) -> Result<()> {
    let mut record = GradeRecord::new(course.trim(), grade.trim().to_uppercase(), credits);
    if let Some(code) = code {
        record = record.with_code(code);
    }
    if let Some(semester) = semester {
        record = record.with_semester(semester);
    }
    ensure_valid(&validate_grade(&record))?;

    let workspace = Workspace::open(opts)?;
    let mut aggregator = workspace.load()?;

    let id = record.id.clone();
    let summary = format!("{} ({}, {} credits)", record.course_name, record.grade, credits);
    let student = aggregator.add_grade(record);
    println!("Added {summary} [{id}]");
    println!(
        "GPA: {:.2}  CWA: {:.1}  Credits: {}",
        student.current_gpa, student.current_cwa, student.total_credits
    );

    workspace.save(&aggregator)
}
