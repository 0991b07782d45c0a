//! The `gradepred update-grade` command.

use anyhow::Result;

use gradepred_core::validation::validate_grade;

use super::{ensure_valid, GlobalOpts, Workspace};

/// Fields to change on an existing grade; `None` keeps the current value.
pub struct GradePatch {
    pub id: String,
    pub course: Option<String>,
    pub grade: Option<String>,
    pub credits: Option<u32>,
    pub code: Option<String>,
    pub semester: Option<String>,
}

pub fn execute(opts: &GlobalOpts, patch: GradePatch) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let mut aggregator = workspace.load()?;

    let Some(existing) = aggregator
        .student()
        .grades
        .iter()
        .find(|g| g.id == patch.id)
    else {
        anyhow::bail!("no grade with id {}", patch.id);
    };

    let mut record = existing.clone();
    if let Some(course) = patch.course {
        record.course_name = course.trim().to_string();
    }
    if let Some(grade) = patch.grade {
        record.grade = grade.trim().to_uppercase();
    }
    if let Some(credits) = patch.credits {
        record.credits = credits;
    }
    if patch.code.is_some() {
        record.course_code = patch.code;
    }
    if patch.semester.is_some() {
        record.semester = patch.semester;
    }
    ensure_valid(&validate_grade(&record))?;

    let name = record.course_name.clone();
    let Some(student) = aggregator.update_grade(record) else {
        anyhow::bail!("no grade with id {}", patch.id);
    };
    println!("Updated {name}");
    println!(
        "GPA: {:.2}  CWA: {:.1}  Credits: {}",
        student.current_gpa, student.current_cwa, student.total_credits
    );

    workspace.save(&aggregator)
}
