//! The `gradepred delete-grades` command.

use std::collections::HashSet;

use anyhow::Result;

use super::{split_ids, GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts, ids: String) -> Result<()> {
    let ids: HashSet<String> = split_ids(&ids).into_iter().collect();
    anyhow::ensure!(!ids.is_empty(), "no grade ids given");

    let workspace = Workspace::open(opts)?;
    let mut aggregator = workspace.load()?;

    let before = aggregator.student().grades.len();
    let student = aggregator.delete_grades(&ids);
    let removed = before - student.grades.len();

    println!("Deleted {removed} grade(s)");
    println!(
        "GPA: {:.2}  CWA: {:.1}  Credits: {}",
        student.current_gpa, student.current_cwa, student.total_credits
    );
    if removed < ids.len() {
        tracing::warn!(
            unknown = ids.len() - removed,
            "some ids did not match any grade"
        );
    }

    workspace.save(&aggregator)
}
