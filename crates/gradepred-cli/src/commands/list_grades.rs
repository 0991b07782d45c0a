//! The `gradepred list-grades` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let aggregator = workspace.load()?;
    let student = aggregator.student();

    if student.grades.is_empty() {
        println!("No grades recorded yet. Add one with `gradepred add-grade`.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID", "Course", "Code", "Grade", "Credits", "Semester", "Source",
    ]);
    for g in &student.grades {
        table.add_row(vec![
            Cell::new(&g.id),
            Cell::new(&g.course_name),
            Cell::new(g.course_code.as_deref().unwrap_or("-")),
            Cell::new(&g.grade),
            Cell::new(g.credits),
            Cell::new(g.semester.as_deref().unwrap_or("-")),
            Cell::new(g.source.as_deref().unwrap_or("manual")),
        ]);
    }

    println!("{table}");
    println!(
        "\nGPA: {:.2}  CWA: {:.1}  Credits: {}",
        student.current_gpa, student.current_cwa, student.total_credits
    );
    Ok(())
}
