//! The `gradepred stats` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradepred_core::insights::{academic_recommendations, standing_insights};

use super::{GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let aggregator = workspace.load()?;
    let stats = aggregator.computed_stats();

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Courses"), Cell::new(stats.total_courses)]);
    table.add_row(vec![Cell::new("Credits"), Cell::new(stats.total_credits)]);
    table.add_row(vec![
        Cell::new("GPA"),
        Cell::new(format!("{:.2}", stats.current_gpa)),
    ]);
    table.add_row(vec![
        Cell::new("CWA"),
        Cell::new(format!("{:.1}", stats.current_cwa)),
    ]);
    table.add_row(vec![
        Cell::new("Semester GPA"),
        Cell::new(format!("{:.2}", stats.semester_gpa)),
    ]);
    table.add_row(vec![
        Cell::new("Avg credits/course"),
        Cell::new(format!("{:.1}", stats.average_credits_per_course)),
    ]);
    table.add_row(vec![
        Cell::new("Prediction trend"),
        Cell::new(aggregator.gpa_trend()),
    ]);
    println!("{table}");

    if stats.total_courses == 0 {
        println!("\nAdd grades to see insights and recommendations.");
        return Ok(());
    }

    println!("\nInsights:");
    for insight in standing_insights(stats.current_gpa) {
        println!("  - {insight}");
    }
    println!("\nRecommendations:");
    for rec in academic_recommendations(stats.current_gpa) {
        println!("  - {rec}");
    }
    Ok(())
}
