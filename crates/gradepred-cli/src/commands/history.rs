//! The `gradepred history` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::{GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let aggregator = workspace.load()?;
    let history = aggregator.history();

    if history.is_empty() {
        println!("No predictions yet. Run `gradepred predict` to create one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Predicted GPA", "Confidence", "Source"]);
    for p in history.iter() {
        table.add_row(vec![
            Cell::new(p.id),
            Cell::new(p.timestamp.format("%Y-%m-%d %H:%M")),
            Cell::new(format!("{:.2}", p.predicted_gpa)),
            Cell::new(format!("{}%", p.confidence)),
            Cell::new(p.source()),
        ]);
    }

    println!("{table}");
    println!("\n{} prediction(s), trend: {}", history.len(), aggregator.gpa_trend());
    Ok(())
}
