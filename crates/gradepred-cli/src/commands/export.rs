//! The `gradepred export` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradepred_core::export_prediction;

use super::{GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts, id: u64, out: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let aggregator = workspace.load()?;

    let prediction = aggregator
        .history()
        .get(id)
        .with_context(|| format!("no prediction with id {id}"))?;
    let json = serde_json::to_string_pretty(&export_prediction(prediction))?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write export to {}", path.display()))?;
            println!("Exported prediction {id} to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
