//! The `gradepred delete-predictions` command.

use std::collections::HashSet;

use anyhow::{Context, Result};

use super::{split_ids, GlobalOpts, Workspace};

pub fn execute(opts: &GlobalOpts, ids: String) -> Result<()> {
    let ids = split_ids(&ids)
        .iter()
        .map(|id| {
            id.parse::<u64>()
                .with_context(|| format!("invalid prediction id: {id}"))
        })
        .collect::<Result<HashSet<u64>>>()?;
    anyhow::ensure!(!ids.is_empty(), "no prediction ids given");

    let workspace = Workspace::open(opts)?;
    let mut aggregator = workspace.load()?;

    let removed = aggregator.delete_predictions(&ids);
    println!(
        "Deleted {removed} prediction(s), {} remaining",
        aggregator.history().len()
    );

    workspace.save(&aggregator)
}
