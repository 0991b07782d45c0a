//! The `gradepred health` command.

use anyhow::Result;

use gradepred_remote::config::create_predictor;

use super::{GlobalOpts, Workspace};

pub async fn execute(opts: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let remote = workspace.remote()?;

    let predictor = create_predictor(remote)?;
    let health = predictor.health().await?;

    match &health.backend {
        Some(backend) => println!("{}: {} ({backend})", remote.base_url, health.status),
        None => println!("{}: {}", remote.base_url, health.status),
    }
    if let Some(ts) = &health.timestamp {
        println!("Server time: {ts}");
    }
    Ok(())
}
