//! The `gradepred sync` command.

use anyhow::{Context, Result};

use gradepred_remote::config::create_predictor;

use super::{GlobalOpts, Workspace};

pub async fn execute(opts: &GlobalOpts) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let remote = workspace.remote()?;
    let predictor = create_predictor(remote)?;
    let mut aggregator = workspace.load()?;

    let report = aggregator
        .sync_from(predictor.as_ref())
        .await
        .with_context(|| format!("failed to sync with {}", remote.base_url))?;
    workspace.save(&aggregator)?;

    let student = aggregator.student();
    if report.student_data {
        println!(
            "Student data synced: {} grade(s). GPA: {:.2}  CWA: {:.1}  Credits: {}",
            student.grades.len(),
            student.current_gpa,
            student.current_cwa,
            student.total_credits
        );
    } else {
        println!("Student data not available from the service; kept local copy.");
    }
    match report.predictions {
        Some(count) => println!("Prediction history replaced: {count} prediction(s)."),
        None => println!("Prediction history not available from the service; kept local copy."),
    }
    Ok(())
}
