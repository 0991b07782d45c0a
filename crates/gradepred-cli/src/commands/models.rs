//! The `gradepred models` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use gradepred_core::traits::ModelPerformance;
use gradepred_remote::config::create_predictor;

use super::{GlobalOpts, Workspace};

pub async fn execute(opts: &GlobalOpts, retrain: bool) -> Result<()> {
    let workspace = Workspace::open(opts)?;
    let predictor = create_predictor(workspace.remote()?)?;

    if retrain {
        let report = predictor.retrain().await?;
        match &report.timestamp {
            Some(ts) => println!("{} ({ts})", report.message),
            None => println!("{}", report.message),
        }
        match predictor.model_performance().await {
            Ok(performance) => print_performance(&performance),
            Err(e) => tracing::warn!(error = %e, "could not refresh model performance"),
        }
        return Ok(());
    }

    print_performance(&predictor.model_performance().await?);
    Ok(())
}

fn metric(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into())
}

fn print_performance(performance: &ModelPerformance) {
    if performance.is_empty() {
        println!("The prediction service reported no models.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Model", "Accuracy", "MAE", "R²"]);
    for (name, metrics) in performance {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(
                metrics
                    .accuracy
                    .map(|a| format!("{a:.1}%"))
                    .unwrap_or_else(|| "-".into()),
            ),
            Cell::new(metric(metrics.mae)),
            Cell::new(metric(metrics.r2_score)),
        ]);
    }
    println!("{table}");
}
