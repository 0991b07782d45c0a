//! The `gradepred init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("gradepred.toml").exists() {
        println!("gradepred.toml already exists, skipping.");
    } else {
        std::fs::write("gradepred.toml", SAMPLE_CONFIG)?;
        println!("Created gradepred.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit gradepred.toml to point at your prediction service");
    println!("  2. Run: gradepred add-grade --course \"Calculus\" --grade A --credits 3");
    println!("  3. Run: gradepred predict --current-gpa 3.4 --study-hours 18");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradepred configuration

# Where student data and prediction history are stored.
data_dir = "./gradepred-data"

# Remote prediction service. Remove this section to always predict locally.
# GRADEPRED_API_URL overrides base_url.
[remote]
base_url = "http://localhost:5000/api"
timeout_secs = 5
health_timeout_secs = 5
# Unreachable health checks are retried; retry n waits n * retry_delay_ms.
health_retries = 3
retry_delay_ms = 2000
"#;
