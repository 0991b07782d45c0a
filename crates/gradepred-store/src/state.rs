//! Loading and saving an aggregator's state through a `PersistentStore`.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use gradepred_core::traits::{PersistentStore, PREDICTION_HISTORY_KEY, STUDENT_DATA_KEY};
use gradepred_core::{AcademicRecordAggregator, PredictionHistory, StudentData};

/// How often, and how patiently, a failed save is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before attempt `n + 1` is `base_delay * n`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

/// Save `value` under `key`, retrying with a linearly growing delay.
///
/// The last error is returned once every attempt has failed.
pub fn save_with_retry(
    store: &dyn PersistentStore,
    key: &str,
    value: &serde_json::Value,
    policy: RetryPolicy,
) -> Result<()> {
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match store.save(key, value) {
            Ok(()) => return Ok(()),
            Err(e) if attempt < attempts => {
                tracing::warn!(key, attempt, error = %e, "save failed, retrying");
                std::thread::sleep(policy.base_delay * attempt);
                attempt += 1;
            }
            Err(e) => {
                return Err(e.context(format!("failed to save {key} after {attempts} attempts")))
            }
        }
    }
}

fn load_key<T: DeserializeOwned + Default>(store: &dyn PersistentStore, key: &str) -> Result<T> {
    match store.load(key).with_context(|| format!("failed to load {key}"))? {
        Some(value) => {
            serde_json::from_value(value).with_context(|| format!("stored {key} is not valid"))
        }
        None => Ok(T::default()),
    }
}

/// Load student data and prediction history, defaulting missing keys to
/// empty state. Derived totals are recomputed on load.
pub fn load_state(store: &dyn PersistentStore) -> Result<AcademicRecordAggregator> {
    let student: StudentData = load_key(store, STUDENT_DATA_KEY)?;
    let history: PredictionHistory = load_key(store, PREDICTION_HISTORY_KEY)?;
    tracing::debug!(
        grades = student.grades.len(),
        predictions = history.len(),
        "loaded state"
    );
    Ok(AcademicRecordAggregator::new(student, history))
}

/// Persist both keys of the aggregator with the default retry policy.
pub fn save_state(
    store: &dyn PersistentStore,
    aggregator: &AcademicRecordAggregator,
) -> Result<()> {
    let student =
        serde_json::to_value(aggregator.student()).context("failed to serialize student data")?;
    let history = serde_json::to_value(aggregator.history())
        .context("failed to serialize prediction history")?;

    save_with_retry(store, STUDENT_DATA_KEY, &student, RetryPolicy::default())?;
    save_with_retry(store, PREDICTION_HISTORY_KEY, &history, RetryPolicy::default())?;
    Ok(())
}
