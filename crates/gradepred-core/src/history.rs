//! Prediction history, export and trend detection.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{PredictionInput, PredictionRecord, PredictionSource};

/// Predictions, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredictionHistory {
    records: Vec<PredictionRecord>,
}

impl PredictionHistory {
    /// Build a history from records already ordered most-recent-first.
    pub fn new(records: Vec<PredictionRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[PredictionRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &PredictionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn latest(&self) -> Option<&PredictionRecord> {
        self.records.first()
    }

    pub fn get(&self, id: u64) -> Option<&PredictionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Id for a record created at `now`: its Unix milliseconds, bumped past
    /// the most recent id so ids stay unique and ordered.
    pub fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        match self.latest() {
            Some(latest) if latest.id >= millis => latest.id + 1,
            _ => millis,
        }
    }

    /// Insert a new record at the front.
    pub fn prepend(&mut self, record: PredictionRecord) {
        if let Some(latest) = self.latest() {
            if record.id <= latest.id {
                tracing::warn!(
                    id = record.id,
                    latest = latest.id,
                    "prediction id does not increase; history order may be ambiguous"
                );
            }
        }
        self.records.insert(0, record);
    }

    /// Remove every record whose id is in `ids`. Returns how many were removed.
    pub fn delete_by_ids(&mut self, ids: &HashSet<u64>) -> usize {
        let before = self.records.len();
        self.records.retain(|r| !ids.contains(&r.id));
        before - self.records.len()
    }

    /// Direction of the predicted GPA over recent history.
    pub fn trend(&self) -> GpaTrend {
        gpa_trend(&self.records)
    }
}

/// Direction of predicted GPA over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpaTrend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for GpaTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpaTrend::Improving => write!(f, "improving"),
            GpaTrend::Declining => write!(f, "declining"),
            GpaTrend::Stable => write!(f, "stable"),
        }
    }
}

/// Minimum change in mean predicted GPA counted as a trend.
const TREND_THRESHOLD: f64 = 0.1;

/// Compare the mean of the 3 most recent predictions with the mean of the
/// 3 before them. `records` must be most-recent-first.
pub fn gpa_trend(records: &[PredictionRecord]) -> GpaTrend {
    let recent = &records[..records.len().min(3)];
    let older = &records[recent.len()..records.len().min(6)];
    if recent.is_empty() || older.is_empty() {
        return GpaTrend::Stable;
    }

    let mean = |slice: &[PredictionRecord]| {
        slice.iter().map(|r| r.predicted_gpa).sum::<f64>() / slice.len() as f64
    };
    let difference = mean(recent) - mean(older);

    if difference > TREND_THRESHOLD {
        GpaTrend::Improving
    } else if difference < -TREND_THRESHOLD {
        GpaTrend::Declining
    } else {
        GpaTrend::Stable
    }
}

/// Flat export projection of a prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionExport {
    pub prediction_id: u64,
    pub timestamp: DateTime<Utc>,
    pub predicted_gpa: f64,
    pub confidence: u8,
    pub input_data: PredictionInput,
    pub insights: Vec<String>,
    pub source: PredictionSource,
    pub export_date: DateTime<Utc>,
}

/// Project a prediction into its export form, stamped with the current time.
pub fn export_prediction(prediction: &PredictionRecord) -> PredictionExport {
    export_prediction_at(prediction, Utc::now())
}

pub fn export_prediction_at(
    prediction: &PredictionRecord,
    export_date: DateTime<Utc>,
) -> PredictionExport {
    PredictionExport {
        prediction_id: prediction.id,
        timestamp: prediction.timestamp,
        predicted_gpa: prediction.predicted_gpa,
        confidence: prediction.confidence,
        input_data: prediction.input_data.clone(),
        insights: prediction.insights.clone(),
        source: prediction.source(),
        export_date,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(id: u64, gpa: f64) -> PredictionRecord {
        PredictionRecord {
            id,
            predicted_gpa: gpa,
            confidence: 75,
            insights: vec!["note".into()],
            input_data: PredictionInput {
                current_gpa: Some(gpa.into()),
                ..Default::default()
            },
            timestamp: Utc.timestamp_millis_opt(id as i64).unwrap(),
            is_fallback: true,
        }
    }

    fn history(gpas: &[f64]) -> PredictionHistory {
        // Most recent first: the first gpa gets the highest id.
        let n = gpas.len() as u64;
        PredictionHistory::new(
            gpas.iter()
                .enumerate()
                .map(|(i, g)| record(n - i as u64, *g))
                .collect(),
        )
    }

    #[test]
    fn prepend_keeps_most_recent_first() {
        let mut h = PredictionHistory::default();
        h.prepend(record(1, 3.0));
        h.prepend(record(2, 3.1));
        assert_eq!(h.latest().unwrap().id, 2);
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn next_id_is_strictly_increasing() {
        let now = Utc.timestamp_millis_opt(1_000).unwrap();
        let mut h = PredictionHistory::default();
        assert_eq!(h.next_id(now), 1_000);

        h.prepend(record(1_000, 3.0));
        // Same millisecond: bumped.
        assert_eq!(h.next_id(now), 1_001);

        let later = Utc.timestamp_millis_opt(5_000).unwrap();
        assert_eq!(h.next_id(later), 5_000);
    }

    #[test]
    fn bulk_delete_by_id() {
        let mut h = history(&[3.0, 3.1, 3.2, 3.3]);
        let removed = h.delete_by_ids(&HashSet::from([4, 2, 99]));
        assert_eq!(removed, 2);
        let ids: Vec<u64> = h.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);

        assert_eq!(h.delete_by_ids(&HashSet::new()), 0);
    }

    #[test]
    fn trend_needs_two_windows() {
        assert_eq!(history(&[]).trend(), GpaTrend::Stable);
        assert_eq!(history(&[3.9, 2.0]).trend(), GpaTrend::Stable);
        assert_eq!(history(&[3.9, 3.9, 3.9]).trend(), GpaTrend::Stable);
    }

    #[test]
    fn trend_direction() {
        assert_eq!(
            history(&[3.6, 3.5, 3.4, 3.0, 3.0, 3.0]).trend(),
            GpaTrend::Improving
        );
        assert_eq!(
            history(&[2.8, 2.9, 3.0, 3.3, 3.3, 3.3, 1.0]).trend(),
            GpaTrend::Declining
        );
        assert_eq!(history(&[3.05, 3.0, 3.0, 3.0]).trend(), GpaTrend::Stable);
    }

    #[test]
    fn export_projection() {
        let r = record(123, 3.4);
        let at = Utc.timestamp_millis_opt(9_999).unwrap();
        let export = export_prediction_at(&r, at);
        assert_eq!(export.prediction_id, 123);
        assert_eq!(export.predicted_gpa, 3.4);
        assert_eq!(export.confidence, 75);
        assert_eq!(export.insights, r.insights);
        assert_eq!(export.input_data, r.input_data);
        assert_eq!(export.source, PredictionSource::Fallback);
        assert_eq!(export.export_date, at);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["source"], "fallback");
        assert!(json.get("input_data").is_some());
    }

    #[test]
    fn history_serializes_as_plain_list() {
        let h = history(&[3.0]);
        let json = serde_json::to_value(&h).unwrap();
        assert!(json.is_array());
        let back: PredictionHistory = serde_json::from_value(json).unwrap();
        assert_eq!(back, h);
    }
}
