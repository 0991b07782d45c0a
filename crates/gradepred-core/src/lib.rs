//! gradepred-core — Grade aggregation, GPA/CWA derivation and prediction.
//!
//! This crate defines the data model, the collaborator traits, and the pure
//! aggregation and fallback-prediction logic that the rest of gradepred
//! builds on.

pub mod aggregator;
pub mod error;
pub mod grading;
pub mod heuristic;
pub mod history;
pub mod insights;
pub mod model;
pub mod predictor;
pub mod traits;
pub mod validation;

pub use aggregator::{AcademicRecordAggregator, AcademicStats, SyncReport};
pub use error::PredictorError;
pub use history::{export_prediction, GpaTrend, PredictionExport, PredictionHistory};
pub use model::{
    CourseScore, GradeRecord, Numeric, PredictionInput, PredictionRecord, PredictionSource,
    StudentData,
};
pub use predictor::{PredictionOutcome, PredictionService};
