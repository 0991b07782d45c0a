//! gradepred-store — Persistence for student data and prediction history.
//!
//! Provides `PersistentStore` implementations and helpers that move an
//! `AcademicRecordAggregator` in and out of a store.

pub mod file;
pub mod memory;
pub mod state;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use state::{load_state, save_state, save_with_retry, RetryPolicy};
