//! Application layer
//!
//! Orchestrates one run: each input row goes through the item processor,
//! and the driver folds the outcomes into a run summary.

pub mod driver;
pub mod errors;
pub mod item_processor;
pub mod observation_service;
pub mod pacing;
pub mod reconciler;

pub use driver::{Driver, RunSummary, SkippedItem};
pub use errors::{ReconcileError, SkipReason};
pub use item_processor::ItemProcessor;
pub use observation_service::ObservationService;
pub use pacing::{NoDelay, Pacer, RandomDelay};
pub use reconciler::reconcile;
