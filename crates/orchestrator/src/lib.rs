//! # Vista Report Orchestrator
//!
//! Runs the user-triggered report pipeline: snapshot the filters, assemble the
//! selected views, format the document and export the artifact.
//!
//! ## Architectural Principles
//!
//! - **One Run at a Time:** A trigger that arrives while a run is in flight is rejected
//!   with `Busy`. Nothing is queued and the running report is unaffected.
//! - **Consistent Snapshot:** The live filter state is read once, when assembly starts.
//!   Edits made after that point belong to the next run.
//! - **Bounded Export:** Writing the artifact happens on a blocking thread under a
//!   configurable timeout. A timed-out export is never published late, and no new run
//!   starts until the abandoned write has returned.
//! - **Fail Whole:** Any stage error fails the run. No partial artifact is written and the
//!   orchestrator returns to `Idle`, ready for the next trigger.
//!
//! ## Public API
//!
//! - `Orchestrator`: the run state machine and its `generate`/`preview` triggers.
//! - `ViewCatalog`: the registered aggregation views, refreshed independently of runs.
//! - `RunState` / `RunOutcome`: where a run is and how the last one ended.
//! - `OrchestratorError`: the specific error types that can be returned from this crate.

pub mod catalog;
pub mod error;
pub mod pipeline;
pub mod state;

pub use catalog::{ViewCatalog, ViewSummary};
pub use error::OrchestratorError;
pub use pipeline::Orchestrator;
pub use state::{RunOutcome, RunState};
