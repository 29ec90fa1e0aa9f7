//! # Vista Core Types
//!
//! The shared vocabulary of the report pipeline: filter snapshots, aggregation
//! views and the consolidated report document.
//!
//! ## Architectural Principles
//!
//! - **Layer 0:** Pure data types with no knowledge of files, terminals or runtimes.
//!   Every other crate in the workspace depends on this one.
//! - **Snapshots, not shared state:** A [`FilterState`] is a value. The live selection
//!   ([`LiveFilters`]) only ever hands out owned copies through [`FilterSource`].
//!
//! ## Public API
//!
//! - `Dimension`: the six filterable dimensions and column binding rules.
//! - `FilterState`, `FilterSource`, `LiveFilters`: selections and where they come from.
//! - `AggregationView`, `ViewSchema`, `ViewRow`, `CellValue`: read-only pipeline input.
//! - `ReportDocument`, `Section`, `VisibleRow`: the assembled output.

pub mod document;
pub mod enums;
pub mod error;
pub mod filters;
pub mod view;

// Re-export the core types to provide a clean public API.
pub use document::{NO_MATCHING_DATA, ReportDocument, Section, SectionBody, VisibleRow};
pub use enums::Dimension;
pub use error::{CoreError, SchemaError};
pub use filters::{FilterSource, FilterState, LiveFilters};
pub use view::{AggregationView, CellValue, ViewRow, ViewSchema};
