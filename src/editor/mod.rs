//! Structural editing of a profile
//!
//! [`DocumentStore`] owns the profile text and applies validated edits to it.
//! [`graph`] holds the invariant checks and [`history`] the undo/redo ledger.

pub mod error;
pub mod graph;
pub mod history;
pub mod store;
pub mod views;

pub use error::EditError;
pub use graph::{check_name_collision, detect_cycle, validate_document, DocumentIssue};
pub use history::HistoryLedger;
pub use store::{DocumentStore, StructuredView};
pub use views::{GroupFilter, GroupStats, RulesetFilter, RulesetStats};
