pub mod constants;
pub mod drafts;
pub mod editor;
pub mod models;
pub mod parser;
pub mod session;
pub mod settings;
pub mod vfs;

// Re-export the main types for easier access
pub use editor::{DocumentStore, EditError};
pub use models::{Document, ProxyGroup, ProxyMember, Ruleset, RulesetType, Section};
pub use parser::{parse, stringify};
pub use session::{DraftChoice, EditorSession, LoadOutcome};
