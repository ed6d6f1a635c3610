//! Spam pattern storage
//!
//! Learned and curated regex patterns, persisted as a JSON file and grown at
//! runtime whenever the detector is confident enough to learn a new text.

pub mod store;
pub mod types;

pub use store::PatternStore;
pub use types::{CompiledPattern, PatternCategory, SpamPattern};
