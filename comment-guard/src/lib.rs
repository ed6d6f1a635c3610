//! comment-guard: gambling spam detection for user comments
//!
//! Classifies short comments (Thai and English) as gambling/promotional spam
//! or legitimate content, even when the author hides the text behind
//! homoglyphs, fullwidth characters and emoji separators.
//!
//! # Features
//!
//! - **Normalization**: folds mathematical, fullwidth and circled letters back to ASCII
//! - **Pattern scoring**: weighted, persisted regex patterns plus built-in heuristics
//! - **LLM classifier**: OpenAI, DeepSeek, Grok, Ollama and LM Studio endpoints
//! - **Learning**: confident detections are added to the pattern store
//! - **Graceful degradation**: a dead classifier falls back to the pattern score
//!
//! # Example
//!
//! ```no_run
//! use comment_guard::classifier::{EndpointDescriptor, HttpClassifier};
//! use comment_guard::detector::SpamDetector;
//! use comment_guard::patterns::PatternStore;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = Arc::new(PatternStore::load("spam_patterns_db.json").await);
//!     let classifier = Arc::new(HttpClassifier::new(Duration::from_secs(30)));
//!     let endpoint = EndpointDescriptor::for_provider("ollama").with_model("mistral");
//!
//!     let detector = SpamDetector::new(store, classifier, endpoint);
//!     if detector.is_spam("สมัครสล็อตเว็บตรง ฝาก 100 บาท").await {
//!         println!("spam");
//!     }
//! }
//! ```

pub mod batch;
pub mod classifier;
pub mod comment;
pub mod config;
pub mod detector;
pub mod error;
pub mod normalize;
pub mod patterns;
pub mod scorer;

pub use batch::classify_batch;
pub use comment::{CommentRecord, CommentVerdict};
pub use config::Config;
pub use detector::{Evaluation, SpamDetector};
pub use error::{ClassifierError, GuardError, Result};
pub use normalize::normalize;
