//! Shared types and logic for NeuroDx components.
//!
//! The chatbot core (knowledge base, match engine, explanation service)
//! plus the diagnosis model, prediction providers, reports and config.

pub mod config;
pub mod diagnosis;
pub mod error;
pub mod explain;
pub mod knowledge;
pub mod matcher;
pub mod prediction;
pub mod report;

pub use config::Config;
pub use diagnosis::{Condition, DiagnosisContext};
pub use error::{NeuroError, Result};
pub use explain::ExplanationService;
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use matcher::{Answer, AnswerSource, MatchEngine, MatchRule, Query};
pub use prediction::{Heatmap, MockPredictionProvider, Prediction, PredictionProvider, ScanInput};
pub use report::DiagnosisReport;

/// Version of the shared library, reported by the hosts
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
