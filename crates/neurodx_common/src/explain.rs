//! Explanation service - the entry point every front-end calls.
//!
//! Stateless: the diagnosis context comes with each call and the knowledge
//! base is read-only, so one instance can be shared across threads.

use crate::config::Config;
use crate::diagnosis::DiagnosisContext;
use crate::error::{NeuroError, Result};
use crate::knowledge::KnowledgeBase;
use crate::matcher::{Answer, MatchEngine, Query};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ExplanationService {
    engine: MatchEngine,
}

impl ExplanationService {
    pub fn new(engine: MatchEngine) -> Self {
        Self { engine }
    }

    /// Built-in knowledge base with default chat rules
    pub fn builtin() -> Self {
        Self::new(MatchEngine::new(KnowledgeBase::builtin()))
    }

    /// Knowledge and chat rules from a loaded config
    pub fn from_config(config: &Config) -> Result<Self> {
        let knowledge = config.knowledge_base()?;
        Ok(Self::new(MatchEngine::with_chat_config(knowledge, &config.chat)))
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        self.engine.knowledge()
    }

    /// Answer with its source classification
    pub fn explain(&self, raw_text: &str, context: &DiagnosisContext) -> Result<Answer> {
        if raw_text.trim().is_empty() {
            return Err(NeuroError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let query = Query::new(raw_text);
        let answer = self.engine.resolve(&query, context);
        debug!(
            source = %answer.source,
            diagnosis = context.label().code(),
            "Resolved question"
        );
        Ok(answer)
    }

    /// Answer text only
    pub fn answer_question(&self, raw_text: &str, context: &DiagnosisContext) -> Result<String> {
        self.explain(raw_text, context).map(|answer| answer.text)
    }
}

impl Default for ExplanationService {
    fn default() -> Self {
        Self::builtin()
    }
}
