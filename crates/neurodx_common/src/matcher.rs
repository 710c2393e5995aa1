//! Match engine - routes a question to the override rule or the knowledge base.
//!
//! Rules are evaluated in list order and the first one that produces an
//! answer wins. The default order puts the diagnosis override ahead of the
//! knowledge lookup, so "what is MCI? and my diagnosis?" is answered from the
//! patient's context, not from the glossary.

use crate::config::ChatConfig;
use crate::diagnosis::DiagnosisContext;
use crate::knowledge::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_OVERRIDE_KEYWORD: &str = "diagnosis";

pub const DEFAULT_OVERRIDE_TEMPLATE: &str =
    "Based on the MRI scan, the patient has {label}. Further deterioration is expected.";

pub const DEFAULT_FALLBACK_ANSWER: &str =
    "I'm sorry, I currently don't have information about that.";

/// Placeholder replaced with the diagnosis label in the override template
pub const LABEL_PLACEHOLDER: &str = "{label}";

/// A user question, as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub raw_text: String,
}

impl Query {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }

    /// Lowercased, trimmed text used for every comparison
    pub fn normalized(&self) -> String {
        self.raw_text.trim().to_lowercase()
    }
}

/// How an answer was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    DiagnosisOverride,
    KnowledgeMatch,
    NoMatch,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DiagnosisOverride => "diagnosis_override",
            Self::KnowledgeMatch => "knowledge_match",
            Self::NoMatch => "no_match",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub source: AnswerSource,
}

/// One step of the resolution order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Query mentions the keyword -> answer from the diagnosis context
    DiagnosisOverride { keyword: String, template: String },
    /// Query contains a knowledge trigger -> stored answer
    KnowledgeLookup,
}

impl MatchRule {
    fn apply(
        &self,
        normalized: &str,
        context: &DiagnosisContext,
        knowledge: &KnowledgeBase,
    ) -> Option<Answer> {
        match self {
            MatchRule::DiagnosisOverride { keyword, template } => {
                if !normalized.contains(keyword.as_str()) {
                    return None;
                }
                Some(Answer {
                    text: template.replace(LABEL_PLACEHOLDER, context.label().label()),
                    source: AnswerSource::DiagnosisOverride,
                })
            }
            MatchRule::KnowledgeLookup => knowledge.lookup(normalized).map(|entry| Answer {
                text: entry.answer.clone(),
                source: AnswerSource::KnowledgeMatch,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchEngine {
    knowledge: KnowledgeBase,
    rules: Vec<MatchRule>,
    fallback: String,
}

impl MatchEngine {
    /// Default rules and fallback text
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self::with_chat_config(knowledge, &ChatConfig::default())
    }

    pub fn with_chat_config(knowledge: KnowledgeBase, chat: &ChatConfig) -> Self {
        let rules = vec![
            MatchRule::DiagnosisOverride {
                keyword: chat.override_keyword.trim().to_lowercase(),
                template: chat.override_template.clone(),
            },
            MatchRule::KnowledgeLookup,
        ];
        Self {
            knowledge,
            rules,
            fallback: chat.fallback_answer.clone(),
        }
    }

    pub fn rules(&self) -> &[MatchRule] {
        &self.rules
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn resolve(&self, query: &Query, context: &DiagnosisContext) -> Answer {
        let normalized = query.normalized();

        self.rules
            .iter()
            .find_map(|rule| rule.apply(&normalized, context, &self.knowledge))
            .unwrap_or_else(|| Answer {
                text: self.fallback.clone(),
                source: AnswerSource::NoMatch,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnosis::Condition;
    use crate::knowledge::KnowledgeEntry;

    fn ctx(label: Condition) -> DiagnosisContext {
        DiagnosisContext::new(label, 0.8).unwrap()
    }

    #[test]
    fn test_default_rule_order() {
        let engine = MatchEngine::new(KnowledgeBase::builtin());
        assert!(matches!(engine.rules()[0], MatchRule::DiagnosisOverride { .. }));
        assert_eq!(engine.rules()[1], MatchRule::KnowledgeLookup);
    }

    #[test]
    fn test_override_beats_knowledge() {
        let engine = MatchEngine::new(KnowledgeBase::builtin());
        let answer = engine.resolve(
            &Query::new("What is MCI? Is that my DIAGNOSIS?"),
            &ctx(Condition::HealthyControl),
        );
        assert_eq!(answer.source, AnswerSource::DiagnosisOverride);
        assert_eq!(
            answer.text,
            "Based on the MRI scan, the patient has Healthy Control (HC). Further deterioration is expected."
        );
    }

    #[test]
    fn test_override_trigger_in_knowledge_base_still_overrides() {
        let kb = KnowledgeBase::new(vec![KnowledgeEntry::new("diagnosis", "glossary")]).unwrap();
        let engine = MatchEngine::new(kb);
        let answer = engine.resolve(&Query::new("diagnosis"), &ctx(Condition::AlzheimersDisease));
        assert_eq!(answer.source, AnswerSource::DiagnosisOverride);
    }

    #[test]
    fn test_knowledge_match() {
        let engine = MatchEngine::new(KnowledgeBase::builtin());
        let answer = engine.resolve(
            &Query::new("  What is LIME?  "),
            &ctx(Condition::MildCognitiveImpairment),
        );
        assert_eq!(answer.source, AnswerSource::KnowledgeMatch);
        assert!(answer.text.starts_with("LIME (Local Interpretable"));
    }

    #[test]
    fn test_no_match_fallback() {
        let engine = MatchEngine::new(KnowledgeBase::builtin());
        let answer = engine.resolve(&Query::new("banana"), &ctx(Condition::HealthyControl));
        assert_eq!(answer.source, AnswerSource::NoMatch);
        assert_eq!(answer.text, DEFAULT_FALLBACK_ANSWER);
    }

    #[test]
    fn test_custom_chat_config() {
        let chat = ChatConfig {
            override_keyword: "RESULT".to_string(),
            override_template: "Result: {label}".to_string(),
            fallback_answer: "No idea.".to_string(),
        };
        let engine = MatchEngine::with_chat_config(KnowledgeBase::empty(), &chat);

        let answer = engine.resolve(&Query::new("my result please"), &ctx(Condition::AlzheimersDisease));
        assert_eq!(answer.text, "Result: Alzheimer's Disease (AD)");

        let answer = engine.resolve(&Query::new("diagnosis"), &ctx(Condition::AlzheimersDisease));
        assert_eq!(answer.source, AnswerSource::NoMatch);
        assert_eq!(answer.text, "No idea.");
    }

    #[test]
    fn test_source_display() {
        assert_eq!(AnswerSource::DiagnosisOverride.to_string(), "diagnosis_override");
        assert_eq!(AnswerSource::KnowledgeMatch.to_string(), "knowledge_match");
        assert_eq!(AnswerSource::NoMatch.to_string(), "no_match");
    }
}
