//! Static question/answer pairs the chatbot falls back on.
//!
//! The base is built once and never mutated. Entries keep insertion order,
//! which is also the lookup order: the first trigger found in the query wins.

use crate::error::{NeuroError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One canonical question and its answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub trigger: String,
    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(trigger: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            answer: answer.into(),
        }
    }
}

const BUILTIN_ENTRIES: &[(&str, &str)] = &[
    (
        "What is Alzheimer's Disease?",
        "Alzheimer's disease is a progressive neurological disorder that leads to memory loss and cognitive decline.",
    ),
    (
        "What is MCI?",
        "Mild Cognitive Impairment (MCI) is an early stage of memory loss or cognitive ability loss.",
    ),
    (
        "What is Grad-CAM?",
        "Grad-CAM (Gradient-weighted Class Activation Mapping) is a visualization technique to see which parts of an image influenced the AI model's decision.",
    ),
    (
        "What is LIME?",
        "LIME (Local Interpretable Model-agnostic Explanations) explains the predictions of black-box AI models in a human-understandable way.",
    ),
    (
        "What is SHAP?",
        "SHAP (SHapley Additive Explanations) helps interpret the contribution of each input feature towards the model's prediction.",
    ),
];

/// Immutable, ordered knowledge base
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
    /// Lowercased triggers, parallel to `entries`
    needles: Vec<String>,
}

impl KnowledgeBase {
    /// Build from entries. Triggers must be non-empty and unique ignoring case.
    pub fn new(entries: Vec<KnowledgeEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut needles = Vec::with_capacity(entries.len());

        for entry in &entries {
            if entry.trigger.trim().is_empty() {
                return Err(NeuroError::InvalidInput(
                    "knowledge trigger must not be empty".to_string(),
                ));
            }
            // Surrounding whitespace is part of the trigger
            let needle = entry.trigger.to_lowercase();
            if !seen.insert(needle.clone()) {
                return Err(NeuroError::DuplicateTrigger(entry.trigger.clone()));
            }
            needles.push(needle);
        }

        Ok(Self { entries, needles })
    }

    /// The five explainability/condition entries shipped with the demo
    pub fn builtin() -> Self {
        let entries = BUILTIN_ENTRIES
            .iter()
            .map(|(trigger, answer)| KnowledgeEntry::new(*trigger, *answer))
            .collect();
        // Constants are unique and non-empty; the test below guards that.
        Self::new(entries).unwrap_or_else(|_| Self::empty())
    }

    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            needles: Vec::new(),
        }
    }

    /// First entry whose trigger appears in the query, ignoring case
    pub fn lookup(&self, query: &str) -> Option<&KnowledgeEntry> {
        let q = query.trim().to_lowercase();
        self.needles
            .iter()
            .position(|needle| q.contains(needle.as_str()))
            .map(|idx| &self.entries[idx])
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
