//! Diagnosis labels and the per-request context the chatbot answers against.

use crate::error::{NeuroError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Conditions the classifier can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Condition {
    AlzheimersDisease,
    MildCognitiveImpairment,
    HealthyControl,
}

impl Condition {
    pub const ALL: [Condition; 3] = [
        Condition::AlzheimersDisease,
        Condition::MildCognitiveImpairment,
        Condition::HealthyControl,
    ];

    /// Full label as shown to clinicians
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlzheimersDisease => "Alzheimer's Disease (AD)",
            Self::MildCognitiveImpairment => "Mild Cognitive Impairment (MCI)",
            Self::HealthyControl => "Healthy Control (HC)",
        }
    }

    /// Short code used on the command line
    pub fn code(&self) -> &'static str {
        match self {
            Self::AlzheimersDisease => "AD",
            Self::MildCognitiveImpairment => "MCI",
            Self::HealthyControl => "HC",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = NeuroError;

    /// Accepts the short code or the full label, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| NeuroError::UnknownCondition(wanted.to_string()))
    }
}

impl TryFrom<String> for Condition {
    type Error = NeuroError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Condition> for String {
    fn from(value: Condition) -> Self {
        value.label().to_string()
    }
}

/// Diagnosis and confidence for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosisContext {
    label: Condition,
    confidence: f64,
}

impl DiagnosisContext {
    /// Confidence must be a finite value in [0, 1].
    pub fn new(label: Condition, confidence: f64) -> Result<Self> {
        if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
            return Err(NeuroError::InvalidInput(format!(
                "confidence must be between 0 and 1, got {}",
                confidence
            )));
        }
        Ok(Self { label, confidence })
    }

    /// Parse label and build the context in one step (host convenience)
    pub fn parse(label: &str, confidence: f64) -> Result<Self> {
        Self::new(label.parse()?, confidence)
    }

    pub fn label(&self) -> Condition {
        self.label
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    /// Confidence as a percentage with two decimals, e.g. "84.00%"
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}
