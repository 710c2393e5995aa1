//! Diagnosis report rendering.

use crate::diagnosis::DiagnosisContext;
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub const REPORT_TITLE: &str = "Alzheimer's MRI Diagnosis Report";

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisReport {
    pub context: DiagnosisContext,
    pub generated_at: DateTime<Utc>,
}

impl DiagnosisReport {
    pub fn new(context: DiagnosisContext) -> Self {
        Self::at(context, Utc::now())
    }

    pub fn at(context: DiagnosisContext, generated_at: DateTime<Utc>) -> Self {
        Self {
            context,
            generated_at,
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{}\nDiagnosis: {}\nConfidence: {}\nGenerated: {}\n",
            REPORT_TITLE,
            self.context.label(),
            self.context.confidence_percent(),
            self.generated_at.to_rfc3339(),
        )
    }

    /// Write the rendered report, creating parent directories as needed
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.render())?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}
