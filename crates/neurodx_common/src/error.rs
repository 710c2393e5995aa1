//! Error types for NeuroDx.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NeuroError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown condition '{0}'. Expected one of: AD, MCI, HC")]
    UnknownCondition(String),

    #[error("Duplicate knowledge trigger: {0}")]
    DuplicateTrigger(String),

    #[error("Unsupported scan '{0}'. Upload a NIfTI (.nii) or DICOM (.dcm) file")]
    UnsupportedScan(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NeuroError {
    pub fn code(&self) -> i32 {
        match self {
            NeuroError::InvalidInput(_) => -32602,
            NeuroError::UnknownCondition(_) => -32010,
            NeuroError::DuplicateTrigger(_) => -32011,
            NeuroError::UnsupportedScan(_) => -32012,
            NeuroError::Config(_) => -32013,
            NeuroError::Io(_) => -32006,
        }
    }

    /// Whether the caller sent something we refuse to process.
    /// Hosts report these back instead of treating them as faults.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            NeuroError::InvalidInput(_)
                | NeuroError::UnknownCondition(_)
                | NeuroError::UnsupportedScan(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NeuroError>;
