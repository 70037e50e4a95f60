//! Compilation errors

use thiserror::Error;
use wave_ir::Subfield;
use wave_path::PathError;

use crate::definitions::BindingConflict;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Stage '{stage}': invalid field reference '{field}': {source}")]
    Path {
        stage: String,
        field: String,
        #[source]
        source: PathError,
    },

    #[error("Stage '{stage}': {conflict}")]
    InconsistentBinding {
        stage: String,
        conflict: BindingConflict,
    },

    #[error("Unknown stage: {0}")]
    UnknownStage(String),
}

impl CompileError {
    /// Logical stage the failure belongs to, if any
    pub fn stage(&self) -> Option<&str> {
        match self {
            CompileError::Path { stage, .. } | CompileError::InconsistentBinding { stage, .. } => {
                Some(stage)
            }
            CompileError::UnknownStage(_) => None,
        }
    }

    pub fn subfield(&self) -> Option<&Subfield> {
        match self {
            CompileError::InconsistentBinding { conflict, .. } => Some(&conflict.subfield),
            _ => None,
        }
    }
}
