//! Type operation errors

use crate::ty::Binder;
use thiserror::Error;

/// Errors that can occur during type operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    /// A parameter reference points past the end of the replacement list
    #[error("Parameter {index} of binder {binder} has no replacement ({len} given)")]
    SubstitutionIndexOutOfRange {
        /// Binder whose parameter was referenced
        binder: Binder,
        /// Referenced parameter position
        index: usize,
        /// Number of replacements supplied
        len: usize,
    },

    /// Invalid type argument count
    #[error("Invalid type argument count: expected {expected}, got {actual}")]
    ArityMismatch {
        /// Number of parameters
        expected: usize,
        /// Number of arguments
        actual: usize,
    },
}
