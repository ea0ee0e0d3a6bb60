//! Error type for the skill chain domain.
//!
//! [`PipelineError`] covers every condition surfaced by pipeline composition,
//! output tree reconstruction, and attribute resolution. None of them are
//! recovered locally: the builder aborts the whole reconstruction on the first
//! error, and the resolver has no fallback beyond its three matching rules.

use std::fmt;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

// ---------------------------------------------------------------------------
// Data kinds
// ---------------------------------------------------------------------------

/// The two shapes a slot in [`crate::Output::data`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    /// A list of labels produced by an annotating skill.
    Labels,
    /// A nested output node produced by a generating skill.
    Output,
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataKind::Labels => write!(f, "labels"),
            DataKind::Output => write!(f, "output"),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors produced while composing pipelines, rebuilding output trees, and
/// resolving names against them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// No skill on the node matched the requested name under any rule.
    #[error("'{name}' not found in output (available: {})", .candidates.join(", "))]
    ResolutionFailure {
        /// The name the caller asked for.
        name: String,
        /// Names the node would have accepted.
        candidates: Vec<String>,
    },

    /// The raw response is missing a field or has the wrong shape.
    ///
    /// Indicates a broken response, independently of the pipeline it is
    /// paired with.
    #[error("Malformed response at '{field}': {reason}")]
    MalformedResponse {
        /// Path of the offending field (e.g. `"input_text"`, `"output[0]"`).
        field: String,
        /// Human-readable description of the problem.
        reason: String,
    },

    /// A generator expected an output record the response does not contain.
    ///
    /// Indicates that the pipeline and the response do not belong together.
    #[error(
        "Output record {output_index} required by skill '{skill}' is out of range \
         ({available} records available)"
    )]
    OutOfRange {
        /// Index into the response's `output` list that was needed.
        output_index: usize,
        /// Number of records the response actually holds.
        available: usize,
        /// Name of the generator skill that needed the record.
        skill: String,
    },

    /// A typed accessor found the other kind of data under the requested name.
    #[error("'{name}' holds {found}, not {expected}")]
    DataKindMismatch {
        /// The name the caller asked for.
        name: String,
        /// The kind the caller asked for.
        expected: DataKind,
        /// The kind actually stored.
        found: DataKind,
    },

    /// A pipeline or skill could not be composed from its configuration.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

impl PipelineError {
    /// Create a configuration error from any displayable message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a malformed-response error for `field`.
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
