//! Skills that produce new text.
//!
//! Each generator's output becomes a nested [`pipeline::Output`] node; skills
//! placed after it in the pipeline run on the generated text.

use pipeline::{SkillDescriptor, SkillType};
use serde::{Deserialize, Serialize};

/// Condenses the input into a shorter summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Summarize {
    /// Lower bound on summary length, in words.
    pub min_length: u32,
    /// Upper bound on summary length, in words.
    pub max_length: u32,
    /// Whether to label the source sentences each summary sentence came from.
    pub find_origins: bool,
}

impl Default for Summarize {
    fn default() -> Self {
        Self {
            min_length: 5,
            max_length: 100,
            find_origins: false,
        }
    }
}

impl SkillType for Summarize {
    fn descriptor() -> SkillDescriptor {
        SkillDescriptor::generator("Summarize", "summarize")
            .with_output_name("summary")
            .with_param_fields(["min_length", "max_length", "find_origins"])
    }
}

/// Rewrites the input in different words.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paraphrase;

impl SkillType for Paraphrase {
    fn descriptor() -> SkillDescriptor {
        SkillDescriptor::generator("Paraphrase", "paraphrase").with_output_name("paraphrased")
    }
}

/// Fixes spelling and grammar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proofread;

impl SkillType for Proofread {
    fn descriptor() -> SkillDescriptor {
        SkillDescriptor::generator("Proofread", "proofread").with_output_name("proofread")
    }
}

/// Cleans up speech-to-text transcripts (fillers, casing, punctuation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionEnhancer;

impl SkillType for TranscriptionEnhancer {
    fn descriptor() -> SkillDescriptor {
        SkillDescriptor::generator("TranscriptionEnhancer", "enhance")
            .with_output_name("enhanced_transcript")
    }
}

/// Masks personal details in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Anonymize {
    /// Entity classes to mask. Empty masks every class the service knows.
    pub entities: Vec<String>,
}

impl SkillType for Anonymize {
    fn descriptor() -> SkillDescriptor {
        SkillDescriptor::generator("Anonymize", "anonymize")
            .with_output_name("anonymized")
            .with_label_type("anonymized")
            .with_param_fields(["entities"])
    }
}
