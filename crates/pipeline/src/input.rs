//! Inputs a pipeline can be run on.
//!
//! The transport layer sends [`Input::text`] together with
//! [`Input::input_type`]; the service uses the type to pick models suited to
//! articles or conversations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, Result};

/// Text the service can process.
pub trait Input {
    /// Service-side input type (`"article"`, `"conversation"`).
    fn input_type(&self) -> &str;

    /// The text sent to the service.
    fn text(&self) -> String;
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// A free-form text document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// The document body.
    pub text: String,
}

impl Document {
    /// Creates a document from its text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Input for Document {
    fn input_type(&self) -> &str {
        "article"
    }

    fn text(&self) -> String {
        self.text.clone()
    }
}

// ---------------------------------------------------------------------------
// Conversations
// ---------------------------------------------------------------------------

/// One speaker turn in a [`Conversation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Who spoke.
    pub speaker: String,
    /// What was said.
    pub utterance: String,
}

impl Utterance {
    /// Creates an utterance.
    pub fn new(speaker: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            utterance: utterance.into(),
        }
    }
}

/// A transcript made of speaker turns.
///
/// Every conversation owns its utterance list; `Conversation::default()`
/// starts from a fresh empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    /// Turns in spoken order.
    pub utterances: Vec<Utterance>,
}

impl Conversation {
    /// Creates a conversation from its turns.
    pub fn new(utterances: impl IntoIterator<Item = Utterance>) -> Self {
        Self {
            utterances: utterances.into_iter().collect(),
        }
    }

    /// Parses a conversation from a JSON array of
    /// `{"speaker": ..., "utterance": ...}` objects.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationError`] if the JSON does not
    /// have that shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PipelineError::configuration(format!("invalid conversation: {e}")))
    }
}

impl Input for Conversation {
    fn input_type(&self) -> &str {
        "conversation"
    }

    fn text(&self) -> String {
        // Cannot fail: utterances are plain string pairs.
        serde_json::to_string(&self.utterances).unwrap_or_default()
    }
}

impl fmt::Display for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for utterance in &self.utterances {
            writeln!(f, "{}: {}", utterance.speaker, utterance.utterance)?;
        }
        Ok(())
    }
}
