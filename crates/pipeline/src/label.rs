//! Labels attached to text fragments by annotating skills.
//!
//! Labels are taken verbatim from the raw response. Absent fields fall back
//! to empty strings, a `[0, 0]` span, and a zero value.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// Character range `[start, end]` within the labelled text.
///
/// Serialised on the wire as a two-element array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Span {
    /// Offset of the first character covered by the label.
    pub start: usize,
    /// Offset one past the last character covered by the label.
    pub end: usize,
}

impl Span {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of characters covered. Zero for inverted spans.
    pub fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no characters.
    pub fn is_empty(self) -> bool {
        self.len() == 0
    }
}

impl From<[usize; 2]> for Span {
    fn from([start, end]: [usize; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Span> for [usize; 2] {
    fn from(span: Span) -> Self {
        [span.start, span.end]
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Label
// ---------------------------------------------------------------------------

/// A typed annotation on a text fragment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    /// Label type; matched against [`crate::SkillDescriptor::label_type`].
    #[serde(rename = "type")]
    pub label_type: String,

    /// Label name (e.g. the keyword, the entity class).
    pub name: String,

    /// Location of the labelled fragment.
    pub span: Span,

    /// Score or numeric payload.
    pub value: f64,
}

impl Label {
    /// Creates a label.
    pub fn new(
        label_type: impl Into<String>,
        name: impl Into<String>,
        span: impl Into<Span>,
        value: f64,
    ) -> Self {
        Self {
            label_type: label_type.into(),
            name: name.into(),
            span: span.into(),
            value,
        }
    }

    /// The fragment of `text` covered by this label's span, if the span
    /// falls on character boundaries inside `text`.
    pub fn fragment<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.span.end < self.span.start {
            return None;
        }
        let offset = |chars: usize| {
            text.char_indices()
                .map(|(i, _)| i)
                .chain([text.len()])
                .nth(chars)
        };
        text.get(offset(self.span.start)?..offset(self.span.end)?)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Label({}, {:?}, {}, {})",
            self.label_type, self.name, self.span, self.value
        )
    }
}
