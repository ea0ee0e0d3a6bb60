//! Wire types for the annotation service's flat response.
//!
//! ```text
//! {
//!   "input_text": string,
//!   "output": [ { "text": string, "labels": [Label, ...] }, ... ]
//! }
//! ```
//!
//! `output[0]` annotates the original input; each generator in the pipeline
//! contributes one further record, in pipeline order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{PipelineError, Result};
use crate::label::Label;

/// One text fragment and the labels the service attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// The fragment's text.
    pub text: String,
    /// Labels attached to `text`, in service order.
    pub labels: Vec<Label>,
}

/// The service's response, before it is reshaped into an [`crate::Output`] tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    /// The text the pipeline was run on.
    ///
    /// Only needed when the first skill is a generator, so a response without
    /// it is still accepted here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_text: Option<String>,

    /// Text records in emission order.
    pub output: Vec<OutputRecord>,
}

impl RawResponse {
    /// Parses a response from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedResponse`] if the text is not JSON
    /// or does not have the response's shape.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(malformed)
    }

    /// Converts an already-parsed JSON value into a response.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MalformedResponse`] if the value does not
    /// have the response's shape.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(malformed)
    }

    /// The record at `index`, if present.
    pub fn record(&self, index: usize) -> Option<&OutputRecord> {
        self.output.get(index)
    }
}

fn malformed(err: serde_json::Error) -> PipelineError {
    PipelineError::malformed("response", err.to_string())
}
