//! Skill descriptors and composed skill instances.
//!
//! A skill type is declared once by implementing [`SkillType`] on its
//! configuration struct. The struct carries the caller's instance settings;
//! [`SkillType::descriptor`] carries the fixed metadata the annotation service
//! needs (service name, generator flag, label type, output name, parameter
//! fields). [`Skill::of`] composes the two: the configuration is captured
//! first and the descriptor is attached afterwards, so neither can overwrite
//! the other.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Fixed metadata describing one skill type's contract with the service.
///
/// Descriptors are immutable once a skill is composed. They are shared by
/// reference between the [`crate::Pipeline`] and every [`crate::Output`] node
/// that lists the skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDescriptor {
    /// Declared type name (e.g. `"Summarize"`).
    ///
    /// Lets callers who know the skill's type, but not its service name,
    /// resolve its output.
    #[serde(default)]
    pub type_name: String,

    /// Name of the skill in the remote service's pipeline API.
    pub service_name: String,

    /// Whether the skill produces new text rather than labelling existing text.
    #[serde(default)]
    pub is_generator: bool,

    /// Label `type` this skill attaches to text. Empty for pure generators.
    #[serde(default)]
    pub label_type: String,

    /// Alternate, caller-facing name for the skill's output. May be empty.
    #[serde(default)]
    pub output_name: String,

    /// Ordered names of the configuration fields sent as request parameters.
    #[serde(default)]
    pub param_fields: Vec<String>,
}

impl SkillDescriptor {
    /// Creates a descriptor for a skill that generates new text.
    pub fn generator(type_name: impl Into<String>, service_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            service_name: service_name.into(),
            is_generator: true,
            label_type: String::new(),
            output_name: String::new(),
            param_fields: Vec::new(),
        }
    }

    /// Creates a descriptor for a skill that labels existing text with
    /// `label_type` labels.
    pub fn annotator(
        type_name: impl Into<String>,
        service_name: impl Into<String>,
        label_type: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            service_name: service_name.into(),
            is_generator: false,
            label_type: label_type.into(),
            output_name: String::new(),
            param_fields: Vec::new(),
        }
    }

    /// Sets the alternate output name.
    #[must_use]
    pub fn with_output_name(mut self, output_name: impl Into<String>) -> Self {
        self.output_name = output_name.into();
        self
    }

    /// Sets the label type (used by generators that also label their output).
    #[must_use]
    pub fn with_label_type(mut self, label_type: impl Into<String>) -> Self {
        self.label_type = label_type.into();
        self
    }

    /// Declares which configuration fields are request parameters.
    #[must_use]
    pub fn with_param_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

// ---------------------------------------------------------------------------
// Skill types
// ---------------------------------------------------------------------------

/// A configuration struct that declares a skill type.
///
/// The struct's serialised fields are the instance configuration; the
/// descriptor is the same for every instance.
pub trait SkillType: Serialize {
    /// Static metadata for this skill type.
    fn descriptor() -> SkillDescriptor;
}

// ---------------------------------------------------------------------------
// Composed skill
// ---------------------------------------------------------------------------

/// One configured processing step: a descriptor plus the instance
/// configuration it was composed with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    #[serde(flatten)]
    descriptor: SkillDescriptor,
    config: Map<String, Value>,
}

impl Skill {
    /// Composes a skill from an instance configuration of type `T`.
    ///
    /// The configuration is serialised first and the descriptor attached
    /// second. Unit structs (no configuration) are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationError`] if the configuration does
    /// not serialise to an object, or lacks one of the descriptor's
    /// parameter fields.
    pub fn of<T: SkillType>(config: T) -> Result<Self> {
        let descriptor = T::descriptor();
        let config = match serde_json::to_value(&config) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(other) => {
                return Err(PipelineError::configuration(format!(
                    "configuration of skill '{}' must serialise to an object, got `{other}`",
                    descriptor.type_name
                )))
            }
            Err(e) => {
                return Err(PipelineError::configuration(format!(
                    "configuration of skill '{}' could not be serialised: {e}",
                    descriptor.type_name
                )))
            }
        };
        Self::custom(descriptor, config)
    }

    /// Composes a skill from a runtime descriptor and configuration map.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationError`] if the descriptor has no
    /// service name, or `config` lacks one of its parameter fields.
    pub fn custom(descriptor: SkillDescriptor, config: Map<String, Value>) -> Result<Self> {
        if descriptor.service_name.is_empty() {
            return Err(PipelineError::configuration(format!(
                "skill '{}' has no service name",
                descriptor.type_name
            )));
        }
        if let Some(missing) = descriptor
            .param_fields
            .iter()
            .find(|field| !config.contains_key(field.as_str()))
        {
            return Err(PipelineError::configuration(format!(
                "skill '{}' declares parameter '{missing}' but its configuration has no such field",
                descriptor.service_name
            )));
        }
        Ok(Self { descriptor, config })
    }

    /// The skill's fixed metadata.
    pub fn descriptor(&self) -> &SkillDescriptor {
        &self.descriptor
    }

    /// Declared type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.type_name
    }

    /// Name of the skill in the service API.
    pub fn service_name(&self) -> &str {
        &self.descriptor.service_name
    }

    /// Whether the skill generates new text.
    pub fn is_generator(&self) -> bool {
        self.descriptor.is_generator
    }

    /// Label type attached by this skill.
    pub fn label_type(&self) -> &str {
        &self.descriptor.label_type
    }

    /// Alternate output name (may be empty).
    pub fn output_name(&self) -> &str {
        &self.descriptor.output_name
    }

    /// The full instance configuration, including fields that are not
    /// request parameters.
    pub fn config(&self) -> &Map<String, Value> {
        &self.config
    }

    /// Request parameters as `(field, value)` pairs, in declared order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.descriptor
            .param_fields
            .iter()
            .filter_map(|field| self.config.get(field).map(|value| (field.as_str(), value)))
    }

    /// Key used when rendering this skill's output: the service name, or the
    /// type name when no service name is set.
    pub fn key(&self) -> &str {
        if self.descriptor.service_name.is_empty() {
            &self.descriptor.type_name
        } else {
            &self.descriptor.service_name
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
