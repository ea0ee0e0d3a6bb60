//! Pipeline configuration files.
//!
//! A pipeline is described as an ordered list of `[[steps]]` in TOML. Each
//! step either names a catalogue skill or spells out a full descriptor:
//!
//! ```toml
//! [[steps]]
//! skill = "Summarize"
//! params = { max_length = 40 }
//!
//! [[steps]]
//! params = { depth = 2 }
//! [steps.descriptor]
//! type_name = "Outline"
//! service_name = "outline"
//! label_type = "heading"
//! param_fields = ["depth"]
//! ```

use std::path::Path;

use anyhow::{bail, Context, Result};
use pipeline::{Pipeline, Skill, SkillDescriptor};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level pipeline config, deserialized from TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PipelineConfig {
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

/// One `[[steps]]` entry.
///
/// Exactly one of `skill` (a catalogue name) or `descriptor` (a full
/// descriptor) must be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct StepConfig {
    /// Catalogue type or service name.
    #[serde(default)]
    pub skill: Option<String>,

    /// Descriptor for a skill outside the catalogue.
    #[serde(default)]
    pub descriptor: Option<SkillDescriptor>,

    /// Instance configuration. Omitted means the type's defaults.
    #[serde(default)]
    pub params: Value,
}

impl StepConfig {
    fn compose(self) -> Result<Skill> {
        match (self.skill, self.descriptor) {
            (Some(skill), None) => Ok(skills::compose(&skill, self.params)?),
            (None, Some(descriptor)) => {
                let params = match self.params {
                    Value::Null => Map::new(),
                    Value::Object(map) => map,
                    other => bail!("`params` must be a table, got `{other}`"),
                };
                Ok(Skill::custom(descriptor, params)?)
            }
            (Some(_), Some(_)) => bail!("a step takes either `skill` or `descriptor`, not both"),
            (None, None) => bail!("a step needs either `skill` or `descriptor`"),
        }
    }
}

impl PipelineConfig {
    /// Parses a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid pipeline config")
    }

    /// Composes every step and assembles the pipeline.
    pub fn into_pipeline(self) -> Result<Pipeline> {
        if self.steps.is_empty() {
            bail!("pipeline config declares no [[steps]]");
        }
        let steps = self
            .steps
            .into_iter()
            .enumerate()
            .map(|(i, step)| step.compose().with_context(|| format!("step {}", i + 1)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Pipeline::new(steps)?)
    }
}

/// Loads and assembles the pipeline described at `path`.
pub(crate) fn load_pipeline(path: &Path) -> Result<Pipeline> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read pipeline config {}", path.display()))?;
    let pipeline = PipelineConfig::from_toml(&text)
        .and_then(PipelineConfig::into_pipeline)
        .with_context(|| format!("failed to load pipeline from {}", path.display()))?;
    debug!(path = %path.display(), %pipeline, "Loaded pipeline");
    Ok(pipeline)
}
