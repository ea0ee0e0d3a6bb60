//! Name-based lookup of the standard skill types.
//!
//! Used where pipelines are described as data (configuration files) rather
//! than built in code. Each entry pairs a descriptor with a factory that
//! deserialises the instance configuration and composes the skill.

use pipeline::{PipelineError, Result, Skill, SkillDescriptor, SkillType};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::annotators::{
    BusinessEntities, Emotions, Entities, Highlights, Keywords, Sentiments, Topics,
};
use crate::generators::{Anonymize, Paraphrase, Proofread, Summarize, TranscriptionEnhancer};

/// One skill type available by name.
#[derive(Debug, Clone)]
pub struct CatalogueEntry {
    /// The type's fixed metadata.
    pub descriptor: SkillDescriptor,
    factory: fn(Value) -> Result<Skill>,
}

impl CatalogueEntry {
    fn of<T>() -> Self
    where
        T: SkillType + DeserializeOwned + Default,
    {
        Self {
            descriptor: T::descriptor(),
            factory: compose_as::<T>,
        }
    }

    /// Composes an instance of this type from its JSON configuration.
    pub fn compose(&self, params: Value) -> Result<Skill> {
        (self.factory)(params)
    }
}

/// Every standard skill type, generators first.
pub fn catalogue() -> Vec<CatalogueEntry> {
    vec![
        CatalogueEntry::of::<Summarize>(),
        CatalogueEntry::of::<Paraphrase>(),
        CatalogueEntry::of::<Proofread>(),
        CatalogueEntry::of::<TranscriptionEnhancer>(),
        CatalogueEntry::of::<Anonymize>(),
        CatalogueEntry::of::<Keywords>(),
        CatalogueEntry::of::<Highlights>(),
        CatalogueEntry::of::<Sentiments>(),
        CatalogueEntry::of::<Emotions>(),
        CatalogueEntry::of::<Topics>(),
        CatalogueEntry::of::<Entities>(),
        CatalogueEntry::of::<BusinessEntities>(),
    ]
}

/// Looks up a standard skill type by type name or service name.
pub fn lookup(name: &str) -> Option<CatalogueEntry> {
    catalogue()
        .into_iter()
        .find(|entry| entry.descriptor.type_name == name || entry.descriptor.service_name == name)
}

/// Composes a standard skill from its name and JSON configuration.
///
/// `params` may be `null` or `{}` to use the type's defaults; otherwise its
/// fields override the defaults one by one.
///
/// # Errors
///
/// Returns [`PipelineError::ConfigurationError`] if `name` is not in the
/// catalogue or `params` does not fit the type's configuration.
pub fn compose(name: &str, params: Value) -> Result<Skill> {
    let entry = lookup(name)
        .ok_or_else(|| PipelineError::configuration(format!("unknown skill '{name}'")))?;
    entry.compose(params)
}

fn compose_as<T>(params: Value) -> Result<Skill>
where
    T: SkillType + DeserializeOwned + Default,
{
    let type_name = T::descriptor().type_name;
    let config = match params {
        Value::Null => T::default(),
        Value::Object(ref map) if map.is_empty() => T::default(),
        params => serde_json::from_value(params).map_err(|e| {
            PipelineError::configuration(format!("invalid parameters for skill '{type_name}': {e}"))
        })?,
    };
    debug!(skill = %type_name, "Composing catalogue skill");
    Skill::of(config)
}
