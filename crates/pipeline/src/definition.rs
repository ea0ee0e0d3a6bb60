//! Pipeline definitions: the ordered chain of skills one request runs.

use std::fmt;
use std::sync::Arc;

use crate::errors::{PipelineError, Result};
use crate::skill::Skill;

/// An ordered, immutable chain of skills.
///
/// Order is significant: it fixes both the nesting of generator outputs and
/// the attribution of labels to annotating skills. Steps are reference
/// counted so output nodes can share them without copying.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<Arc<Skill>>,
}

impl Pipeline {
    /// Creates a pipeline from its steps, in execution order.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ConfigurationError`] if `steps` is empty.
    pub fn new(steps: impl IntoIterator<Item = Skill>) -> Result<Self> {
        let steps: Vec<_> = steps.into_iter().map(Arc::new).collect();
        if steps.is_empty() {
            return Err(PipelineError::configuration(
                "a pipeline needs at least one step",
            ));
        }
        Ok(Self { steps })
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> &[Arc<Skill>] {
        &self.steps
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Always `false`; an empty pipeline cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Whether the first step generates new text from the original input.
    pub fn starts_with_generator(&self) -> bool {
        self.steps.first().is_some_and(|skill| skill.is_generator())
    }

    /// Number of generating steps.
    pub fn generator_count(&self) -> usize {
        self.steps.iter().filter(|skill| skill.is_generator()).count()
    }

    /// Number of output records a complete response carries: one for the
    /// original input plus one per generator.
    pub fn expected_records(&self) -> usize {
        self.generator_count() + 1
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, skill) in self.steps.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{skill}")?;
        }
        Ok(())
    }
}
