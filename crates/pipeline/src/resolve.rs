//! Name-based lookup over [`Output`] nodes.
//!
//! A requested name is matched against each skill on the node, in order,
//! using three rules:
//!
//! 1. [`MatchRule::ServiceName`] — the name equals the skill's service name.
//! 2. [`MatchRule::OutputName`] — the name is contained in the skill's output
//!    name.
//! 3. [`MatchRule::TypeName`] — the name equals the skill's declared type name.
//!
//! The first skill satisfying any rule wins. Rule priority only decides which
//! rule is reported for that skill; it never lets a later skill beat an
//! earlier one.

use std::ops::Index;

use tracing::debug;

use crate::errors::{DataKind, PipelineError, Result};
use crate::label::Label;
use crate::output::{Output, OutputData};
use crate::skill::SkillDescriptor;

/// Which rule matched a requested name to a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchRule {
    /// Exact match on the service name.
    ServiceName,
    /// Containment in the output name.
    OutputName,
    /// Exact match on the declared type name.
    TypeName,
}

/// Outcome of a successful lookup: where the skill sits on the node and why
/// it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillMatch {
    /// Position of the skill in [`Output::skills`] (and of its data).
    pub index: usize,
    /// Highest-priority rule the skill satisfied.
    pub rule: MatchRule,
}

impl SkillDescriptor {
    /// The highest-priority rule under which `name` refers to this skill.
    ///
    /// Empty names and empty descriptor fields never match.
    pub fn match_rule(&self, name: &str) -> Option<MatchRule> {
        if name.is_empty() {
            None
        } else if self.service_name == name {
            Some(MatchRule::ServiceName)
        } else if !self.output_name.is_empty() && self.output_name.contains(name) {
            Some(MatchRule::OutputName)
        } else if self.type_name == name {
            Some(MatchRule::TypeName)
        } else {
            None
        }
    }
}

impl Output {
    /// Finds the skill `name` refers to on this node.
    pub fn locate(&self, name: &str) -> Option<SkillMatch> {
        self.skills().iter().enumerate().find_map(|(index, skill)| {
            skill
                .descriptor()
                .match_rule(name)
                .map(|rule| SkillMatch { index, rule })
        })
    }

    /// Returns what the skill named `name` contributed to this node.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::ResolutionFailure`] if no skill matches.
    pub fn get(&self, name: &str) -> Result<&OutputData> {
        match self.locate(name) {
            Some(found) => Ok(&self.data()[found.index]),
            None => {
                debug!(name, "Name did not resolve against output node");
                Err(PipelineError::ResolutionFailure {
                    name: name.to_string(),
                    candidates: self.candidates(),
                })
            }
        }
    }

    /// Returns the labels attached by the annotator named `name`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ResolutionFailure`] if no skill matches, or
    /// [`PipelineError::DataKindMismatch`] if the skill is a generator.
    pub fn labels(&self, name: &str) -> Result<&[Label]> {
        let data = self.get(name)?;
        data.as_labels()
            .ok_or_else(|| mismatch(name, DataKind::Labels, data))
    }

    /// Returns the node produced by the generator named `name`.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ResolutionFailure`] if no skill matches, or
    /// [`PipelineError::DataKindMismatch`] if the skill is an annotator.
    pub fn child(&self, name: &str) -> Result<&Output> {
        let data = self.get(name)?;
        data.as_output()
            .ok_or_else(|| mismatch(name, DataKind::Output, data))
    }

    /// Follows `path` through nested nodes, resolving one name per level.
    ///
    /// Every name except the last must refer to a generator.
    ///
    /// # Errors
    ///
    /// [`PipelineError::ResolutionFailure`] if `path` is empty or a name does
    /// not resolve, [`PipelineError::DataKindMismatch`] if an intermediate
    /// name refers to an annotator.
    pub fn resolve_path<S: AsRef<str>>(&self, path: &[S]) -> Result<&OutputData> {
        let Some((last, parents)) = path.split_last() else {
            return Err(PipelineError::ResolutionFailure {
                name: String::new(),
                candidates: self.candidates(),
            });
        };
        let mut node = self;
        for name in parents {
            node = node.child(name.as_ref())?;
        }
        node.get(last.as_ref())
    }

    /// Every name that resolves on this node, in skill order.
    pub fn candidates(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for skill in self.skills() {
            for name in [skill.service_name(), skill.output_name(), skill.type_name()] {
                if !name.is_empty() && !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}

fn mismatch(name: &str, expected: DataKind, found: &OutputData) -> PipelineError {
    PipelineError::DataKindMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
    }
}

/// Collection-style access to [`Output::get`].
///
/// # Panics
///
/// Panics if `name` does not resolve; use [`Output::get`] to handle that case.
impl Index<&str> for Output {
    type Output = OutputData;

    fn index(&self, name: &str) -> &OutputData {
        match self.get(name) {
            Ok(data) => data,
            Err(err) => panic!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Pipeline;
    use crate::response::RawResponse;
    use crate::skill::Skill;
    use serde_json::{json, Map};

    fn skill(descriptor: SkillDescriptor) -> Skill {
        Skill::custom(descriptor, Map::new()).unwrap()
    }

    /// `summarize` (generator) followed by `keywords` and `names`.
    fn summary_tree() -> Output {
        let pipeline = Pipeline::new([
            skill(SkillDescriptor::generator("Summarize", "summarize").with_output_name("summary")),
            skill(
                SkillDescriptor::annotator("Keywords", "keywords", "KEYWORD")
                    .with_output_name("keywords"),
            ),
            skill(
                SkillDescriptor::annotator("Entities", "names", "entity")
                    .with_output_name("entities"),
            ),
        ])
        .unwrap();
        let raw = RawResponse::from_value(json!({
            "input_text": "long article...",
            "output": [
                { "text": "long article...", "labels": [] },
                { "text": "short summary", "labels": [
                    { "type": "KEYWORD", "name": "x", "span": [0, 1], "value": 0.9 }
                ] }
            ]
        }))
        .unwrap();
        Output::build(&pipeline, &raw).unwrap()
    }

    #[test]
    fn resolves_by_service_name() {
        let root = summary_tree();
        assert_eq!(
            root.locate("summarize"),
            Some(SkillMatch {
                index: 0,
                rule: MatchRule::ServiceName
            })
        );
        let nested = root.child("summarize").unwrap();
        assert_eq!(nested.labels("keywords").unwrap().len(), 1);
    }

    #[test]
    fn resolves_by_output_name_containment() {
        let root = summary_tree();
        let nested = root.child("summary").unwrap();
        assert_eq!(
            nested.locate("entit").map(|m| m.rule),
            Some(MatchRule::OutputName)
        );
        assert!(nested.labels("entities").unwrap().is_empty());
    }

    #[test]
    fn resolves_by_type_name() {
        let root = summary_tree();
        let nested = root.child("Summarize").unwrap();
        assert_eq!(nested.locate("Entities").map(|m| m.rule), Some(MatchRule::TypeName));
    }

    #[test]
    fn index_and_get_agree() {
        let root = summary_tree();
        let nested = root["summarize"].as_output().unwrap();
        assert!(std::ptr::eq(&nested["keywords"], nested.get("keywords").unwrap()));
    }

    #[test]
    fn earlier_output_name_match_beats_later_service_name_match() {
        // Skills are scanned once, in order: the first skill matches "tags"
        // through its output name, so the second skill's exact service name
        // is never consulted.
        let pipeline = Pipeline::new([
            skill(SkillDescriptor::annotator("A", "a", "x").with_output_name("tags")),
            skill(SkillDescriptor::annotator("B", "tags", "y")),
        ])
        .unwrap();
        let raw =
            RawResponse::from_value(json!({ "output": [{ "text": "t", "labels": [] }] })).unwrap();
        let root = Output::build(&pipeline, &raw).unwrap();

        assert_eq!(
            root.locate("tags"),
            Some(SkillMatch {
                index: 0,
                rule: MatchRule::OutputName
            })
        );
        assert!(std::ptr::eq(root.get("tags").unwrap(), &root.data()[0]));

        // Reversing the order makes the service-name match win.
        let pipeline = Pipeline::new([
            skill(SkillDescriptor::annotator("B", "tags", "y")),
            skill(SkillDescriptor::annotator("A", "a", "x").with_output_name("tags")),
        ])
        .unwrap();
        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(
            root.locate("tags"),
            Some(SkillMatch {
                index: 0,
                rule: MatchRule::ServiceName
            })
        );
    }

    #[test]
    fn service_name_outranks_output_name_on_one_skill() {
        let descriptor =
            SkillDescriptor::annotator("Keywords", "keywords", "keyword").with_output_name("keywords");
        assert_eq!(descriptor.match_rule("keywords"), Some(MatchRule::ServiceName));
        assert_eq!(descriptor.match_rule("key"), Some(MatchRule::OutputName));
        assert_eq!(descriptor.match_rule("Keywords"), Some(MatchRule::TypeName));
        assert_eq!(descriptor.match_rule(""), None);
    }

    #[test]
    fn empty_name_never_resolves() {
        let root = summary_tree();
        assert_eq!(root.locate(""), None);
        assert!(matches!(
            root.get(""),
            Err(PipelineError::ResolutionFailure { ref name, .. }) if name.is_empty()
        ));
    }

    #[test]
    fn unknown_name_fails_with_candidates() {
        let root = summary_tree();
        let err = root.get("topics").unwrap_err();
        assert_eq!(
            err,
            PipelineError::ResolutionFailure {
                name: "topics".into(),
                candidates: vec!["summarize".into(), "summary".into(), "Summarize".into()],
            }
        );
    }

    #[test]
    #[should_panic(expected = "'topics' not found")]
    fn index_panics_on_unknown_name() {
        let root = summary_tree();
        let _ = &root["topics"];
    }

    #[test]
    fn typed_accessors_report_kind_mismatch() {
        let root = summary_tree();
        assert!(matches!(
            root.labels("summarize"),
            Err(PipelineError::DataKindMismatch {
                expected: DataKind::Labels,
                found: DataKind::Output,
                ..
            })
        ));
    }

    #[test]
    fn path_walks_nested_nodes() {
        let root = summary_tree();
        let data = root.resolve_path(&["summarize", "keywords"]).unwrap();
        assert_eq!(data.as_labels().unwrap()[0].name, "x");

        assert!(root.resolve_path::<&str>(&[]).is_err());
        assert!(matches!(
            root.resolve_path(&["summarize", "keywords", "more"]),
            Err(PipelineError::DataKindMismatch { .. })
        ));
    }

    #[test]
    fn lookup_is_deterministic() {
        let root = summary_tree();
        let first = root.get("summarize").unwrap();
        let second = root.get("summarize").unwrap();
        assert!(std::ptr::eq(first, second));
    }
}
