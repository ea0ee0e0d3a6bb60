//! Output tree reconstruction.
//!
//! The service answers a pipeline run with a flat list of text records. This
//! module reshapes that list into a tree mirroring the pipeline: every
//! generator opens a nested [`Output`] node holding the text it produced and
//! the skills that ran on that text.
//!
//! Two index spaces are walked together: the position in the pipeline
//! (`skill_index`) and the position in the response's `output` list
//! (`output_index`). Record 0 annotates the original input and generator *k*
//! produces record *k*.

use std::fmt;
use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::definition::Pipeline;
use crate::errors::{DataKind, PipelineError, Result};
use crate::label::Label;
use crate::response::RawResponse;
use crate::skill::Skill;

// ---------------------------------------------------------------------------
// Tree types
// ---------------------------------------------------------------------------

/// What one skill contributed to an [`Output`] node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputData {
    /// Labels attached by an annotating skill, in response order.
    Labels(Vec<Label>),
    /// The text produced by a generating skill and everything that ran on it.
    Output(Box<Output>),
}

impl OutputData {
    /// The labels, if this is an annotator's contribution.
    pub fn as_labels(&self) -> Option<&[Label]> {
        match self {
            OutputData::Labels(labels) => Some(labels),
            OutputData::Output(_) => None,
        }
    }

    /// The nested node, if this is a generator's contribution.
    pub fn as_output(&self) -> Option<&Output> {
        match self {
            OutputData::Labels(_) => None,
            OutputData::Output(output) => Some(output),
        }
    }

    /// Which kind of data this is.
    pub fn kind(&self) -> DataKind {
        match self {
            OutputData::Labels(_) => DataKind::Labels,
            OutputData::Output(_) => DataKind::Output,
        }
    }
}

/// One node of the reconstructed output tree.
///
/// `skills` and `data` always have the same length: `data[i]` is what
/// `skills[i]` contributed to this node's text. Nodes are immutable once
/// built.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    text: String,
    skills: Vec<Arc<Skill>>,
    data: Vec<OutputData>,
}

impl Output {
    /// Rebuilds the output tree for `pipeline` from the service's `response`.
    ///
    /// When the pipeline starts with a generator, the root node holds the
    /// original `input_text` and a single child for that generator; otherwise
    /// the root holds `output[0]`.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::MalformedResponse`] if the root's text is missing:
    ///   `input_text` when the first skill is a generator, `output[0]`
    ///   otherwise.
    /// - [`PipelineError::OutOfRange`] if a generator's record is missing.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(steps = pipeline.len(), records = response.output.len())
    )]
    pub fn build(pipeline: &Pipeline, response: &RawResponse) -> Result<Self> {
        let root = if pipeline.starts_with_generator() {
            // The first generator rewrites the original input; keep the
            // untransformed text visible as the root.
            let text = response.input_text.as_ref().ok_or_else(|| {
                PipelineError::malformed(
                    "input_text",
                    "required when the first skill is a generator",
                )
            })?;
            build_node(pipeline, response, text, &[], 0, 0)?
        } else {
            let record = response.record(0).ok_or_else(|| {
                PipelineError::malformed("output[0]", "no record for the original input")
            })?;
            build_node(pipeline, response, &record.text, &record.labels, 0, 0)?
        };

        let expected = pipeline.expected_records();
        if response.output.len() > expected {
            warn!(
                expected,
                received = response.output.len(),
                "Response has more output records than the pipeline consumes"
            );
        }
        debug!(generators = pipeline.generator_count(), "Output tree built");
        Ok(root)
    }

    /// The text this node's skills ran on.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The skills that ran on this node's text, in pipeline order.
    pub fn skills(&self) -> &[Arc<Skill>] {
        &self.skills
    }

    /// Per-skill contributions, parallel to [`Output::skills`].
    pub fn data(&self) -> &[OutputData] {
        &self.data
    }

    /// Pairs each skill with its contribution.
    pub fn iter(&self) -> impl Iterator<Item = (&Skill, &OutputData)> + '_ {
        self.skills.iter().map(|skill| &**skill).zip(&self.data)
    }

    /// Number of skills on this node.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    /// Returns `true` for a leaf produced by a pipeline's final generator.
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }
}

/// Builds the node whose text is `text` (record `output_index`) and whose
/// skills start at `skill_index`.
///
/// The node takes skills up to and including the next generator. Annotators
/// receive the labels of matching type; the generator recurses into the next
/// record and owns every skill after it.
fn build_node(
    pipeline: &Pipeline,
    response: &RawResponse,
    text: &str,
    labels: &[Label],
    output_index: usize,
    skill_index: usize,
) -> Result<Output> {
    let mut skills = Vec::new();
    let mut data = Vec::new();

    for (i, skill) in pipeline.steps()[skill_index..].iter().enumerate() {
        skills.push(Arc::clone(skill));

        if skill.is_generator() {
            let next = output_index + 1;
            let record = response
                .record(next)
                .ok_or_else(|| PipelineError::OutOfRange {
                    output_index: next,
                    available: response.output.len(),
                    skill: skill.key().to_string(),
                })?;
            let child = build_node(
                pipeline,
                response,
                &record.text,
                &record.labels,
                next,
                skill_index + i + 1,
            )?;
            data.push(OutputData::Output(Box::new(child)));
            break;
        }

        data.push(OutputData::Labels(
            labels
                .iter()
                .filter(|label| label.label_type == skill.label_type())
                .cloned()
                .collect(),
        ));
    }

    trace!(output_index, skill_index, skills = skills.len(), "Output node built");
    Ok(Output {
        text: text.to_string(),
        skills,
        data,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Output(text={:?}", self.text)?;
        for (skill, data) in self.iter() {
            write!(f, ", {}={data}", skill.key())?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for OutputData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputData::Output(output) => write!(f, "{output}"),
            OutputData::Labels(labels) => {
                write!(f, "[")?;
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{label}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Serialises as `{"text": ..., "<skill key>": <data>, ...}`.
///
/// A key repeated on one node is written as `<key>#2`, `<key>#3`, ... from
/// its second occurrence on.
impl Serialize for Output {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.skills.len() + 1))?;
        map.serialize_entry("text", &self.text)?;
        let mut seen: Vec<&str> = Vec::with_capacity(self.skills.len());
        for (skill, data) in self.iter() {
            let key = skill.key();
            let occurrence = seen.iter().filter(|k| **k == key).count() + 1;
            seen.push(key);
            if occurrence == 1 {
                map.serialize_entry(key, data)?;
            } else {
                map.serialize_entry(&format!("{key}#{occurrence}"), data)?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skill::SkillDescriptor;
    use serde_json::{json, Map};

    fn annotator(service: &str, label_type: &str) -> Skill {
        Skill::custom(
            SkillDescriptor::annotator(service.to_uppercase(), service, label_type),
            Map::new(),
        )
        .unwrap()
    }

    fn generator(service: &str) -> Skill {
        Skill::custom(
            SkillDescriptor::generator(service.to_uppercase(), service),
            Map::new(),
        )
        .unwrap()
    }

    fn response(value: serde_json::Value) -> RawResponse {
        RawResponse::from_value(value).unwrap()
    }

    fn assert_parallel(node: &Output) {
        assert_eq!(node.data().len(), node.skills().len());
        for data in node.data() {
            if let Some(child) = data.as_output() {
                assert_parallel(child);
            }
        }
    }

    #[test]
    fn annotators_only_build_a_single_level() {
        let pipeline =
            Pipeline::new([annotator("keywords", "keyword"), annotator("names", "entity")])
                .unwrap();
        let raw = response(json!({
            "output": [{ "text": "Alice met Bob", "labels": [
                { "type": "entity", "name": "person", "span": [0, 5], "value": 1.0 },
                { "type": "keyword", "name": "met", "span": [6, 9], "value": 0.4 },
                { "type": "entity", "name": "person", "span": [10, 13], "value": 1.0 }
            ] }]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(root.text(), "Alice met Bob");
        assert_eq!(root.len(), 2);
        assert_eq!(root.data()[0].as_labels().unwrap().len(), 1);

        let entities = root.data()[1].as_labels().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0].span.start, 0);
        assert_eq!(entities[1].span.start, 10);
    }

    #[test]
    fn label_type_match_is_exact() {
        let pipeline = Pipeline::new([annotator("keywords", "keyword")]).unwrap();
        let raw = response(json!({
            "output": [{ "text": "t", "labels": [
                { "type": "KEYWORD", "name": "a", "span": [0, 1], "value": 1.0 },
                { "type": "keywords", "name": "b", "span": [0, 1], "value": 1.0 }
            ] }]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(root.data()[0], OutputData::Labels(Vec::new()));
    }

    #[test]
    fn interior_generator_splits_the_pipeline() {
        let pipeline = Pipeline::new([
            annotator("keywords", "keyword"),
            generator("summarize"),
            annotator("names", "entity"),
        ])
        .unwrap();
        let raw = response(json!({
            "input_text": "original",
            "output": [
                { "text": "original", "labels": [
                    { "type": "keyword", "name": "k", "span": [0, 8], "value": 1.0 },
                    { "type": "entity", "name": "e0", "span": [0, 8], "value": 1.0 }
                ] },
                { "text": "summary", "labels": [
                    { "type": "entity", "name": "e1", "span": [0, 7], "value": 1.0 }
                ] }
            ]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(root.text(), "original");
        let keys: Vec<_> = root.skills().iter().map(|s| s.key()).collect();
        assert_eq!(keys, ["keywords", "summarize"]);
        assert_eq!(root.data()[0].as_labels().unwrap()[0].name, "k");

        let nested = root.data()[1].as_output().unwrap();
        assert_eq!(nested.text(), "summary");
        assert_eq!(nested.skills()[0].key(), "names");
        assert_eq!(nested.data()[0].as_labels().unwrap()[0].name, "e1");
        assert_parallel(&root);
    }

    #[test]
    fn leading_generator_roots_at_input_text() {
        let pipeline =
            Pipeline::new([generator("summarize"), annotator("keywords", "KEYWORD")]).unwrap();
        let raw = response(json!({
            "input_text": "long article...",
            "output": [
                { "text": "short summary", "labels": [] },
                { "text": "short summary", "labels": [
                    { "type": "KEYWORD", "name": "x", "span": [0, 1], "value": 0.9 }
                ] }
            ]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(root.text(), "long article...");
        assert_eq!(root.len(), 1);

        let nested = root.data()[0].as_output().unwrap();
        assert_eq!(nested.text(), "short summary");
        assert_eq!(
            nested.data()[0],
            OutputData::Labels(vec![Label::new("KEYWORD", "x", [0, 1], 0.9)])
        );
    }

    #[test]
    fn all_generators_form_a_chain() {
        let pipeline = Pipeline::new([
            generator("enhance"),
            generator("summarize"),
            generator("proofread"),
        ])
        .unwrap();
        let raw = response(json!({
            "input_text": "in",
            "output": [
                { "text": "in", "labels": [] },
                { "text": "one", "labels": [] },
                { "text": "two", "labels": [] },
                { "text": "three", "labels": [] }
            ]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        let mut node = &root;
        let mut texts = vec![node.text().to_string()];
        while let Some(child) = node.data().first().and_then(OutputData::as_output) {
            assert_eq!(node.len(), 1);
            node = child;
            texts.push(node.text().to_string());
        }
        assert_eq!(texts, ["in", "one", "two", "three"]);
        assert!(node.is_empty());
        assert!(node.data().is_empty());
        assert_parallel(&root);
    }

    #[test]
    fn missing_generator_record_is_out_of_range() {
        let pipeline =
            Pipeline::new([annotator("keywords", "keyword"), generator("summarize")]).unwrap();
        let raw = response(json!({ "output": [{ "text": "t", "labels": [] }] }));

        let err = Output::build(&pipeline, &raw).unwrap_err();
        assert_eq!(
            err,
            PipelineError::OutOfRange {
                output_index: 1,
                available: 1,
                skill: "summarize".into(),
            }
        );
    }

    #[test]
    fn empty_output_is_malformed() {
        let pipeline = Pipeline::new([annotator("keywords", "keyword")]).unwrap();
        let raw = response(json!({ "input_text": "t", "output": [] }));

        let err = Output::build(&pipeline, &raw).unwrap_err();
        assert!(
            matches!(err, PipelineError::MalformedResponse { ref field, .. } if field == "output[0]")
        );
    }

    #[test]
    fn leading_generator_without_input_text_is_malformed() {
        let pipeline = Pipeline::new([generator("summarize")]).unwrap();
        let raw = response(json!({ "output": [
            { "text": "a", "labels": [] },
            { "text": "b", "labels": [] }
        ] }));

        let err = Output::build(&pipeline, &raw).unwrap_err();
        assert!(
            matches!(err, PipelineError::MalformedResponse { ref field, .. } if field == "input_text")
        );
    }

    #[test]
    fn surplus_records_are_ignored() {
        let pipeline = Pipeline::new([annotator("keywords", "keyword")]).unwrap();
        let raw = response(json!({ "output": [
            { "text": "first", "labels": [] },
            { "text": "extra", "labels": [] }
        ] }));

        let root = Output::build(&pipeline, &raw).unwrap();
        assert_eq!(root.text(), "first");
    }

    #[test]
    fn skills_are_shared_with_the_pipeline() {
        let pipeline =
            Pipeline::new([generator("summarize"), annotator("keywords", "keyword")]).unwrap();
        let raw = response(json!({
            "input_text": "a",
            "output": [{ "text": "a", "labels": [] }, { "text": "b", "labels": [] }]
        }));

        let root = Output::build(&pipeline, &raw).unwrap();
        let nested = root.data()[0].as_output().unwrap();
        assert!(Arc::ptr_eq(&root.skills()[0], &pipeline.steps()[0]));
        assert!(Arc::ptr_eq(&nested.skills()[0], &pipeline.steps()[1]));
    }

    #[test]
    fn renders_as_text_and_json() {
        let pipeline =
            Pipeline::new([generator("summarize"), annotator("keywords", "keyword")]).unwrap();
        let raw = response(json!({
            "input_text": "long",
            "output": [
                { "text": "long", "labels": [] },
                { "text": "short", "labels": [
                    { "type": "keyword", "name": "x", "span": [0, 1], "value": 0.5 }
                ] }
            ]
        }));
        let root = Output::build(&pipeline, &raw).unwrap();

        assert_eq!(
            root.to_string(),
            r#"Output(text="long", summarize=Output(text="short", keywords=[Label(keyword, "x", [0, 1], 0.5)]))"#
        );
        assert_eq!(
            serde_json::to_value(&root).unwrap(),
            json!({
                "text": "long",
                "summarize": {
                    "text": "short",
                    "keywords": [{ "type": "keyword", "name": "x", "span": [0, 1], "value": 0.5 }]
                }
            })
        );
    }

    #[test]
    fn repeated_skill_keys_stay_distinct_in_json() {
        let pipeline = Pipeline::new([
            annotator("keywords", "keyword"),
            annotator("names", "entity"),
            annotator("keywords", "keyword"),
            annotator("keywords", "entity"),
        ])
        .unwrap();
        let raw = response(json!({
            "output": [{ "text": "t", "labels": [
                { "type": "entity", "name": "e", "span": [0, 1], "value": 1.0 }
            ] }]
        }));
        let root = Output::build(&pipeline, &raw).unwrap();

        let value = serde_json::to_value(&root).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 5);
        assert_eq!(value["keywords"], json!([]));
        assert_eq!(value["keywords#2"], json!([]));
        assert_eq!(value["keywords#3"][0]["name"], json!("e"));
        assert_eq!(value["names"][0]["name"], json!("e"));
    }
}
