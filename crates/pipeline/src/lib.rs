//! Core domain for skill chains run against a remote annotation service.
//!
//! A [`Pipeline`] is an ordered chain of [`Skill`]s. Some skills *generate*
//! new text (summaries, paraphrases); the rest *annotate* text with typed
//! [`Label`]s. The service answers a pipeline run with a flat
//! [`RawResponse`]; [`Output::build`] reshapes it into a tree with one nested
//! [`Output`] node per generator, and the resolver methods on [`Output`]
//! (`get`, `labels`, `child`, indexing by name) expose each skill's
//! contribution.
//!
//! ## Architectural Layer
//!
//! **Business logic.** This crate has no I/O dependencies. Transport,
//! authentication, and request batching belong to the caller; this crate is
//! handed a ready pipeline and a ready response.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`skill`] | Skill descriptors, the [`SkillType`] trait, composed [`Skill`]s |
//! | [`definition`] | [`Pipeline`] definitions |
//! | [`label`] | [`Label`] and [`Span`] |
//! | [`response`] | Raw response wire types |
//! | [`output`] | Output tree types and the builder |
//! | [`resolve`] | Name-based lookup over output nodes |
//! | [`input`] | Documents and conversations |
//! | [`errors`] | [`PipelineError`] |

pub mod definition;
pub mod errors;
pub mod input;
pub mod label;
pub mod output;
pub mod resolve;
pub mod response;
pub mod skill;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use definition::Pipeline;
pub use errors::{DataKind, PipelineError, Result};
pub use input::{Conversation, Document, Input, Utterance};
pub use label::{Label, Span};
pub use output::{Output, OutputData};
pub use resolve::{MatchRule, SkillMatch};
pub use response::{OutputRecord, RawResponse};
pub use skill::{Skill, SkillDescriptor, SkillType};
