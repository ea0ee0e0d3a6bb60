//! Standard skill types for the annotation service.
//!
//! Every type here is a configuration struct implementing
//! [`pipeline::SkillType`]; compose it into a [`pipeline::Skill`] with
//! [`pipeline::Skill::of`]:
//!
//! ```
//! use pipeline::{Pipeline, Skill};
//! use skills::{Keywords, Summarize};
//!
//! # fn main() -> pipeline::Result<()> {
//! let pipeline = Pipeline::new([
//!     Skill::of(Summarize { max_length: 40, ..Default::default() })?,
//!     Skill::of(Keywords)?,
//! ])?;
//! assert_eq!(pipeline.to_string(), "summarize -> keywords");
//! # Ok(())
//! # }
//! ```
//!
//! The [`catalogue`] module exposes the same types by name, for pipelines
//! described in configuration files.
//!
//! ## Architectural Layer
//!
//! **Domain data.** Types and descriptors only; all behaviour lives in the
//! [`pipeline`] crate.

pub mod annotators;
pub mod catalogue;
pub mod generators;

pub use annotators::{
    BusinessEntities, Emotions, Entities, Highlights, Keywords, Sentiments, Topics,
};
pub use catalogue::{catalogue, compose, lookup, CatalogueEntry};
pub use generators::{Anonymize, Paraphrase, Proofread, Summarize, TranscriptionEnhancer};
