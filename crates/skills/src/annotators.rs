//! Skills that label existing text.

use pipeline::{SkillDescriptor, SkillType};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for parameterless annotators.
// Generates: unit struct and its SkillType impl.
// ---------------------------------------------------------------------------
macro_rules! annotator {
    (
        $(#[$attr:meta])*
        $name:ident => service: $service:literal, label: $label:literal, output: $output:literal
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name;

        impl SkillType for $name {
            fn descriptor() -> SkillDescriptor {
                SkillDescriptor::annotator(stringify!($name), $service, $label)
                    .with_output_name($output)
            }
        }
    };
}

annotator! {
    /// Marks the words and phrases that best describe the text.
    Keywords => service: "keywords", label: "keyword", output: "keywords"
}

annotator! {
    /// Marks the sentences that carry the text's main points.
    Highlights => service: "highlights", label: "highlight", output: "highlights"
}

annotator! {
    /// Marks positive and negative statements.
    Sentiments => service: "sentiments", label: "sentiment", output: "sentiments"
}

annotator! {
    /// Marks expressions of emotion (happiness, anger, surprise, ...).
    Emotions => service: "emotions", label: "emotion", output: "emotions"
}

annotator! {
    /// Tags the text with the subjects it discusses.
    Topics => service: "article-topics", label: "topic", output: "topics"
}

annotator! {
    /// Marks named entities: people, places, organisations, dates, amounts.
    Entities => service: "names", label: "entity", output: "entities"
}

annotator! {
    /// Marks business-specific entities such as products and prices.
    BusinessEntities => service: "business-entities", label: "business-entity", output: "business_entities"
}
