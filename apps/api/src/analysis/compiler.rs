//! Prompt Compiler: turns a `Submission` into the instruction text and the response schema.
//!
//! Pure and deterministic: the same submission always yields byte-identical output.
//! Nothing here touches the network or fails.

use crate::analysis::fulltext::MAX_FULL_TEXT_CHARS;
use crate::analysis::models::{Preferences, SubjectArea, Submission};
use crate::analysis::prompts::{
    ANALYSIS_PROMPT_TEMPLATE, FAST_REVIEW_DIRECTIVE, FULL_TEXT_SECTION_TEMPLATE,
    HIGH_IMPACT_DIRECTIVE, NO_PREFERENCES, OPEN_ACCESS_DIRECTIVE, SUBJECT_AUTO_DETECT_DIRECTIVE,
    SUBJECT_OVERRIDE_DIRECTIVE,
};
use crate::llm_client::prompts::{AUTHENTICITY_INSTRUCTION, CONFIDENTIALITY_INSTRUCTION};
use crate::llm_client::schema::Schema;

/// Everything the inference call needs for one submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPrompt {
    pub instruction: String,
    pub schema: Schema,
}

pub fn compile_prompt(submission: &Submission) -> CompiledPrompt {
    CompiledPrompt {
        instruction: compile_instruction(submission),
        schema: analysis_schema(),
    }
}

fn compile_instruction(submission: &Submission) -> String {
    let subject_area = subject_area_directive(&submission.subject_area);

    let full_text_section = submission
        .full_text_excerpt()
        .map(|excerpt| {
            let max_chars = MAX_FULL_TEXT_CHARS.to_string();
            fill_template(
                FULL_TEXT_SECTION_TEMPLATE,
                &[("max_chars", max_chars.as_str()), ("excerpt", excerpt)],
            )
        })
        .unwrap_or_default();

    let preferences = preference_directives(&submission.preferences);
    let preferences = if preferences.is_empty() {
        NO_PREFERENCES.to_string()
    } else {
        preferences.join(" ")
    };

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("language", submission.language.prompt_name()),
            ("authenticity_instruction", AUTHENTICITY_INSTRUCTION),
            ("confidentiality_instruction", CONFIDENTIALITY_INSTRUCTION),
            ("title", submission.title.as_str()),
            ("keywords", submission.keywords.as_str()),
            ("abstract", submission.abstract_text.as_str()),
            ("subject_area_directive", subject_area.as_str()),
            ("full_text_section", full_text_section.as_str()),
            ("preference_directives", preferences.as_str()),
        ],
    )
}

fn subject_area_directive(subject_area: &SubjectArea) -> String {
    match subject_area {
        SubjectArea::AutoDetect => SUBJECT_AUTO_DETECT_DIRECTIVE.to_string(),
        SubjectArea::Explicit(area) => format!("{SUBJECT_OVERRIDE_DIRECTIVE}{area}"),
    }
}

/// One directive per enabled preference, in a fixed order.
pub fn preference_directives(preferences: &Preferences) -> Vec<&'static str> {
    [
        (preferences.open_access, OPEN_ACCESS_DIRECTIVE),
        (preferences.high_impact, HIGH_IMPACT_DIRECTIVE),
        (preferences.fast_review, FAST_REVIEW_DIRECTIVE),
    ]
    .into_iter()
    .filter_map(|(enabled, directive)| enabled.then_some(directive))
    .collect()
}

/// Substitutes `{key}` placeholders in a single pass over the template, so
/// user-supplied values that happen to contain braces are never re-expanded.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, v)| v.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let replacement = after.find('}').and_then(|end| {
            let key = &after[..end];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, end))
        });

        match replacement {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Output contract for the model, mirroring `AnalysisResult` field for field.
pub fn analysis_schema() -> Schema {
    let journal = Schema::object()
        .property("name", Schema::string())
        .property("issn", Schema::string())
        .property("publisher", Schema::string())
        .property(
            "impactFactor",
            Schema::number().describe("Estimated Impact Factor"),
        )
        .property("acceptanceRate", Schema::string().describe("e.g., '18%'"))
        .property("reviewTime", Schema::string().describe("e.g., '6 weeks'"))
        .property("isOA", Schema::boolean())
        .property("matchScore", Schema::number().describe("0-100, scope relevance"))
        .property(
            "acceptanceProbability",
            Schema::number().describe("0-100, likelihood of acceptance"),
        )
        .property(
            "matchReason",
            Schema::string().describe("Why the manuscript fits this journal"),
        )
        .property("scope", Schema::string().describe("Short summary of the journal scope"))
        .required(&[
            "name",
            "publisher",
            "impactFactor",
            "matchScore",
            "acceptanceProbability",
            "matchReason",
        ]);

    let detailed_analysis = Schema::object()
        .property(
            "strengths",
            Schema::array(Schema::string()).describe("Highlights of the manuscript"),
        )
        .property(
            "weaknesses",
            Schema::array(Schema::string()).describe("Areas for improvement"),
        )
        .required(&["strengths", "weaknesses"]);

    let suggestions = Schema::object()
        .property("titleSuggestions", Schema::array(Schema::string()))
        .property("abstractKeywordsToInclude", Schema::array(Schema::string()))
        .property(
            "generalAdvice",
            Schema::string().describe("Overall submission strategy"),
        )
        .required(&["titleSuggestions", "abstractKeywordsToInclude", "generalAdvice"]);

    Schema::object()
        .property(
            "detectedSubjectArea",
            Schema::string().describe("The specific subject area determined by the analysis"),
        )
        .property("journals", Schema::array(journal))
        .property("detailedAnalysis", detailed_analysis)
        .property("suggestions", suggestions)
        .required(&["journals", "suggestions", "detectedSubjectArea", "detailedAnalysis"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::ResponseLanguage;
    use crate::llm_client::schema::SchemaType;

    fn make_submission() -> Submission {
        Submission {
            title: "Incremental Parsing for Low-Resource Languages".to_string(),
            keywords: "parsing, low-resource, NLP".to_string(),
            abstract_text: "We propose an incremental dependency parser.".to_string(),
            subject_area: SubjectArea::AutoDetect,
            full_text: None,
            preferences: Preferences::default(),
            language: ResponseLanguage::English,
        }
    }

    fn instruction_for(submission: &Submission) -> String {
        compile_prompt(submission).instruction
    }

    #[test]
    fn test_manuscript_details_are_embedded() {
        let text = instruction_for(&make_submission());
        assert!(text.contains("Incremental Parsing for Low-Resource Languages"));
        assert!(text.contains("parsing, low-resource, NLP"));
        assert!(text.contains("We propose an incremental dependency parser."));
        assert!(text.contains(AUTHENTICITY_INSTRUCTION));
        assert!(text.contains(CONFIDENTIALITY_INSTRUCTION));
        assert!(text.contains("6-8 real"));
    }

    #[test]
    fn test_auto_detect_uses_inference_directive_only() {
        let text = instruction_for(&make_submission());
        assert!(text.contains(SUBJECT_AUTO_DETECT_DIRECTIVE));
        assert!(!text.contains(SUBJECT_OVERRIDE_DIRECTIVE));
    }

    #[test]
    fn test_explicit_area_uses_override_directive_only() {
        let submission = Submission {
            subject_area: SubjectArea::Explicit("Physics".to_string()),
            ..make_submission()
        };
        let text = instruction_for(&submission);
        assert!(text.contains(&format!("{SUBJECT_OVERRIDE_DIRECTIVE}Physics")));
        assert!(!text.contains(SUBJECT_AUTO_DETECT_DIRECTIVE));
    }

    #[test]
    fn test_each_enabled_preference_appears_exactly_once() {
        let all = [OPEN_ACCESS_DIRECTIVE, HIGH_IMPACT_DIRECTIVE, FAST_REVIEW_DIRECTIVE];

        for mask in 0u8..8 {
            let preferences = Preferences {
                open_access: mask & 1 != 0,
                high_impact: mask & 2 != 0,
                fast_review: mask & 4 != 0,
            };
            let enabled = [
                preferences.open_access,
                preferences.high_impact,
                preferences.fast_review,
            ];
            let text = instruction_for(&Submission {
                preferences,
                ..make_submission()
            });

            for (directive, on) in all.iter().zip(enabled) {
                let expected = usize::from(on);
                assert_eq!(
                    text.matches(directive).count(),
                    expected,
                    "mask {mask:03b}: {directive:?}"
                );
            }
            assert_eq!(text.contains(NO_PREFERENCES), mask == 0);
        }
    }

    #[test]
    fn test_long_full_text_is_truncated_to_limit() {
        let head = "a".repeat(MAX_FULL_TEXT_CHARS);
        let full_text = format!("{head}TAIL_MARKER");
        let text = instruction_for(&Submission {
            full_text: Some(full_text),
            ..make_submission()
        });

        assert!(text.contains(&format!("{head}...")));
        assert!(!text.contains("TAIL_MARKER"));
        assert!(text.contains("truncated to the first 3000 characters"));
    }

    #[test]
    fn test_short_full_text_is_unabridged() {
        let text = instruction_for(&Submission {
            full_text: Some("Section 1. Introduction.".to_string()),
            ..make_submission()
        });
        assert!(text.contains("Section 1. Introduction."));
    }

    #[test]
    fn test_absent_full_text_has_no_excerpt_section() {
        let text = instruction_for(&make_submission());
        assert!(!text.contains("Full text excerpt"));
    }

    #[test]
    fn test_language_directive() {
        let text = instruction_for(&Submission {
            language: ResponseLanguage::Chinese,
            ..make_submission()
        });
        assert!(text.contains("Simplified Chinese"));
    }

    #[test]
    fn test_braces_in_user_input_are_not_expanded() {
        let text = instruction_for(&Submission {
            title: "On {keywords} and {abstract}".to_string(),
            ..make_submission()
        });
        assert!(text.contains("On {keywords} and {abstract}"));
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let submission = Submission {
            subject_area: SubjectArea::Explicit("Biology".to_string()),
            full_text: Some("body".repeat(1000)),
            preferences: Preferences {
                open_access: true,
                high_impact: false,
                fast_review: true,
            },
            ..make_submission()
        };
        assert_eq!(compile_prompt(&submission), compile_prompt(&submission));
    }

    #[test]
    fn test_schema_required_fields() {
        let schema = analysis_schema();
        for field in ["journals", "suggestions", "detectedSubjectArea", "detailedAnalysis"] {
            assert!(schema.is_required(field), "{field} should be required");
        }

        let journals = schema.get("journals").unwrap();
        assert_eq!(journals.schema_type, SchemaType::Array);
        let journal = journals.items.as_deref().unwrap();
        for field in [
            "name",
            "publisher",
            "impactFactor",
            "matchScore",
            "acceptanceProbability",
            "matchReason",
        ] {
            assert!(journal.is_required(field), "journal.{field} should be required");
        }
        for field in ["issn", "acceptanceRate", "reviewTime", "isOA", "scope"] {
            assert!(journal.get(field).is_some(), "journal.{field} missing");
            assert!(!journal.is_required(field), "journal.{field} should be optional");
        }
    }

    #[test]
    fn test_schema_primitive_types_match_result_model() {
        let schema = analysis_schema();
        let journal = schema.get("journals").unwrap().items.as_deref().unwrap();
        assert_eq!(journal.get("impactFactor").unwrap().schema_type, SchemaType::Number);
        assert_eq!(journal.get("matchScore").unwrap().schema_type, SchemaType::Number);
        assert_eq!(journal.get("isOA").unwrap().schema_type, SchemaType::Boolean);
        assert_eq!(journal.get("reviewTime").unwrap().schema_type, SchemaType::String);

        let suggestions = schema.get("suggestions").unwrap();
        assert_eq!(
            suggestions.get("titleSuggestions").unwrap().schema_type,
            SchemaType::Array
        );
        assert_eq!(
            suggestions.get("generalAdvice").unwrap().schema_type,
            SchemaType::String
        );
    }

    #[test]
    fn test_fill_template_leaves_unknown_placeholders() {
        assert_eq!(fill_template("{a} {b} {", &[("a", "x")]), "x {b} {");
    }
}
