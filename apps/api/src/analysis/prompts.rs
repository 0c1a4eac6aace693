// All LLM prompt constants for the Analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Manuscript analysis prompt template.
/// Replace: {language}, {authenticity_instruction}, {confidentiality_instruction},
///          {title}, {keywords}, {abstract}, {subject_area_directive},
///          {full_text_section}, {preference_directives}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a rigorous, impartial and highly experienced senior academic journal editor.
Write every explanatory text field of your answer in {language}. Journal names, publishers and ISSNs stay in their official form.

CORE PRINCIPLES:
{authenticity_instruction}
{confidentiality_instruction}

MANUSCRIPT DETAILS:
- Title: {title}
- Keywords: {keywords}
- Abstract: {abstract}
- Subject area: {subject_area_directive}
{full_text_section}
USER PREFERENCES: {preference_directives}

TASKS:
1. SUBJECT DETECTION: If the user did not specify a subject area, infer the most precise field.
2. JOURNAL RECOMMENDATION: Identify 6-8 real, existing English-language academic journals.
3. METRIC ESTIMATES: Give the real impact factor (latest data) and an estimate of the historical acceptance rate.
4. FIT ANALYSIS: Compute a match score (0-100, topical fit with the journal's scope) and an acceptance probability (0-100, combining fit and how competitive the journal is).
5. SHORT CRITIQUE:
   - Analyse the strengths and weaknesses of the manuscript.
   - Suggest improvements to the title and the abstract keywords.

The output must be strict JSON matching the provided schema."#;

/// Used when the subject area is left to the model.
pub const SUBJECT_AUTO_DETECT_DIRECTIVE: &str =
    "Not specified. Determine the precise subject area from the manuscript content.";

/// Prefix for a user-chosen subject area; the area itself follows verbatim.
pub const SUBJECT_OVERRIDE_DIRECTIVE: &str = "Specified by the user as: ";

/// Full-text section. Replace `{max_chars}` and `{excerpt}`.
pub const FULL_TEXT_SECTION_TEMPLATE: &str =
    "- Full text excerpt (truncated to the first {max_chars} characters): {excerpt}...\n";

pub const OPEN_ACCESS_DIRECTIVE: &str = "Prefer Open Access journals.";
pub const HIGH_IMPACT_DIRECTIVE: &str = "Prioritise journals with a high impact factor.";
pub const FAST_REVIEW_DIRECTIVE: &str = "Prioritise journals with a short review cycle.";

/// Stands in for the preference list when no preference is set.
pub const NO_PREFERENCES: &str = "None.";
