//! Wire types for a manuscript analysis: the submission going in and the result coming back.
//!
//! Field names are camelCase on the wire because the response schema handed to the model
//! is camelCase, and the same types are echoed to the front-end unchanged.

use serde::{Deserialize, Serialize};

use crate::analysis::fulltext::{truncate_chars, MAX_FULL_TEXT_CHARS};
use crate::errors::AppError;

/// Canonical spelling of the auto-detect sentinel.
pub const AUTO_DETECT: &str = "auto-detect";

/// Spellings accepted as the auto-detect sentinel (the last one is the legacy UI value).
const AUTO_DETECT_ALIASES: &[&str] = &["auto", "auto-detect", "autodetect", "自动检测"];

/// Categories offered by the submission form.
pub const SUBJECT_AREAS: &[&str] = &[
    "Computer Science",
    "Medicine & Health",
    "Engineering",
    "Social Sciences",
    "Business & Management",
    "Biology",
    "Physics",
    "Chemistry",
    "Arts & Humanities",
    "Environmental Science",
];

// ────────────────────────────────────────────────────────────────────────────
// Submission
// ────────────────────────────────────────────────────────────────────────────

/// Either "let the model work out the field" or a field chosen by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubjectArea {
    #[default]
    AutoDetect,
    Explicit(String),
}

impl From<String> for SubjectArea {
    fn from(value: String) -> Self {
        let trimmed = value.trim();
        let is_sentinel = trimmed.is_empty()
            || AUTO_DETECT_ALIASES
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(trimmed));

        if is_sentinel {
            SubjectArea::AutoDetect
        } else {
            SubjectArea::Explicit(trimmed.to_string())
        }
    }
}

impl From<SubjectArea> for String {
    fn from(value: SubjectArea) -> Self {
        match value {
            SubjectArea::AutoDetect => AUTO_DETECT.to_string(),
            SubjectArea::Explicit(area) => area,
        }
    }
}

/// Language the model writes its explanations in; also used for the failure message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseLanguage {
    #[default]
    English,
    Chinese,
}

impl ResponseLanguage {
    pub fn prompt_name(self) -> &'static str {
        match self {
            ResponseLanguage::English => "English",
            ResponseLanguage::Chinese => "Simplified Chinese (简体中文)",
        }
    }

    /// Generic, actionable message shown when an analysis fails for any reason.
    pub fn failure_message(self) -> &'static str {
        match self {
            ResponseLanguage::English => {
                "An error occurred while analysing the manuscript. \
                 Please check your network connection or API key settings and try again."
            }
            ResponseLanguage::Chinese => "分析稿件时发生错误，请检查您的网络连接或 API Key 设置。",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub open_access: bool,
    pub high_impact: bool,
    pub fast_review: bool,
}

/// Manuscript metadata for one analysis. Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub title: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub subject_area: SubjectArea,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub language: ResponseLanguage,
}

impl Submission {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if self.abstract_text.trim().is_empty() {
            return Err(AppError::Validation("abstract cannot be empty".to_string()));
        }
        Ok(())
    }

    /// The part of the full text that is forwarded to the model, if any.
    pub fn full_text_excerpt(&self) -> Option<&str> {
        self.full_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(|text| truncate_chars(text, MAX_FULL_TEXT_CHARS))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AnalysisResult
// ────────────────────────────────────────────────────────────────────────────

/// One recommended venue. Bibliometric figures are model estimates, not lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Journal {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issn: Option<String>,
    pub publisher: String,
    pub impact_factor: f64,
    /// Free text such as "18%".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_rate: Option<String>,
    /// Free text such as "6 weeks".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_time: Option<String>,
    #[serde(default, rename = "isOA")]
    pub is_oa: bool,
    pub match_score: f64,
    pub acceptance_probability: f64,
    pub match_reason: String,
    #[serde(default)]
    pub scope: String,
}

impl Journal {
    pub fn probability_band(&self) -> ProbabilityBand {
        ProbabilityBand::from_probability(self.acceptance_probability)
    }
}

/// Traffic-light bucket for an acceptance probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbabilityBand {
    High,
    Medium,
    Low,
}

impl ProbabilityBand {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 70.0 {
            ProbabilityBand::High
        } else if probability > 40.0 {
            ProbabilityBand::Medium
        } else {
            ProbabilityBand::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub title_suggestions: Vec<String>,
    pub abstract_keywords_to_include: Vec<String>,
    pub general_advice: String,
}

/// Structured outcome of one inference call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub detected_subject_area: String,
    pub journals: Vec<Journal>,
    pub detailed_analysis: DetailedAnalysis,
    pub suggestions: Suggestions,
}

/// A complete, schema-conformant model payload, shared by tests across modules.
#[cfg(test)]
pub(crate) const SAMPLE_RESULT_JSON: &str = r#"{
    "detectedSubjectArea": "Computational Linguistics",
    "journals": [
        {
            "name": "Computational Linguistics",
            "issn": "0891-2017",
            "publisher": "MIT Press",
            "impactFactor": 9.3,
            "acceptanceRate": "18%",
            "reviewTime": "10 weeks",
            "isOA": true,
            "matchScore": 92.0,
            "acceptanceProbability": 35.0,
            "matchReason": "Core venue for parsing research.",
            "scope": "Computational approaches to language."
        },
        {
            "name": "Natural Language Engineering",
            "issn": "1351-3249",
            "publisher": "Cambridge University Press",
            "impactFactor": 2.5,
            "acceptanceRate": "30%",
            "reviewTime": "6 weeks",
            "isOA": false,
            "matchScore": 81.0,
            "acceptanceProbability": 62.0,
            "matchReason": "Applied NLP systems fit well.",
            "scope": "Engineering of NLP systems."
        }
    ],
    "detailedAnalysis": {
        "strengths": ["Clear problem statement"],
        "weaknesses": ["Limited evaluation"]
    },
    "suggestions": {
        "titleSuggestions": ["Incremental Parsing for Low-Resource Languages"],
        "abstractKeywordsToInclude": ["dependency parsing"],
        "generalAdvice": "Strengthen the evaluation before submitting."
    }
}"#;
