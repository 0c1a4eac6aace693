// Manuscript analysis: prompt compilation, the inference seam, and journal ranking.
// All LLM calls go through llm_client; no direct Gemini calls here.

pub mod analyzer;
pub mod compiler;
pub mod fulltext;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod ranking;
