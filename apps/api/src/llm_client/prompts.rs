// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting rules every analysis prompt must carry.

/// Forbids invented venues. Recommendations are only useful if they can be looked up.
pub const AUTHENTICITY_INSTRUCTION: &str = "\
    1. AUTHENTICITY: Every journal you recommend MUST be a real, currently published journal \
    with a valid ISSN. Fabricating journals is strictly forbidden. \
    Base your recommendations on real indexing databases (Web of Science, Scopus).";

/// Mirrors a peer-review confidentiality agreement.
pub const CONFIDENTIALITY_INSTRUCTION: &str = "\
    2. CONFIDENTIALITY: Analyse the manuscript objectively and neutrally, as under a \
    peer-review confidentiality agreement. Never repeat personal or sensitive information \
    about the authors in your output.";
