// LLM prompt constants for career advice.

/// Shown in place of retrieved excerpts when retrieval yields nothing.
pub const NO_CONTEXT: &str = "No additional context available.";

/// Career advice prompt template.
/// Replace: {context}, {resume}, {query}
pub const CAREER_ADVICE_PROMPT: &str = r#"Use the resume excerpts most relevant to the question, together with the resume itself, to give specific career advice.

Relevant resume excerpts:
{context}

Candidate's resume:
{resume}

Question:
{query}

Answer directly and concretely:
- ground every suggestion in the candidate's actual experience
- name specific skills, roles, projects or certifications where useful
- keep it under 300 words
- plain text, no JSON"#;
