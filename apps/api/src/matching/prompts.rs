// LLM prompt constants for job-match recommendations.

/// System prompt for recommendation generation. Enforces JSON-only output.
pub const RECOMMENDATION_SYSTEM: &str = "You are an expert technical recruiter and career advisor. \
    You write short, concrete, encouraging advice for candidates. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Recommendation prompt template.
/// Replace: {match_score}, {matched_skills}, {missing_skills}, {resume}, {job_description}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"A candidate was scored against a job description.

Match score: {match_score}/100
Matched skills: {matched_skills}
Missing skills: {missing_skills}

Candidate's resume (excerpt):
{resume}

Job description (excerpt):
{job_description}

Write recommendations that help this candidate close the gap for THIS role:
- at most 150 words
- name the most important missing skills and how to demonstrate or acquire them
- point out which matched strengths to emphasize in the application
- do NOT restate the score

Return a JSON object with this EXACT schema (no extra fields):
{
  "recommendations": "Your profile shows strong Python and SQL. Consider a small AWS project to cover the cloud requirement."
}"#;
