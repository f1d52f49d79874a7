// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Persona used as the system prompt for free-text career answers.
pub const CAREER_PERSONA: &str = "You are an expert technical recruiter and career advisor \
    with deep knowledge of various industries and career paths.";

/// Fills `{key}` placeholders in a single pass over `template`.
/// Substituted values are never rescanned, so user text that happens to
/// contain a placeholder stays literal.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let hit = values.iter().find(|(key, _)| {
            tail[1..]
                .strip_prefix(key)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
