//! Years-of-experience extraction and scoring.

use std::sync::LazyLock;

use regex::Regex;

/// Tenure claims above this are treated as noise (dates, salaries, typos).
const MAX_PLAUSIBLE_YEARS: f64 = 60.0;

/// Ordered from most to least specific. Every match of every pattern is
/// collected; the maximum wins.
static YEAR_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "5 years experience", "5+ yrs of experience"
        r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\s+(?:of\s+)?(?:\w+\s+)?experience",
        // "experience: 5 years", "experience - 3+ yrs"
        r"(?i)experience\s*[:\-–]?\s*(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b",
        // bare "5 years"
        r"(?i)\b(\d{1,2}(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static experience pattern"))
    .collect()
});

/// Largest number of years stated anywhere in `text`, or 0.
pub fn extract_years(text: &str) -> f64 {
    YEAR_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(text))
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .filter(|years| years.is_finite() && *years <= MAX_PLAUSIBLE_YEARS)
        .fold(0.0, f64::max)
}

/// Compares the candidate's tenure with the job's requirement.
///
/// - no requirement → 100
/// - meets requirement → 100
/// - at least 70% of it → 80
/// - otherwise the ratio as a percentage, floored at 50
pub fn experience_score(resume_years: f64, required_years: f64) -> f64 {
    if required_years <= 0.0 {
        return 100.0;
    }
    if resume_years >= required_years {
        100.0
    } else if resume_years >= 0.7 * required_years {
        80.0
    } else {
        (resume_years / required_years * 100.0).max(50.0)
    }
}
