use serde::Serialize;

use crate::skills::SkillSet;

/// Max entries reported in `matched` / `missing`.
pub const MAX_REPORTED_SKILLS: usize = 15;

/// Score used when no skills could be parsed from the job description.
pub const NEUTRAL_EXACT_SCORE: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillOverlap {
    /// R ∩ J, in job-skill order, capped.
    pub matched: Vec<String>,
    /// J − R, in job-skill order, capped.
    pub missing: Vec<String>,
    /// |R ∩ J| / |J| × 100 over the uncapped sets.
    pub exact_match_score: f64,
}

/// Intersects the candidate's skills with the job's.
pub fn match_skills(resume: &SkillSet, job: &SkillSet) -> SkillOverlap {
    if job.is_empty() {
        return SkillOverlap {
            matched: vec![],
            missing: vec![],
            exact_match_score: NEUTRAL_EXACT_SCORE,
        };
    }

    let (matched, missing): (Vec<&String>, Vec<&String>) =
        job.iter().partition(|skill| resume.contains(skill));

    let exact_match_score = matched.len() as f64 / job.len() as f64 * 100.0;

    SkillOverlap {
        matched: matched
            .into_iter()
            .take(MAX_REPORTED_SKILLS)
            .cloned()
            .collect(),
        missing: missing
            .into_iter()
            .take(MAX_REPORTED_SKILLS)
            .cloned()
            .collect(),
        exact_match_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(skills: &[&str]) -> SkillSet {
        let mut s = SkillSet::new();
        for skill in skills {
            s.insert(skill.to_string());
        }
        s
    }

    #[test]
    fn test_half_overlap_scores_fifty() {
        let overlap = match_skills(&set(&["python", "sql"]), &set(&["python", "aws"]));
        assert_eq!(overlap.matched, vec!["python"]);
        assert_eq!(overlap.missing, vec!["aws"]);
        assert_eq!(overlap.exact_match_score, 50.0);
    }

    #[test]
    fn test_empty_job_skills_is_neutral() {
        let overlap = match_skills(&set(&["python"]), &set(&[]));
        assert_eq!(overlap.exact_match_score, 50.0);
        assert!(overlap.matched.is_empty());
        assert!(overlap.missing.is_empty());
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let overlap = match_skills(&set(&[]), &set(&["rust", "go"]));
        assert_eq!(overlap.exact_match_score, 0.0);
        assert_eq!(overlap.missing, vec!["rust", "go"]);
    }

    #[test]
    fn test_matched_and_missing_partition_job_skills() {
        let job = set(&["rust", "go", "sql", "aws", "docker"]);
        let overlap = match_skills(&set(&["go", "docker", "java"]), &job);

        assert!(overlap.matched.iter().all(|s| !overlap.missing.contains(s)));
        let mut union: Vec<String> = overlap
            .matched
            .iter()
            .chain(overlap.missing.iter())
            .cloned()
            .collect();
        union.sort();
        let mut expected = job.into_vec();
        expected.sort();
        assert_eq!(union, expected);
    }

    #[test]
    fn test_lists_capped_but_score_uses_full_sets() {
        let job_skills: Vec<String> = (0..40).map(|i| format!("skill{i}")).collect();
        let resume_skills: Vec<String> = job_skills.iter().take(20).cloned().collect();
        let job = set(&job_skills.iter().map(String::as_str).collect::<Vec<_>>());
        let resume = set(&resume_skills.iter().map(String::as_str).collect::<Vec<_>>());

        let overlap = match_skills(&resume, &job);
        assert_eq!(overlap.matched.len(), MAX_REPORTED_SKILLS);
        assert_eq!(overlap.missing.len(), MAX_REPORTED_SKILLS);
        assert_eq!(overlap.exact_match_score, 50.0);
        // deterministic truncation keeps job order
        assert_eq!(overlap.matched[0], "skill0");
        assert_eq!(overlap.missing[0], "skill20");
    }
}
