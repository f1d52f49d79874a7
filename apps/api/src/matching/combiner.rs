/// Weights of the three match signals. Defaults favor exact keyword overlap.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub exact: f64,
    pub semantic: f64,
    pub experience: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            exact: 0.5,
            semantic: 0.3,
            experience: 0.2,
        }
    }
}

/// Weighted sum of the 0–100 sub-scores, clamped to [0, 100] and rounded to
/// one decimal.
pub fn combine_scores(
    exact: f64,
    semantic: f64,
    experience: f64,
    weights: &ScoreWeights,
) -> f64 {
    let raw = weights.exact * exact + weights.semantic * semantic + weights.experience * experience;
    if raw.is_nan() {
        return 0.0;
    }
    round1(raw.clamp(0.0, 100.0))
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
