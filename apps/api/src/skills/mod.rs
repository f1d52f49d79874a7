// Skill vocabulary: synonym normalization and keyword extraction.
// Both tables are JSON assets under data/ and can be swapped via config.

use thiserror::Error;

pub mod extractor;
pub mod normalizer;

pub use extractor::SkillExtractor;
pub use normalizer::SkillSet;

#[derive(Debug, Error)]
pub enum SkillDbError {
    #[error("failed to read skill asset '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid skill asset JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid skill pattern: {0}")]
    Pattern(#[from] regex::Error),
}
