// Career advice: retrieval over resume chunks plus a single LLM answer.

pub mod advisor;
pub mod handlers;
pub mod prompts;

pub use advisor::{CareerAdvice, CareerAdvisor};
