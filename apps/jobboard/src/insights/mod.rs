//! AI suggestion adapters: a fixed prompt, one model call, a validated
//! JSON payload. Failures here never affect the rest of a command.

pub mod prompts;
pub mod similar_jobs;
pub mod training_resources;

pub use similar_jobs::{suggest_similar_jobs, SimilarJobs};
pub use training_resources::{recommend_training_resources, TrainingResources};
