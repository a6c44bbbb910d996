use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::insights::prompts::{TRAINING_RESOURCES_PROMPT_TEMPLATE, TRAINING_RESOURCES_SCHEMA};
use crate::llm_client::prompts::{with_schema, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, TextGenerator};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingResources {
    pub training_resources: Vec<String>,
}

/// Recommends courses, tutorials and documentation for a job description.
pub async fn recommend_training_resources<G>(
    job_description: &str,
    llm: &G,
) -> Result<TrainingResources, AppError>
where
    G: TextGenerator + ?Sized,
{
    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Ok(TrainingResources::default());
    }

    let prompt = with_schema(
        &TRAINING_RESOURCES_PROMPT_TEMPLATE.replace("{job_description}", job_description),
        TRAINING_RESOURCES_SCHEMA,
    );
    let result: TrainingResources = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;

    debug!("Training resources: {}", result.training_resources.len());
    Ok(result)
}
