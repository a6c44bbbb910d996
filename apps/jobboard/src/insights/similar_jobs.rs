use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::insights::prompts::{SIMILAR_JOBS_PROMPT_TEMPLATE, SIMILAR_JOBS_SCHEMA};
use crate::llm_client::prompts::{with_schema, JSON_ONLY_SYSTEM};
use crate::llm_client::{call_json, TextGenerator};

/// Both arrays are required; a payload missing either is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarJobs {
    pub job_title_suggestions: Vec<String>,
    pub company_suggestions: Vec<String>,
}

impl SimilarJobs {
    pub fn is_empty(&self) -> bool {
        self.job_title_suggestions.is_empty() && self.company_suggestions.is_empty()
    }
}

/// Suggests job titles and companies related to free-form input.
/// Blank input returns an empty result without calling the model.
pub async fn suggest_similar_jobs<G>(user_input: &str, llm: &G) -> Result<SimilarJobs, AppError>
where
    G: TextGenerator + ?Sized,
{
    let user_input = user_input.trim();
    if user_input.is_empty() {
        return Ok(SimilarJobs::default());
    }

    let prompt = with_schema(
        &SIMILAR_JOBS_PROMPT_TEMPLATE.replace("{user_input}", user_input),
        SIMILAR_JOBS_SCHEMA,
    );
    let result: SimilarJobs = call_json(llm, &prompt, JSON_ONLY_SYSTEM).await?;

    debug!(
        "Similar jobs: {} titles, {} companies",
        result.job_title_suggestions.len(),
        result.company_suggestions.len()
    );
    Ok(result)
}
