use clap::Subcommand;

use crate::errors::AppError;
use crate::insights::{recommend_training_resources, suggest_similar_jobs};
use crate::state::AppState;

#[derive(Debug, Subcommand)]
pub enum AiCommand {
    /// Suggest job titles and companies related to the input
    Similar { text: String },
    /// Recommend training resources for a job description
    Training { text: String },
}

pub async fn run(cmd: AiCommand, state: &AppState) -> Result<(), AppError> {
    let llm = state
        .llm
        .as_deref()
        .ok_or_else(|| {
            AppError::Config("ANTHROPIC_API_KEY is not set; AI insights are unavailable".to_string())
        })?;

    match cmd {
        AiCommand::Similar { text } => {
            let similar = suggest_similar_jobs(&text, llm).await?;
            if similar.is_empty() {
                println!("No specific suggestions found.");
                return Ok(());
            }
            println!("Job titles:");
            for title in &similar.job_title_suggestions {
                println!("  - {title}");
            }
            println!("Companies:");
            for company in &similar.company_suggestions {
                println!("  - {company}");
            }
        }
        AiCommand::Training { text } => {
            let resources = recommend_training_resources(&text, llm).await?;
            if resources.training_resources.is_empty() {
                println!("No training resources found.");
            }
            for resource in &resources.training_resources {
                println!("  - {resource}");
            }
        }
    }
    Ok(())
}
