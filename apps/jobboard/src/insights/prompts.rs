// Prompt templates for the suggestion adapters.

/// Similar-jobs template. Replace `{user_input}` before sending.
pub const SIMILAR_JOBS_PROMPT_TEMPLATE: &str = "You are a job suggestion service. \
Given the following user input, provide suggestions for job titles and companies \
that the user might be interested in. Return the output in JSON format.

User Input: {user_input}

Do not include any introductory or concluding sentences.";

pub const SIMILAR_JOBS_SCHEMA: &str = r#"{
  "jobTitleSuggestions": ["string"],
  "companySuggestions": ["string"]
}"#;

/// Training-resources template. Replace `{job_description}` before sending.
pub const TRAINING_RESOURCES_PROMPT_TEMPLATE: &str = "You are a helpful assistant that \
recommends online training resources (e.g., courses, tutorials, documentation) to help \
users prepare for a job, based on the job description. The output should be a JSON \
array of strings.

Job Description: {job_description}";

pub const TRAINING_RESOURCES_SCHEMA: &str = r#"{
  "trainingResources": ["string"]
}"#;
