// Cross-cutting prompt fragments. Each adapter keeps its own templates.

/// System prompt that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appends the declared output schema to a rendered prompt.
pub fn with_schema(prompt: &str, schema: &str) -> String {
    format!("{prompt}\n\nRespond with a JSON object matching this schema:\n{schema}")
}
