use super::types::{ChatMessage, CompletionOptions};

/// Content budget sent to the model, in characters.
pub const MAX_PROMPT_CHARS: usize = 8000;

/// Output budget for one structuring call.
pub const AI_MAX_TOKENS: u32 = 4000;

/// Low temperature keeps the extraction close to deterministic.
pub const AI_TEMPERATURE: f32 = 0.1;

pub const STRUCTURING_SYSTEM_PROMPT: &str = "You are a data extraction expert. \
Analyze documents and extract structured data in JSON format. \
Respond with a single JSON object and nothing else.";

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Build the user prompt for one document.
pub fn build_structuring_prompt(content: &str, format_hint: &str) -> String {
    let content = truncate_chars(content, MAX_PROMPT_CHARS);

    format!(
        r#"Analyze the following {format_hint} content and extract structured data.
Return the result as a JSON object with exactly this structure:
{{
  "columns": ["column1", "column2", "column3"],
  "data": [
    {{"column1": "value1", "column2": "value2", "column3": "value3"}}
  ]
}}

Every key used in "data" must appear in "columns".

<content>
{content}
</content>

Focus on:
1. Identifying tabular data structures
2. Extracting key-value pairs
3. Recognizing patterns and relationships
4. Preserving data types where possible"#
    )
}

/// System + user messages for one structuring call.
pub fn build_structuring_messages(content: &str, format_hint: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(STRUCTURING_SYSTEM_PROMPT),
        ChatMessage::user(build_structuring_prompt(content, format_hint)),
    ]
}

pub fn structuring_options() -> CompletionOptions {
    CompletionOptions {
        max_tokens: AI_MAX_TOKENS,
        temperature: AI_TEMPERATURE,
    }
}
