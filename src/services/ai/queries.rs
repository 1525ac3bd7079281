use crate::services::ai::prompts::web_search_prompt;
use crate::services::ai::{ChatOptions, LlmProvider, Message};

const QUERY_OPTIONS: ChatOptions = ChatOptions {
    temperature: 0.3,
    max_tokens: 200,
};

pub const MAX_SEARCH_QUERIES: usize = 3;

/// Asks the model for search queries, one per line. Never returns an empty
/// list: any failure falls back to the user's input verbatim.
pub async fn generate_search_queries(llm: &dyn LlmProvider, user_input: &str) -> Vec<String> {
    let messages = [Message::user(web_search_prompt(user_input))];

    let content = match llm.chat(&messages, QUERY_OPTIONS).await {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(error = %e, "failed to generate search queries, using user input");
            return vec![user_input.to_string()];
        }
    };

    let queries = split_queries(&content);
    if queries.is_empty() {
        tracing::warn!("query generation returned no usable lines, using user input");
        return vec![user_input.to_string()];
    }

    queries
}

fn split_queries(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_SEARCH_QUERIES)
        .map(str::to_string)
        .collect()
}
