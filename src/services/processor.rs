use tracing::{Instrument, Span};

use crate::errors::PipelineError;
use crate::models::{AssistantResponse, IntentCategory, WebSearchResult};
use crate::services::ai::{intent, queries, LlmProvider};
use crate::services::search::{self, SearchProvider, RESULTS_PER_QUERY};

/// Runs one request through classify, normalize and (for `other`) search.
///
/// `process` never fails: classification errors end in
/// [`AssistantResponse::fallback`] and search errors end in an empty result
/// list. Log events are emitted under the span passed to [`with_span`].
///
/// [`with_span`]: IntentProcessor::with_span
pub struct IntentProcessor {
    llm: Box<dyn LlmProvider>,
    search: Box<dyn SearchProvider>,
    span: Span,
}

impl IntentProcessor {
    pub fn new(llm: Box<dyn LlmProvider>, search: Box<dyn SearchProvider>) -> Self {
        Self {
            llm,
            search,
            span: Span::none(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub async fn process(&self, user_input: &str) -> AssistantResponse {
        let span = tracing::info_span!(parent: &self.span, "process_user_input");

        async {
            tracing::info!(user_input = %user_input, "processing user input");
            match self.classify(user_input).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(error = %e, "error processing user input, returning fallback");
                    AssistantResponse::fallback()
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn classify(&self, user_input: &str) -> Result<AssistantResponse, PipelineError> {
        let raw = intent::classify_intent(self.llm.as_ref(), user_input).await?;
        let mut response = intent::parse_assistant_response(&raw).map_err(|e| {
            tracing::error!(error = %e, "error parsing LLM response");
            e
        })?;

        tracing::info!(
            intent = %response.intent_category,
            confidence = response.confidence_score,
            "classified user input"
        );

        if response.intent_category == IntentCategory::Other {
            response.web_search_results = Some(self.web_search(user_input).await);
        }

        Ok(response)
    }

    async fn web_search(&self, user_input: &str) -> Vec<WebSearchResult> {
        let queries = queries::generate_search_queries(self.llm.as_ref(), user_input).await;
        let results = search::multi_search(self.search.as_ref(), &queries, RESULTS_PER_QUERY).await;
        tracing::info!(
            queries = queries.len(),
            results = results.len(),
            "web search completed"
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use super::*;
    use crate::models::intent::{FALLBACK_QUESTION, FALLBACK_REASONING};
    use crate::services::ai::{ChatOptions, Message};

    /// Replies in order; errors once the script runs out.
    struct ScriptedLlm {
        replies: Mutex<VecDeque<anyhow::Result<String>>>,
        calls: Arc<Mutex<Vec<Vec<Message>>>>,
    }

    impl ScriptedLlm {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Arc::new(Mutex::new(vec![])),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        async fn chat(&self, messages: &[Message], _options: ChatOptions) -> anyhow::Result<String> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow::anyhow!("no scripted reply")))
        }
    }

    struct RecordingSearch {
        hits: Vec<WebSearchResult>,
        queries: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SearchProvider for RecordingSearch {
        async fn search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<WebSearchResult>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(self.hits.iter().take(max_results).cloned().collect())
        }
    }

    fn processor(
        replies: Vec<anyhow::Result<String>>,
        hits: Vec<WebSearchResult>,
    ) -> (IntentProcessor, Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<Vec<Message>>>>) {
        let llm = ScriptedLlm::new(replies);
        let llm_calls = Arc::clone(&llm.calls);
        let searched = Arc::new(Mutex::new(vec![]));
        let search = RecordingSearch {
            hits,
            queries: Arc::clone(&searched),
        };
        (
            IntentProcessor::new(Box::new(llm), Box::new(search)),
            searched,
            llm_calls,
        )
    }

    fn assert_fallback(response: &AssistantResponse) {
        assert_eq!(response.intent_category, IntentCategory::Other);
        assert_eq!(response.confidence_score, 0.0);
        assert_eq!(response.follow_up_questions, vec![FALLBACK_QUESTION.to_string()]);
        assert_eq!(response.reasoning.as_deref(), Some(FALLBACK_REASONING));
        assert!(response.entities.is_empty());
        assert!(response.web_search_results.is_none());
    }

    fn other_payload() -> String {
        r#"{"intent_category":"other","entities":{},"confidence_score":0.85,"follow_up_questions":[],"reasoning":"General information query requiring web search"}"#
            .to_string()
    }

    #[tokio::test]
    async fn test_fenced_dining_request() {
        let raw = "```json\n        {\n            \"intent_category\": \"dining\",\n            \"entities\": {\"party_size\": 4},\n            \"confidence_score\": 0.9,\n            \"follow_up_questions\": [\"What cuisine do you prefer?\"],\n            \"reasoning\": \"Dining request identified\"\n        }\n        ```";
        let (processor, searched, llm_calls) = processor(vec![Ok(raw.to_string())], vec![]);

        let result = processor.process("Book a table for 4").await;

        assert_eq!(result.intent_category, IntentCategory::Dining);
        assert_eq!(result.entities.party_size, Some(4));
        assert_eq!(result.confidence_score, 0.9);
        assert!(result.web_search_results.is_none());
        assert!(searched.lock().unwrap().is_empty());

        let calls = llm_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, "system");
        assert!(calls[0][1].content.contains("Book a table for 4"));
    }

    #[tokio::test]
    async fn test_non_other_intents_skip_search() {
        for intent in ["dining", "travel", "gifting", "cab_booking"] {
            let raw = format!(r#"{{"intent_category":"{intent}","confidence_score":0.8}}"#);
            let (processor, searched, _) = processor(vec![Ok(raw)], vec![]);

            let result = processor.process("anything").await;

            assert_eq!(result.intent_category.as_str(), intent);
            assert!(result.web_search_results.is_none());
            assert!(searched.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_invalid_json_returns_fallback() {
        let (processor, _, _) = processor(vec![Ok("Invalid JSON response".to_string())], vec![]);
        let result = processor.process("Test input").await;
        assert_fallback(&result);
    }

    #[tokio::test]
    async fn test_api_error_returns_fallback() {
        let (processor, searched, _) = processor(vec![Err(anyhow::anyhow!("API Error"))], vec![]);
        let result = processor.process("Test input").await;
        assert_fallback(&result);
        assert!(searched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_intent_returns_fallback() {
        let raw = r#"{"intent_category":"shopping","confidence_score":0.9}"#.to_string();
        let (processor, searched, _) = processor(vec![Ok(raw)], vec![]);
        let result = processor.process("Buy shoes").await;
        assert_fallback(&result);
        assert!(searched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_null_intent_returns_fallback_without_search() {
        let raw = r#"{"intent_category":null,"confidence_score":0.9}"#.to_string();
        let (processor, searched, llm_calls) = processor(vec![Ok(raw)], vec![]);

        let result = processor.process("Something vague").await;

        assert_fallback(&result);
        assert!(searched.lock().unwrap().is_empty());
        // No query-generation call either.
        assert_eq!(llm_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_array_payload_returns_fallback() {
        let raw = r#"["dining", {"party_size": 2}, 0.9, [], "r"]"#.to_string();
        let (processor, searched, _) = processor(vec![Ok(raw)], vec![]);

        let result = processor.process("Table for two").await;

        assert_fallback(&result);
        assert!(searched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_intent_with_web_search() {
        let hits = vec![WebSearchResult::new(
            "How to Update Address in Aadhar Card Online",
            "https://example.com/aadhar-update",
            "Step by step guide to update address in Aadhar card online...",
        )];
        let (processor, searched, _) = processor(
            vec![
                Ok(other_payload()),
                Ok("Aadhar card address update online\nAadhar address change process".to_string()),
            ],
            hits,
        );

        let result = processor.process("How to update address in Aadhar card online").await;

        assert_eq!(result.intent_category, IntentCategory::Other);
        assert_eq!(result.confidence_score, 0.85);
        let web = result.web_search_results.unwrap();
        // Both queries return the same page; it survives once.
        assert_eq!(web.len(), 1);
        assert!(web[0].title.contains("Aadhar"));
        assert_eq!(
            *searched.lock().unwrap(),
            vec!["Aadhar card address update online", "Aadhar address change process"]
        );
    }

    #[tokio::test]
    async fn test_query_generation_error_searches_user_input() {
        let (processor, searched, _) = processor(
            vec![Ok(other_payload()), Err(anyhow::anyhow!("Query generation failed"))],
            vec![],
        );

        let result = processor.process("Test query").await;

        assert_eq!(result.intent_category, IntentCategory::Other);
        assert_eq!(result.web_search_results, Some(vec![]));
        assert_eq!(*searched.lock().unwrap(), vec!["Test query"]);
    }

    #[tokio::test]
    async fn test_confidence_always_in_range() {
        for score in ["-0.5", "0", "0.42", "1", "7.5"] {
            let raw = format!(r#"{{"intent_category":"travel","confidence_score":{score}}}"#);
            let (processor, _, _) = processor(vec![Ok(raw)], vec![]);
            let result = processor.process("Trip to Goa").await;
            assert!((0.0..=1.0).contains(&result.confidence_score), "score {score}");
        }
    }
}
