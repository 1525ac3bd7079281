use serde::de;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::PipelineError;
use crate::models::{AssistantResponse, EntityModel, IntentCategory};
use crate::services::ai::prompts::{intent_classification_prompt, CLASSIFICATION_SYSTEM_PROMPT};
use crate::services::ai::{ChatOptions, LlmProvider, Message};

const CLASSIFICATION_OPTIONS: ChatOptions = ChatOptions {
    temperature: 0.1,
    max_tokens: 1000,
};

/// Fields the model is asked to return. Anything else in the object is ignored.
///
/// Absent keys take their defaults; an explicit `null` for a required value is
/// a type error, not a default.
#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(default = "default_intent")]
    intent_category: String,
    #[serde(default)]
    entities: EntityModel,
    #[serde(default = "default_confidence")]
    confidence_score: f64,
    #[serde(default)]
    follow_up_questions: Vec<String>,
    reasoning: Option<String>,
}

fn default_intent() -> String {
    IntentCategory::Other.as_str().to_string()
}

fn default_confidence() -> f64 {
    0.5
}

/// Sends the classification prompt and returns the model's raw reply.
pub async fn classify_intent(
    llm: &dyn LlmProvider,
    user_input: &str,
) -> Result<String, PipelineError> {
    let messages = [
        Message::system(CLASSIFICATION_SYSTEM_PROMPT),
        Message::user(intent_classification_prompt(user_input)),
    ];

    llm.chat(&messages, CLASSIFICATION_OPTIONS)
        .await
        .map_err(PipelineError::transport)
}

/// Turns a raw model reply into a validated response.
///
/// The reply may be wrapped in a ```` ```json ```` or bare ```` ``` ```` fence.
/// Missing fields take their defaults, `confidence_score` is clamped into
/// `[0.0, 1.0]`, and an intent outside the closed set is rejected.
pub fn parse_assistant_response(raw: &str) -> Result<AssistantResponse, PipelineError> {
    let cleaned = strip_code_fence(raw);

    let parsed = match parse_object(cleaned) {
        Ok(parsed) => parsed,
        // Prose around the object: try the outermost braces before giving up.
        // Valid JSON of the wrong shape is not retried.
        Err(e) if e.is_syntax() || e.is_eof() => {
            let start = cleaned.find('{');
            let end = cleaned.rfind('}');
            match (start, end) {
                (Some(start), Some(end)) if start < end => {
                    tracing::debug!(error = %e, "reply is not bare JSON, retrying outermost braces");
                    parse_object(&cleaned[start..=end])?
                }
                _ => return Err(e.into()),
            }
        }
        Err(e) => return Err(e.into()),
    };

    let intent_category = parsed.intent_category.parse::<IntentCategory>()?;

    let raw_confidence = parsed.confidence_score;
    let confidence_score = raw_confidence.clamp(0.0, 1.0);
    if confidence_score != raw_confidence {
        tracing::warn!(
            confidence = raw_confidence,
            clamped = confidence_score,
            "confidence score out of range, clamping"
        );
    }

    Ok(AssistantResponse {
        intent_category,
        entities: parsed.entities,
        confidence_score,
        follow_up_questions: parsed.follow_up_questions,
        web_search_results: None,
        reasoning: Some(parsed.reasoning.unwrap_or_default()),
    })
}

/// Only a JSON object is accepted; derived `Deserialize` would otherwise read
/// the struct positionally from an array.
fn parse_object(text: &str) -> Result<RawClassification, serde_json::Error> {
    match serde_json::from_str::<Value>(text)? {
        object @ Value::Object(_) => serde_json::from_value(object),
        _ => Err(de::Error::custom("expected a JSON object")),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"));

    match unfenced {
        Some(body) => body.strip_suffix("```").unwrap_or(body).trim(),
        None => trimmed,
    }
}
