use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::PipelineError;
use crate::models::WebSearchResult;

pub const FALLBACK_QUESTION: &str =
    "I'm sorry, I couldn't understand your request. Could you please rephrase it?";
pub const FALLBACK_REASONING: &str = "Error occurred during processing";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentCategory {
    Dining,
    Travel,
    Gifting,
    CabBooking,
    Other,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::Dining => "dining",
            IntentCategory::Travel => "travel",
            IntentCategory::Gifting => "gifting",
            IntentCategory::CabBooking => "cab_booking",
            IntentCategory::Other => "other",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntentCategory {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dining" => Ok(IntentCategory::Dining),
            "travel" => Ok(IntentCategory::Travel),
            "gifting" => Ok(IntentCategory::Gifting),
            "cab_booking" => Ok(IntentCategory::CabBooking),
            "other" => Ok(IntentCategory::Other),
            _ => Err(PipelineError::UnknownIntent(s.to_string())),
        }
    }
}

/// Attributes extracted from the user's request. Every slot is optional;
/// `None` means the model did not extract it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntityModel {
    pub date: Option<String>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub destination: Option<String>,
    pub cuisine: Option<String>,
    #[serde(deserialize_with = "whole_number")]
    pub party_size: Option<i64>,
    pub budget: Option<String>,
    pub dietary_restrictions: Option<Vec<String>>,
    pub accommodation_type: Option<String>,
    pub duration: Option<String>,
    pub gift_type: Option<String>,
    pub recipient: Option<String>,
    pub vehicle_type: Option<String>,
    pub pickup_location: Option<String>,
    pub additional_requirements: Option<Vec<String>>,
}

impl EntityModel {
    pub fn is_empty(&self) -> bool {
        *self == EntityModel::default()
    }
}

/// Accepts integers and integral floats (`4.0`); anything fractional is rejected.
fn whole_number<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if let Some(n) = number.as_i64() {
        return Ok(Some(n));
    }
    match number.as_f64() {
        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
            Ok(Some(f as i64))
        }
        _ => Err(D::Error::custom(format!("expected a whole number, found {number}"))),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantResponse {
    pub intent_category: IntentCategory,
    pub entities: EntityModel,
    pub confidence_score: f64,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default)]
    pub web_search_results: Option<Vec<WebSearchResult>>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl AssistantResponse {
    /// The canned response returned whenever classification cannot complete.
    pub fn fallback() -> Self {
        Self {
            intent_category: IntentCategory::Other,
            entities: EntityModel::default(),
            confidence_score: 0.0,
            follow_up_questions: vec![FALLBACK_QUESTION.to_string()],
            web_search_results: None,
            reasoning: Some(FALLBACK_REASONING.to_string()),
        }
    }
}
