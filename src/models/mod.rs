pub mod intent;
pub mod request;
pub mod search;

pub use intent::{AssistantResponse, EntityModel, IntentCategory};
pub use request::UserRequest;
pub use search::WebSearchResult;
