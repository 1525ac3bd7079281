use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct UserRequest {
    pub user_input: String,
}
