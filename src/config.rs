use std::env;
use std::time::Duration;

use crate::errors::AppError;

pub const DEFAULT_API_VERSION: &str = "2023-12-01-preview";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub azure_endpoint: String,
    pub azure_api_key: String,
    pub azure_deployment: String,
    pub azure_api_version: String,
    pub request_timeout_secs: u64,
}

/// Azure OpenAI credentials that passed startup validation.
#[derive(Clone, Debug)]
pub struct AzureSettings {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            azure_endpoint: env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
            azure_api_key: env::var("AZURE_OPENAI_API_KEY").unwrap_or_default(),
            azure_deployment: env::var("AZURE_OPENAI_DEPLOYMENT_NAME").unwrap_or_default(),
            azure_api_version: env::var("AZURE_OPENAI_API_VERSION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(30),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn azure_settings(&self) -> Result<AzureSettings, AppError> {
        let required = [
            ("AZURE_OPENAI_ENDPOINT", &self.azure_endpoint),
            ("AZURE_OPENAI_API_KEY", &self.azure_api_key),
            ("AZURE_OPENAI_DEPLOYMENT_NAME", &self.azure_deployment),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "{name} environment variable is required"
                )));
            }
        }

        Ok(AzureSettings {
            endpoint: self.azure_endpoint.trim().to_string(),
            api_key: self.azure_api_key.clone(),
            deployment: self.azure_deployment.trim().to_string(),
            api_version: self.azure_api_version.clone(),
        })
    }
}
