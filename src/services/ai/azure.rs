use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{ChatOptions, LlmProvider, Message};
use crate::config::AzureSettings;

pub struct AzureOpenAiProvider {
    settings: AzureSettings,
    client: reqwest::Client,
}

impl AzureOpenAiProvider {
    pub fn new(settings: AzureSettings, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build Azure OpenAI HTTP client")?;
        Ok(Self { settings, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.deployment,
            self.settings.api_version,
        )
    }
}

#[async_trait]
impl LlmProvider for AzureOpenAiProvider {
    async fn chat(&self, messages: &[Message], options: ChatOptions) -> anyhow::Result<String> {
        let body = json!({
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let resp = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.settings.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call Azure OpenAI API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Azure OpenAI response")?;

        if !status.is_success() {
            anyhow::bail!("Azure OpenAI API error ({}): {}", status, data["error"]["message"]);
        }

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("Azure OpenAI returned no content"))
    }
}
