use reqwest::Client;
use serde_json::json;

use chatvault_common::Error;

use crate::models::ProviderConfig;

/// A single message in a chat-completion request.
#[derive(Debug, Clone)]
pub struct PromptMessage {
    pub role: String,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Client for an OpenAI-compatible API: chat completions and embeddings.
pub struct ChatProvider {
    config: ProviderConfig,
    client: Client,
}

impl ChatProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    fn api_base(&self) -> String {
        self.config
            .api_base
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// Chat completion over the configured model. Deterministic settings
    /// (temperature 0) since both callers want classification/grounded output.
    pub async fn chat(&self, messages: &[PromptMessage]) -> Result<String, Error> {
        let payload_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role, "content": m.content }))
            .collect();

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base()))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "model": self.config.chat_model,
                "messages": payload_messages,
                "temperature": 0.0,
            }))
            .send()
            .await?;

        let data = response.json::<serde_json::Value>().await?;

        if let Some(err) = data.get("error") {
            return Err(Error::Ai(format!("chat completion failed: {}", err)));
        }

        let choices = data["choices"]
            .as_array()
            .ok_or_else(|| Error::Ai("invalid chat response format".into()))?;
        if choices.is_empty() {
            return Err(Error::Ai("no completions returned".into()));
        }

        let text = choices[0]["message"]["content"]
            .as_str()
            .ok_or_else(|| Error::Ai("invalid chat response format".into()))?
            .to_string();

        Ok(text)
    }

    /// Embed a batch of texts; returns one vector per input, in order.
    pub async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base()))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&json!({
                "model": self.config.embedding_model,
                "input": texts,
            }))
            .send()
            .await?;

        let data = response.json::<serde_json::Value>().await?;

        if let Some(err) = data.get("error") {
            return Err(Error::Ai(format!("embedding request failed: {}", err)));
        }

        let items = data["data"]
            .as_array()
            .ok_or_else(|| Error::Ai("invalid embedding response format".into()))?;
        if items.len() != texts.len() {
            return Err(Error::Ai(format!(
                "embedding count mismatch: sent {}, got {}",
                texts.len(),
                items.len()
            )));
        }

        let mut vectors = Vec::with_capacity(items.len());
        for item in items {
            let raw = item["embedding"]
                .as_array()
                .ok_or_else(|| Error::Ai("invalid embedding response format".into()))?;
            let vector: Vec<f32> = raw
                .iter()
                .map(|v| v.as_f64().unwrap_or(0.0) as f32)
                .collect();
            vectors.push(vector);
        }

        Ok(vectors)
    }
}
