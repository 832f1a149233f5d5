//! OpenAI-compatible [`super::LLMClient`], enabled by the `openai`
//! feature.
//!
//! Grounded in `graves-awful_aj`'s `api::create_client` (an
//! `async_openai::Client<OpenAIConfig>` built from a base url + api key)
//! and chat-completion request shape; the teacher's own dependency on
//! `async-openai` in `reflex-server` confirms the crate choice but its
//! usage there is behind a gateway streaming path we don't need (spec.md
//! §4.2 is explicitly non-streaming).

use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, CreateEmbeddingRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;

use super::error::LlmError;
use super::model::{GenerateRequest, GenerateResponse, ModelInfo};
use super::LLMClient;

/// An [`LLMClient`] backed by a live OpenAI-compatible endpoint.
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    embedding_model: String,
    chat_model: String,
}

impl OpenAiLlmClient {
    /// Builds a client from an API key, optional API base, and model
    /// names. Mirrors `awful_aj::api::create_client`'s
    /// `OpenAIConfig::new().with_api_key(..).with_api_base(..)` shape.
    pub fn new(
        api_key: impl Into<String>,
        api_base: Option<String>,
        embedding_model: impl Into<String>,
        chat_model: impl Into<String>,
    ) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(base) = api_base {
            config = config.with_api_base(base);
        }

        Self {
            client: Client::with_config(config),
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
        }
    }
}

#[async_trait]
impl LLMClient for OpenAiLlmClient {
    async fn embed(&self, text: &str) -> Result<Vec<f64>, LlmError> {
        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input([text.to_string()])
            .build()
            .map_err(|e| LlmError::EmbedFailed {
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| LlmError::EmbedFailed {
                reason: e.to_string(),
            })?;

        response
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding.into_iter().map(|v| v as f64).collect())
            .ok_or_else(|| LlmError::EmbedFailed {
                reason: "empty embeddings response".to_string(),
            })
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, LlmError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = CreateEmbeddingRequestArgs::default()
            .model(&self.embedding_model)
            .input(texts.to_vec())
            .build()
            .map_err(|e| LlmError::EmbedFailed {
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(|e| LlmError::EmbedFailed {
                reason: e.to_string(),
            })?;

        Ok(response
            .data
            .into_iter()
            .map(|d| d.embedding.into_iter().map(|v| v as f64).collect())
            .collect())
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse, LlmError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.context)
            .build()
            .map_err(|e| LlmError::GenerateFailed {
                reason: e.to_string(),
            })?
            .into();
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt)
            .build()
            .map_err(|e| LlmError::GenerateFailed {
                reason: e.to_string(),
            })?
            .into();

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.chat_model)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .messages([system, user])
            .build()
            .map_err(|e| LlmError::GenerateFailed {
                reason: e.to_string(),
            })?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| LlmError::GenerateFailed {
                reason: e.to_string(),
            })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::GenerateFailed {
                reason: "empty chat completion response".to_string(),
            })?;

        let text = choice.message.content.unwrap_or_default();
        let tokens = response
            .usage
            .map(|u| u.total_tokens)
            .unwrap_or(0);

        Ok(GenerateResponse { text, tokens })
    }

    async fn health(&self) -> Result<(), LlmError> {
        self.client
            .models()
            .list()
            .await
            .map(|_| ())
            .map_err(|e| LlmError::Unhealthy(e.to_string()))
    }

    async fn model_info(&self) -> Result<ModelInfo, LlmError> {
        Ok(ModelInfo {
            name: self.chat_model.clone(),
            version: "openai-compatible".to_string(),
            size: 0,
            status: "ready".to_string(),
        })
    }
}
