//! Ollama LLM client for routing, embeddings, and streamed generation

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use crate::config::LlmConfig;
use crate::error::{Error, Result};
use crate::generation::stream::{AnswerStream, TOKEN_CHANNEL_CAPACITY};

/// Ollama API client
///
/// Failures surface immediately to the caller; the pipeline performs no
/// retries. The configured timeout bounds every request, including the time
/// to first byte of a streamed generation.
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LlmConfig,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    prompt: String,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Configured generation model name
    pub fn generate_model(&self) -> &str {
        &self.config.generate_model
    }

    /// Configured embedding model name
    pub fn embed_model(&self) -> &str {
        &self.config.embed_model
    }

    /// Generate an embedding for a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.base_url);

        let request = EmbedRequest {
            model: self.config.embed_model.clone(),
            prompt: text.to_string(),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::embedding(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::embedding(format!(
                "Embedding failed: HTTP {}",
                response.status()
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| Error::embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(embed_response.embedding)
    }

    /// Generate a complete (non-streaming) response for a prompt.
    /// Used by the triage classifier, which needs one short answer.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: self.config.generate_model.clone(),
            prompt: prompt.to_string(),
            system: None,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Generation failed: HTTP {} - {}",
                status, body
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse generation response: {}", e)))?;

        Ok(generate_response.response)
    }

    /// Generate a streamed response under a system instruction
    ///
    /// Returns an [`AnswerStream`] fed by a producer task that parses the
    /// NDJSON response body. Cancelling the stream aborts the task, which
    /// drops the HTTP response and closes the model call.
    pub async fn stream_complete(&self, system: &str, prompt: &str) -> Result<AnswerStream> {
        let url = format!("{}/api/generate", self.config.base_url);

        let request = GenerateRequest {
            model: self.config.generate_model.clone(),
            prompt: prompt.to_string(),
            system: Some(system.to_string()),
            stream: true,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Stream request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::llm(format!(
                "Stream failed: HTTP {}",
                response.status()
            )));
        }

        let (tx, rx) = mpsc::channel(TOKEN_CHANNEL_CAPACITY);

        let producer = tokio::spawn(async move {
            let mut body = response.bytes_stream();
            // NDJSON lines can straddle network chunk boundaries.
            let mut buffer = String::new();

            'outer: while let Some(chunk) = body.next().await {
                let bytes = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx
                            .send(Err(Error::llm(format!("Stream error: {}", e))))
                            .await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&bytes));

                while let Some(newline) = buffer.find('\n') {
                    let line: String = buffer.drain(..=newline).collect();
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<StreamChunk>(line) {
                        Ok(parsed) => {
                            if !parsed.response.is_empty()
                                && tx.send(Ok(parsed.response)).await.is_err()
                            {
                                // Consumer cancelled or dropped the stream.
                                return;
                            }
                            if parsed.done {
                                break 'outer;
                            }
                        }
                        Err(e) => {
                            let _ = tx
                                .send(Err(Error::llm(format!(
                                    "Failed to parse stream chunk: {}",
                                    e
                                ))))
                                .await;
                            return;
                        }
                    }
                }
            }
        });

        Ok(AnswerStream::new(rx, producer))
    }
}
