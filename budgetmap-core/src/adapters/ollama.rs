//! Ollama category suggester (blocking HTTP, local chat API)

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::config::LlmSettings;
use crate::domain::result::{Error, Result};
use crate::ports::CategorySuggester;

const SYSTEM_PROMPT: &str =
    "You are a budgeting assistant. Reply with a single category name and nothing else.";

#[derive(Debug, Clone)]
pub struct OllamaSuggester {
    http: Client,
    endpoint: String,
    model: String,
}

impl OllamaSuggester {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::suggester(format!("Failed to build HTTP client: {}", e)))?;

        let base = settings.base_url.trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(Error::Config(format!("Invalid LLM base URL: {}", settings.base_url)));
        }

        Ok(Self {
            http,
            endpoint: format!("{}/api/chat", base),
            model: settings.model.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl CategorySuggester for OllamaSuggester {
    fn name(&self) -> &str {
        "ollama"
    }

    fn suggest(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            stream: false,
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                Message {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            options: ChatOptions { temperature: 0.0 },
        };

        tracing::debug!(endpoint = %self.endpoint, model = %self.model, "Requesting category suggestion");

        let response: ChatResponse = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .map_err(|e| Error::suggester(format!("POST {} failed: {}", self.endpoint, e)))?
            .error_for_status()
            .map_err(|e| Error::suggester(format!("POST {} returned non-success status: {}", self.endpoint, e)))?
            .json()
            .map_err(|e| Error::suggester(format!("Failed to parse response from {}: {}", self.endpoint, e)))?;

        response
            .message
            .map(|m| m.content.trim().to_string())
            .ok_or_else(|| Error::suggester("Ollama response had no message content"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: Option<Message>,
}
