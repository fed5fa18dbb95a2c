//! Model-backed semantic comparator
//!
//! Talks to an OpenAI-compatible chat-completions endpoint and asks the model
//! for a JSON verdict.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::common::config::ComparatorConfig;
use crate::common::{Error, Result};

use super::{SemanticComparator, Verdict};

const COMPLETIONS_PATH: &str = "/chat/completions";

const SYSTEM_PROMPT: &str = "You are a strict semantic validator. \
Answer only with a JSON object of the form {\"success\": true|false, \"message\": \"<reason>\"}. \
When success is false, the message explains why the check does not hold.";

/// Comparator backed by a chat-completions model
pub struct ModelComparator {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl ModelComparator {
    /// Create a comparator for the given endpoint and credential
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self> {
        Self::from_config(&ComparatorConfig {
            endpoint: Some(endpoint.to_string()),
            api_key: Some(api_key.to_string()),
            ..ComparatorConfig::default()
        })
    }

    /// Create a comparator from the `[comparator]` configuration section
    pub fn from_config(config: &ComparatorConfig) -> Result<Self> {
        let (endpoint, api_key) = config.credentials()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("scenario-assert/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: completions_url(endpoint),
            api_key: api_key.to_string(),
            model: config.model.clone(),
        })
    }

    /// Use a different model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn ask(&self, prompt: &str) -> Result<Verdict> {
        let request = ChatRequest {
            model: &self.model,
            temperature: 0.0,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        tracing::debug!(url = %self.url, model = %self.model, "Sending semantic check");

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Comparator(format!(
                "endpoint returned status {}: {}",
                status,
                truncate(&body, 200)
            )));
        }

        let reply: ChatResponse = response.json().await?;
        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::Comparator("response contained no message".to_string()))?;

        parse_verdict(&content)
    }
}

#[async_trait]
impl SemanticComparator for ModelComparator {
    async fn are_similar(&self, first: &str, second: &str) -> Result<Verdict> {
        let prompt = format!(
            "Check whether the two texts below are semantically similar, \
             i.e. they convey the same meaning even if worded differently.\n\n\
             [[TEXT 1]]\n{first}\n\n[[TEXT 2]]\n{second}"
        );
        self.ask(&prompt).await
    }

    async fn has_condition(&self, text: &str, condition: &str) -> Result<Verdict> {
        let prompt = format!(
            "Check whether the text below meets the given condition.\n\n\
             [[CONDITION]]\n{condition}\n\n[[TEXT]]\n{text}"
        );
        self.ask(&prompt).await
    }
}

/// Resolve the chat-completions URL from a configured endpoint
fn completions_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.ends_with(COMPLETIONS_PATH) {
        endpoint.to_string()
    } else {
        format!("{endpoint}{COMPLETIONS_PATH}")
    }
}

/// Parse the model's JSON verdict, tolerating a fenced code block around it
fn parse_verdict(content: &str) -> Result<Verdict> {
    let trimmed = content.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    serde_json::from_str(body).map_err(|e| {
        Error::Comparator(format!(
            "unexpected verdict format ({e}): {}",
            truncate(body, 200)
        ))
    })
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        assert_eq!(
            completions_url("https://api.example.com/v1"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.example.com/v1/"),
            "https://api.example.com/v1/chat/completions"
        );
        assert_eq!(
            completions_url("http://localhost:11434/v1/chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_parse_verdict() {
        let verdict = parse_verdict(r#"{"success": true, "message": ""}"#).unwrap();
        assert!(verdict.is_valid);

        let verdict = parse_verdict(
            "```json\n{\"success\": false, \"message\": \"The answer talks about cats\"}\n```",
        )
        .unwrap();
        assert_eq!(verdict, Verdict::invalid("The answer talks about cats"));

        let verdict = parse_verdict(r#"{"success": false}"#).unwrap();
        assert!(!verdict.is_valid);
        assert!(verdict.reason.is_empty());
    }

    #[test]
    fn test_parse_verdict_rejects_prose() {
        let err = parse_verdict("Yes, they are similar.").unwrap_err();
        assert!(matches!(err, Error::Comparator(_)));
    }

    #[test]
    fn test_new_requires_nothing_but_credentials() {
        let comparator = ModelComparator::new("https://api.example.com/v1", "sk-test").unwrap();
        assert_eq!(comparator.url(), "https://api.example.com/v1/chat/completions");
        let comparator = comparator.with_model("local");
        assert_eq!(comparator.model, "local");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé...");
        assert_eq!(truncate("hi", 10), "hi");
    }
}
