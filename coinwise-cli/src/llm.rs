use anyhow::{Context, Result};
use async_trait::async_trait;
use coinwise_finance::{CompletionClient, CompletionError};
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::LlmSection;

/// Chat-completions client for OpenAI-compatible APIs (Groq, OpenAI).
/// Each prompt is sent as a single user message.
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: String,
}

#[derive(Serialize)]
struct Msg<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
}

#[derive(Deserialize)]
struct Resp {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: MsgOut,
}

#[derive(Deserialize)]
struct MsgOut {
    content: Option<String>,
}

impl OpenAiCompatClient {
    pub fn new(llm: &LlmSection, api_key: String) -> Result<Self> {
        // Transport-level backstop; the pipeline applies the per-call limit.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(llm.timeout_secs.max(1) * 2))
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            http,
            endpoint: chat_completions_url(&llm.base_url),
            model: llm.model.clone(),
            temperature: llm.temperature,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = Req {
            model: &self.model,
            messages: vec![Msg {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let resp = self
            .http
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;

        let status = resp.status();
        let txt = resp
            .text()
            .await
            .map_err(|e| CompletionError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: txt,
            });
        }

        debug!(model = %self.model, bytes = txt.len(), "completion response");
        parse_chat_response(&txt)
    }
}

pub fn chat_completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

/// `choices[0].message.content`, trimmed.
pub fn parse_chat_response(body: &str) -> Result<String, CompletionError> {
    let out: Resp =
        serde_json::from_str(body).map_err(|e| CompletionError::Malformed(e.to_string()))?;
    let content = out
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| CompletionError::Malformed("no choices[0].message.content".to_string()))?;
    Ok(content.trim().to_string())
}
