//! Statement text → candidate transactions via one completion call.
//!
//! The reply is untrusted: it must contain a JSON array, either bare, inside
//! a Markdown code fence, or embedded in surrounding prose.

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use coinwise_core::{CandidateTransaction, StatementText};

use crate::completion::{CompletionClient, CompletionError, complete_within};
use crate::prompts;

const EXCERPT_CHARS: usize = 120;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("model reply is not a JSON array: {excerpt:?}")]
    Parse { excerpt: String },
}

/// Ask the model for the statement's transactions. One attempt, no retry.
pub async fn extract_candidates<C: CompletionClient + ?Sized>(
    client: &C,
    statement: &StatementText,
    timeout: Duration,
) -> Result<Vec<CandidateTransaction>, ExtractionError> {
    let prompt = prompts::extraction_prompt(statement);
    let reply = complete_within(client, &prompt, timeout).await?;
    debug!(reply_chars = reply.len(), "extraction reply received");
    parse_extraction_reply(&reply)
}

/// Parse the model's reply into candidates, one per array element.
pub fn parse_extraction_reply(reply: &str) -> Result<Vec<CandidateTransaction>, ExtractionError> {
    let items = json_array_in(reply).ok_or_else(|| ExtractionError::Parse {
        excerpt: excerpt(reply),
    })?;
    Ok(items.iter().map(CandidateTransaction::from_value).collect())
}

fn json_array_in(reply: &str) -> Option<Vec<Value>> {
    let trimmed = reply.trim();

    if let Some(items) = parse_array(trimmed) {
        return Some(items);
    }

    if let Some(items) = fenced_body(trimmed).and_then(|body| parse_array(body.trim())) {
        return Some(items);
    }

    embedded_array(trimmed)
}

/// First array embedded in prose that looks like a transaction list (empty,
/// or holding at least one object). Bracketed asides such as `[3]` are
/// skipped; if nothing better turns up, the first array found is used.
fn embedded_array(text: &str) -> Option<Vec<Value>> {
    let mut fallback = None;
    for (start, _) in text.match_indices('[') {
        let mut values = serde_json::Deserializer::from_str(&text[start..]).into_iter::<Value>();
        let Some(Ok(Value::Array(items))) = values.next() else {
            continue;
        };
        if items.is_empty() || items.iter().any(Value::is_object) {
            return Some(items);
        }
        fallback.get_or_insert(items);
    }
    fallback
}

/// Body of the first Markdown code fence, language tag skipped.
fn fenced_body(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let body = text[open + 3..].trim_start_matches(|c: char| c.is_ascii_alphabetic());
    let close = body.find("```")?;
    Some(&body[..close])
}

fn parse_array(text: &str) -> Option<Vec<Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items),
        _ => None,
    }
}

fn excerpt(reply: &str) -> String {
    let trimmed = reply.trim();
    let mut out: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_CHARS {
        out.push('…');
    }
    out
}
