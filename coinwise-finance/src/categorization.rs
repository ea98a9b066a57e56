//! Per-transaction categorization through the completion client.
//!
//! All candidates are categorized concurrently (bounded by a semaphore) and
//! joined in input order. A failed or timed-out call files the transaction
//! under `Other`; it never fails the batch.

use futures_util::future::join_all;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use coinwise_core::{CandidateTransaction, CategorizedTransaction, Category};

use crate::completion::{CompletionClient, CompletionError, complete_within};
use crate::prompts;

/// Map a model reply onto the closed category set.
///
/// Exact label first (`"Food"`, `food.`), then a reply that names exactly one
/// category among other words (`Category: Food`). Anything else is `Other`.
pub fn parse_category_reply(reply: &str) -> Category {
    if let Some(category) = Category::from_label(reply) {
        return category;
    }

    let mut named: Vec<Category> = reply
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter_map(Category::from_label)
        .collect();
    named.sort_by_key(|c| c.as_str());
    named.dedup();

    match named.as_slice() {
        [only] => *only,
        _ => {
            debug!(reply = %reply.trim(), "unrecognized category reply, using Other");
            Category::Other
        }
    }
}

/// Ask the model for one transaction's category.
pub async fn request_category<C: CompletionClient + ?Sized>(
    client: &C,
    candidate: &CandidateTransaction,
    timeout: Duration,
) -> Result<Category, CompletionError> {
    let prompt = prompts::categorization_prompt(candidate);
    let reply = complete_within(client, &prompt, timeout).await?;
    Ok(parse_category_reply(&reply))
}

/// Categorize every candidate. Output has the same length and order as the
/// input regardless of individual failures.
pub async fn categorize_all<C: CompletionClient + ?Sized>(
    client: &C,
    candidates: Vec<CandidateTransaction>,
    timeout: Duration,
    max_concurrency: usize,
) -> Vec<CategorizedTransaction> {
    let permits = Semaphore::new(max_concurrency.max(1));

    let jobs = candidates.into_iter().enumerate().map(|(index, candidate)| {
        let permits = &permits;
        async move {
            let outcome = match permits.acquire().await {
                Ok(_permit) => request_category(client, &candidate, timeout).await,
                Err(e) => Err(CompletionError::Request(e.to_string())),
            };

            let category = outcome.unwrap_or_else(|e| {
                warn!(
                    index,
                    description = candidate.description.as_deref().unwrap_or("Unknown"),
                    error = %e,
                    "categorization failed, using Other"
                );
                Category::Other
            });

            candidate.with_category(category)
        }
    });

    join_all(jobs).await
}
