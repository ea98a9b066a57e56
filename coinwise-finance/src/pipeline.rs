//! Statement pipeline: extraction → categorization → validation →
//! optional spending analysis.

use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{Instrument, info, info_span};

use coinwise_core::{
    SpendingAnalysis, StatementText, ValidatedTransaction, calculate_spending_analysis,
    usable_salary, validate_transactions,
};

use crate::categorization::categorize_all;
use crate::completion::CompletionClient;
use crate::extraction::extract_candidates;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Statement text was empty; nothing was sent to the model.
    #[error("{0}")]
    InvalidInput(String),

    /// Extraction failed (request, timeout or unparsable reply).
    #[error("Processing failed: {0}")]
    Processing(String),
}

impl From<coinwise_core::Error> for PipelineError {
    fn from(e: coinwise_core::Error) -> Self {
        match e {
            coinwise_core::Error::InvalidInput(msg) => PipelineError::InvalidInput(msg),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Upper bound on each completion call.
    pub request_timeout: Duration,
    /// Categorization calls in flight at once.
    pub max_concurrency: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// Pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedStatement {
    pub transactions: Vec<ValidatedTransaction>,
    /// `None` unless a positive salary was supplied.
    pub spending_analysis: Option<SpendingAnalysis>,
}

impl ProcessedStatement {
    /// Success envelope: `{success, count, transactions, spendingAnalysis}`.
    pub fn to_response(&self) -> StatementResponse<'_> {
        StatementResponse {
            success: true,
            count: self.transactions.len(),
            transactions: &self.transactions,
            spending_analysis: self.spending_analysis.as_ref(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResponse<'a> {
    pub success: bool,
    pub count: usize,
    pub transactions: &'a [ValidatedTransaction],
    pub spending_analysis: Option<&'a SpendingAnalysis>,
}

/// Failure envelope: `{error, details}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String,
}

impl ErrorResponse {
    pub fn new(details: impl Into<String>) -> Self {
        Self {
            error: "Failed to process transactions".to_string(),
            details: details.into(),
        }
    }
}

/// Runs statements through a completion client. Holds no state between
/// calls; one instance can serve many statements.
pub struct StatementPipeline<C> {
    client: C,
    options: PipelineOptions,
}

impl<C: CompletionClient> StatementPipeline<C> {
    pub fn new(client: C) -> Self {
        Self::with_options(client, PipelineOptions::default())
    }

    pub fn with_options(client: C, options: PipelineOptions) -> Self {
        Self { client, options }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    /// Process raw statement text.
    ///
    /// Empty text fails with `InvalidInput` before any completion call.
    /// Extraction failures fail the whole call with `Processing`.
    /// Categorization failures are absorbed (`Other`). Spending analysis is
    /// attached only for a finite salary above zero.
    pub async fn process_transaction_data(
        &self,
        text: &str,
        salary: Option<f64>,
    ) -> Result<ProcessedStatement, PipelineError> {
        let statement = StatementText::parse(text)?;

        async {
            let candidates =
                extract_candidates(&self.client, &statement, self.options.request_timeout)
                    .await
                    .map_err(|e| PipelineError::Processing(e.to_string()))?;
            info!(candidates = candidates.len(), "extracted transactions");

            let categorized = categorize_all(
                &self.client,
                candidates,
                self.options.request_timeout,
                self.options.max_concurrency,
            )
            .await;

            let transactions = validate_transactions(categorized);
            info!(valid = transactions.len(), "validated transactions");

            let spending_analysis =
                usable_salary(salary).map(|s| calculate_spending_analysis(&transactions, s));

            Ok::<_, PipelineError>(ProcessedStatement {
                transactions,
                spending_analysis,
            })
        }
        .instrument(info_span!("process_statement", chars = statement.as_str().len()))
        .await
    }
}
