//! Prompt templates for the two completion calls.

use coinwise_core::{CandidateTransaction, Category, RawAmount, StatementText};

/// Marker line at the top of every extraction prompt.
pub const EXTRACTION_HEADER: &str =
    "Analyze the bank statement text below and extract financial transactions.";

pub fn extraction_prompt(statement: &StatementText) -> String {
    format!(
        "{EXTRACTION_HEADER}\n\
         Follow these rules:\n\
         1. Convert dates to YYYY-MM-DD format\n\
         2. Convert amounts to numbers (no currency symbols)\n\
         3. Determine transaction type (income/expense)\n\
         4. Keep original description\n\
         \n\
         {}\n\
         \n\
         Return JSON array only:\n\
         [{{date, description, amount, type}}]",
        statement.as_str()
    )
}

/// Categorization prompt. Missing fields are filled with
/// `Unknown` / `0` / `expense` so the model always sees all three.
pub fn categorization_prompt(candidate: &CandidateTransaction) -> String {
    let description = candidate
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("Unknown");
    let amount = match &candidate.amount {
        Some(RawAmount::Number(n)) if *n != 0.0 && !n.is_nan() => n.to_string(),
        Some(RawAmount::Text(s)) if !s.is_empty() => s.clone(),
        _ => "0".to_string(),
    };
    let kind = candidate
        .kind
        .as_ref()
        .map(|k| k.as_str())
        .filter(|k| !k.is_empty())
        .unwrap_or("expense");

    format!(
        "Categorize this transaction into one of: {}\n\
         Description: {description}\n\
         Amount: {amount}\n\
         Type: {kind}\n\
         \n\
         Respond only with the category name. Example: \"Food\"",
        Category::option_list()
    )
}
