//! Transaction records at each step of the statement pipeline:
//! candidate (as extracted) → categorized → validated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::category::Category;
use crate::error::{Error, Result};

/// Raw statement dump (OCR output or pasted text), guaranteed non-blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementText(String);

impl StatementText {
    /// Rejects empty and whitespace-only text.
    pub fn parse(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::invalid_input("Invalid transaction data provided."));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Amount exactly as the model wrote it: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Numeric value, if the amount reads as a finite number.
    /// Strings are trimmed and may group the integer part in thousands
    /// (`1,250.00`); any other comma (`12,00`) makes the amount unreadable.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            RawAmount::Number(n) => *n,
            RawAmount::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                strip_thousands_separators(s)?.parse::<f64>().ok()?
            }
        };
        n.is_finite().then_some(n)
    }
}

/// `s` without its thousands separators, or `None` when a comma appears
/// anywhere other than between groups of three integer digits.
fn strip_thousands_separators(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }

    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    if frac_part.is_some_and(|f| f.contains(',')) {
        return None;
    }

    let all_digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
    let mut groups = int_part.split(',');
    let lead = groups.next()?;
    if lead.is_empty() || lead.len() > 3 || !all_digits(lead) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && all_digits(g)) {
        return None;
    }

    Some(s.replace(',', ""))
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Number(n) => write!(f, "{n}"),
            RawAmount::Text(s) => f.write_str(s),
        }
    }
}

/// Direction of money as declared by the model. Not verified against the
/// sign of the amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionKind {
    Income,
    Expense,
    /// Any other label, carried through untouched.
    Other(String),
}

impl TransactionKind {
    pub fn as_str(&self) -> &str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
            TransactionKind::Other(s) => s,
        }
    }
}

impl From<String> for TransactionKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            _ => TransactionKind::Other(s),
        }
    }
}

impl From<TransactionKind> for String {
    fn from(kind: TransactionKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unvalidated transaction as returned by the extraction step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<RawAmount>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
}

impl CandidateTransaction {
    /// Lenient conversion from one element of the model's JSON array.
    ///
    /// Fields of the wrong JSON type are treated as missing. A non-object
    /// element becomes a candidate with every field missing, so it still
    /// flows through categorization and is dropped at validation.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let text_field = |key: &str| match obj.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let amount = match obj.get("amount") {
            Some(Value::Number(n)) => n.as_f64().map(RawAmount::Number),
            Some(Value::String(s)) => Some(RawAmount::Text(s.clone())),
            _ => None,
        };

        let kind = match obj.get("type") {
            Some(Value::String(s)) => Some(TransactionKind::from(s.clone())),
            _ => None,
        };

        Self {
            date: text_field("date"),
            description: text_field("description"),
            amount,
            kind,
        }
    }

    /// Attach the category. The only way to produce a `CategorizedTransaction`.
    pub fn with_category(self, category: Category) -> CategorizedTransaction {
        CategorizedTransaction {
            date: self.date,
            description: self.description,
            amount: self.amount,
            kind: self.kind,
            category,
        }
    }
}

/// Candidate plus the category it was filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<RawAmount>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    #[serde(default)]
    pub category: Category,
}

/// A transaction that passed validation. `amount` is always finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionKind>,
    pub category: Category,
}

impl ValidatedTransaction {
    pub fn is_expense(&self) -> bool {
        self.kind == Some(TransactionKind::Expense)
    }

    pub fn is_income(&self) -> bool {
        self.kind == Some(TransactionKind::Income)
    }

    /// The date as a calendar day, when the model returned `YYYY-MM-DD`.
    pub fn normalized_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}
