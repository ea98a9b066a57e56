//! Load already-categorized transactions from disk for `coinwise analyze`.
//!
//! Accepted shapes:
//! - JSON: a bare array, or an object with a `transactions` array (the
//!   `process --json` envelope round-trips).
//! - CSV: header row with `date,description,amount,type,category`; column
//!   order and header case do not matter, unknown columns are ignored.
//!
//! Rows go through the same validation as pipeline output; unknown
//! category labels fall back to `Other`.

use anyhow::{Context, Result, bail};
use coinwise_core::{CandidateTransaction, Category, ValidatedTransaction, validate_transactions};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::info;

const CSV_COLUMNS: [&str; 5] = ["date", "description", "amount", "type", "category"];

pub fn load_transactions(path: &Path) -> Result<Vec<ValidatedTransaction>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let rows = match ext.as_deref() {
        Some("json") => {
            let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
            json_rows(&s).with_context(|| format!("parsing {}", path.display()))?
        }
        Some("csv") => {
            let rdr = csv::ReaderBuilder::new()
                .flexible(true)
                .trim(csv::Trim::All)
                .from_path(path)
                .with_context(|| format!("opening {}", path.display()))?;
            csv_rows(rdr).with_context(|| format!("parsing {}", path.display()))?
        }
        _ => bail!(
            "unsupported file type: {} (expected .json or .csv)",
            path.display()
        ),
    };

    let total = rows.len();
    let txns = to_validated(&rows);
    info!(path = %path.display(), total, kept = txns.len(), "loaded transactions");
    Ok(txns)
}

fn json_rows(s: &str) -> Result<Vec<Value>> {
    let v: Value = serde_json::from_str(s)?;
    match v {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("transactions") {
            Some(Value::Array(items)) => Ok(items),
            _ => bail!("expected a `transactions` array"),
        },
        _ => bail!("expected a JSON array of transactions"),
    }
}

fn csv_rows<R: std::io::Read>(mut rdr: csv::Reader<R>) -> Result<Vec<Value>> {
    let headers = rdr.headers()?.clone();
    let columns: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            let h = h.to_ascii_lowercase();
            CSV_COLUMNS
                .iter()
                .find(|c| **c == h)
                .map(|c| (i, *c))
        })
        .collect();

    if !columns.iter().any(|(_, c)| *c == "amount") {
        bail!("CSV header has no `amount` column");
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let mut obj = Map::new();
        for (i, name) in &columns {
            match record.get(*i) {
                Some(cell) if !cell.is_empty() => {
                    obj.insert((*name).to_string(), Value::String(cell.to_string()));
                }
                _ => {}
            }
        }
        rows.push(Value::Object(obj));
    }
    Ok(rows)
}

fn category_of(row: &Value) -> Category {
    row.get("category")
        .and_then(Value::as_str)
        .and_then(Category::from_label)
        .unwrap_or_default()
}

fn to_validated(rows: &[Value]) -> Vec<ValidatedTransaction> {
    validate_transactions(
        rows.iter()
            .map(|row| CandidateTransaction::from_value(row).with_category(category_of(row))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use coinwise_core::TransactionKind;

    #[test]
    fn test_json_bare_array() {
        let rows = json_rows(
            r#"[{"date":"2024-01-01","description":"Lunch","amount":12.5,"type":"expense","category":"Food"}]"#,
        )
        .unwrap();
        let txns = to_validated(&rows);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, Category::Food);
        assert_eq!(txns[0].amount, 12.5);
        assert!(txns[0].is_expense());
    }

    #[test]
    fn test_json_envelope() {
        let rows = json_rows(
            r#"{"success":true,"count":2,"transactions":[
                {"date":"2024-01-01","description":"Rent","amount":950,"type":"expense","category":"Rent"},
                {"date":"2024-01-02","description":"Pay","amount":"2,000.00","type":"income","category":"Salary"}
            ]}"#,
        )
        .unwrap();
        let txns = to_validated(&rows);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[1].amount, 2000.0);
        assert_eq!(txns[1].kind, Some(TransactionKind::Income));
    }

    #[test]
    fn test_json_wrong_shape() {
        assert!(json_rows(r#"{"items":[]}"#).is_err());
        assert!(json_rows("42").is_err());
    }

    #[test]
    fn test_unknown_category_is_other_and_invalid_rows_dropped() {
        let rows = json_rows(
            r#"[
                {"date":"2024-01-01","description":"Gym","amount":30,"type":"expense","category":"Fitness"},
                {"date":"","description":"No date","amount":1,"type":"expense","category":"Food"},
                {"date":"2024-01-03","description":"Bad amount","amount":"abc","type":"expense"}
            ]"#,
        )
        .unwrap();
        let txns = to_validated(&rows);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, Category::Other);
    }

    #[test]
    fn test_decorated_category_labels() {
        let rows = json_rows(
            r#"[
                {"date":"2024-01-01","description":"Deli","amount":9,"type":"expense","category":"\"Food\"."},
                {"date":"2024-01-02","description":"Flat","amount":900,"type":"expense","category":"'rent'!"}
            ]"#,
        )
        .unwrap();
        let txns = to_validated(&rows);
        assert_eq!(txns[0].category, Category::Food);
        assert_eq!(txns[1].category, Category::Rent);
    }

    #[test]
    fn test_european_decimal_comma_dropped() {
        let rows = json_rows(
            r#"[{"date":"2024-01-01","description":"Cafe","amount":"12,00","type":"expense","category":"Food"}]"#,
        )
        .unwrap();
        assert!(to_validated(&rows).is_empty());
    }

    #[test]
    fn test_csv_any_column_order() {
        let data = "\
Category,Amount,Date,Description,Type,Notes
food,4.50,2024-01-01,Coffee,expense,morning
Transport, 12.00 ,2024-01-02,Bus pass,expense,
,2000,2024-01-03,Payroll,income,
";
        let rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        let txns = to_validated(&csv_rows(rdr).unwrap());
        assert_eq!(txns.len(), 3);
        assert_eq!(txns[0].category, Category::Food);
        assert_eq!(txns[1].category, Category::Transport);
        assert_eq!(txns[1].amount, 12.0);
        assert_eq!(txns[2].category, Category::Other);
        assert!(txns[2].is_income());
    }

    #[test]
    fn test_csv_without_amount_column() {
        let rdr = csv::Reader::from_reader("date,description\n2024-01-01,x\n".as_bytes());
        assert!(csv_rows(rdr).is_err());
    }

    #[test]
    fn test_unsupported_extension() {
        let err = load_transactions(Path::new("statement.pdf")).unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }
}
