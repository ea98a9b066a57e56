//! Spending-vs-salary analysis over validated transactions.
//!
//! Only expenses with a positive amount count. Figures are reported as
//! 2-decimal strings; the zero-expense result keeps its historical
//! `"0%"` marker instead of a bare number.

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::category::Category;
use crate::transaction::ValidatedTransaction;

/// Per-category figures, all formatted to 2 decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySpending {
    pub amount: String,
    pub percent_of_salary: String,
    pub percent_of_total_expenses: String,
}

/// Category figures in order of first occurrence. Serializes as a JSON
/// object keyed by category name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(Vec<(Category, CategorySpending)>);

impl CategoryBreakdown {
    pub fn get(&self, category: Category) -> Option<&CategorySpending> {
        self.0.iter().find(|(c, _)| *c == category).map(|(_, s)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategorySpending)> {
        self.0.iter().map(|(c, s)| (*c, s))
    }

    pub fn categories(&self) -> Vec<Category> {
        self.0.iter().map(|(c, _)| *c).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (category, spending) in &self.0 {
            map.serialize_entry(category.as_str(), spending)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingAnalysis {
    pub total_expenses: f64,
    /// `totalExpenses / salary * 100` to 2 decimals, or `"0%"` when there
    /// are no expenses.
    pub percent_of_salary: String,
    pub categories: CategoryBreakdown,
}

impl SpendingAnalysis {
    /// Result for a transaction set with no counted expenses.
    pub fn empty() -> Self {
        Self {
            total_expenses: 0.0,
            percent_of_salary: "0%".to_string(),
            categories: CategoryBreakdown::default(),
        }
    }
}

/// Aggregate expenses per category relative to `salary`.
///
/// Callers gate on a usable salary first (see [`usable_salary`]); this
/// function does not re-check it.
pub fn calculate_spending_analysis(txns: &[ValidatedTransaction], salary: f64) -> SpendingAnalysis {
    let mut by_category: Vec<(Category, f64)> = Vec::new();
    let mut total_expenses = 0.0;

    for txn in txns.iter().filter(|t| t.is_expense() && t.amount > 0.0) {
        match by_category.iter_mut().find(|(c, _)| *c == txn.category) {
            Some((_, sum)) => *sum += txn.amount,
            None => by_category.push((txn.category, txn.amount)),
        }
        total_expenses += txn.amount;
    }

    if total_expenses == 0.0 {
        return SpendingAnalysis::empty();
    }

    let categories = by_category
        .into_iter()
        .map(|(category, amount)| {
            let spending = CategorySpending {
                amount: to_fixed_2(amount),
                percent_of_salary: to_fixed_2(amount / salary * 100.0),
                percent_of_total_expenses: to_fixed_2(amount / total_expenses * 100.0),
            };
            (category, spending)
        })
        .collect();

    SpendingAnalysis {
        total_expenses,
        percent_of_salary: to_fixed_2(total_expenses / salary * 100.0),
        categories: CategoryBreakdown(categories),
    }
}

/// Analysis runs only for a finite salary strictly above zero.
pub fn usable_salary(salary: Option<f64>) -> Option<f64> {
    salary.filter(|s| s.is_finite() && *s > 0.0)
}

/// Lenient salary parsing: reads the longest numeric prefix of the input,
/// so `"2500/month"` is 2500 and `"abc"` is `None`.
pub fn parse_salary(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Format with exactly two decimals, rounding half-up on the cent.
/// Noise below a millionth of a cent is discarded first, so
/// `4.5 / 2000 * 100` (0.22499999999999998) reports `"0.23"`.
pub fn to_fixed_2(value: f64) -> String {
    let cents = (value.abs() * 100.0 * 1e6).round() / 1e6;
    let rounded = (cents + 0.5).floor() / 100.0;
    if value < 0.0 && rounded > 0.0 {
        format!("-{rounded:.2}")
    } else {
        format!("{rounded:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionKind;
    use serde_json::json;

    fn expense(desc: &str, amount: f64, category: Category) -> ValidatedTransaction {
        ValidatedTransaction {
            date: "2024-01-05".to_string(),
            description: desc.to_string(),
            amount,
            kind: Some(TransactionKind::Expense),
            category,
        }
    }

    fn income(desc: &str, amount: f64) -> ValidatedTransaction {
        ValidatedTransaction {
            kind: Some(TransactionKind::Income),
            ..expense(desc, amount, Category::Salary)
        }
    }

    fn parse_2dp(s: &str) -> f64 {
        s.parse().unwrap()
    }

    #[test]
    fn test_single_coffee_against_salary() {
        let txns = vec![expense("Coffee Shop", 4.5, Category::Food)];
        let analysis = calculate_spending_analysis(&txns, 2000.0);
        assert_eq!(
            serde_json::to_value(&analysis).unwrap(),
            json!({
                "totalExpenses": 4.5,
                "percentOfSalary": "0.23",
                "categories": {
                    "Food": {"amount": "4.50", "percentOfSalary": "0.23", "percentOfTotalExpenses": "100.00"}
                }
            })
        );
    }

    #[test]
    fn test_zero_expenses_short_circuits() {
        let txns = vec![income("Payroll", 3000.0), expense("Refund", -20.0, Category::Food)];
        let analysis = calculate_spending_analysis(&txns, 2000.0);
        assert_eq!(analysis, SpendingAnalysis::empty());
        assert_eq!(
            serde_json::to_value(&analysis).unwrap(),
            json!({"totalExpenses": 0.0, "percentOfSalary": "0%", "categories": {}})
        );
    }

    #[test]
    fn test_empty_input_short_circuits() {
        assert_eq!(calculate_spending_analysis(&[], 1000.0), SpendingAnalysis::empty());
    }

    #[test]
    fn test_income_zero_and_untyped_excluded() {
        let mut untyped = expense("Mystery", 50.0, Category::Other);
        untyped.kind = None;
        let txns = vec![
            expense("Groceries", 60.0, Category::Food),
            income("Payroll", 3000.0),
            expense("Waived fee", 0.0, Category::Utilities),
            untyped,
        ];
        let analysis = calculate_spending_analysis(&txns, 3000.0);
        assert_eq!(analysis.total_expenses, 60.0);
        assert_eq!(analysis.categories.categories(), vec![Category::Food]);
    }

    #[test]
    fn test_categories_in_first_occurrence_order() {
        let txns = vec![
            expense("Bus", 2.0, Category::Transport),
            expense("Rent", 900.0, Category::Rent),
            expense("Lunch", 12.0, Category::Food),
            expense("Train", 8.0, Category::Transport),
        ];
        let analysis = calculate_spending_analysis(&txns, 3000.0);
        assert_eq!(
            analysis.categories.categories(),
            vec![Category::Transport, Category::Rent, Category::Food]
        );
        assert_eq!(analysis.categories.get(Category::Transport).unwrap().amount, "10.00");

        let out = serde_json::to_string(&analysis.categories).unwrap();
        let at = |key: &str| out.find(&format!("\"{key}\":")).unwrap();
        assert!(at("Transport") < at("Rent"));
        assert!(at("Rent") < at("Food"));
    }

    #[test]
    fn test_idempotent() {
        let txns = vec![
            expense("Bus", 2.35, Category::Transport),
            expense("Doctor", 120.0, Category::Healthcare),
        ];
        let a = calculate_spending_analysis(&txns, 2500.0);
        let b = calculate_spending_analysis(&txns, 2500.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_category_amounts_sum_to_total() {
        let txns = vec![
            expense("A", 10.333, Category::Food),
            expense("B", 20.337, Category::Transport),
            expense("C", 5.1, Category::Food),
            expense("D", 99.999, Category::Entertainment),
            expense("E", 0.015, Category::Utilities),
        ];
        let analysis = calculate_spending_analysis(&txns, 4200.0);
        let sum: f64 = analysis.categories.iter().map(|(_, s)| parse_2dp(&s.amount)).sum();
        let tolerance = 0.01 * analysis.categories.len() as f64;
        assert!((sum - analysis.total_expenses).abs() <= tolerance);
    }

    #[test]
    fn test_percent_of_total_sums_to_hundred() {
        let txns = vec![
            expense("A", 33.33, Category::Food),
            expense("B", 33.33, Category::Rent),
            expense("C", 33.34, Category::Healthcare),
        ];
        let analysis = calculate_spending_analysis(&txns, 1000.0);
        let sum: f64 = analysis
            .categories
            .iter()
            .map(|(_, s)| parse_2dp(&s.percent_of_total_expenses))
            .sum();
        assert!((sum - 100.0).abs() <= 0.01 * analysis.categories.len() as f64);
        assert_eq!(analysis.percent_of_salary, "10.00");
    }

    #[test]
    fn test_to_fixed_2_rounding() {
        assert_eq!(to_fixed_2(4.5), "4.50");
        assert_eq!(to_fixed_2(0.225), "0.23");
        assert_eq!(to_fixed_2(0.125), "0.13");
        assert_eq!(to_fixed_2(0.375), "0.38");
        assert_eq!(to_fixed_2(1.005), "1.01");
        assert_eq!(to_fixed_2(4.5 / 2000.0 * 100.0), "0.23");
        assert_eq!(to_fixed_2(2.344), "2.34");
        assert_eq!(to_fixed_2(100.0), "100.00");
        assert_eq!(to_fixed_2(-0.125), "-0.13");
        assert_eq!(to_fixed_2(0.0), "0.00");
    }

    #[test]
    fn test_usable_salary_gate() {
        assert_eq!(usable_salary(Some(2000.0)), Some(2000.0));
        assert_eq!(usable_salary(Some(0.0)), None);
        assert_eq!(usable_salary(Some(-5.0)), None);
        assert_eq!(usable_salary(Some(f64::NAN)), None);
        assert_eq!(usable_salary(Some(f64::INFINITY)), None);
        assert_eq!(usable_salary(None), None);
    }

    #[test]
    fn test_parse_salary_prefix() {
        assert_eq!(parse_salary("2000"), Some(2000.0));
        assert_eq!(parse_salary("  2500.75 "), Some(2500.75));
        assert_eq!(parse_salary("2500/month"), Some(2500.0));
        assert_eq!(parse_salary(".5"), Some(0.5));
        assert_eq!(parse_salary("3e3"), Some(3000.0));
        assert_eq!(parse_salary("12e"), Some(12.0));
        assert_eq!(parse_salary("-40"), Some(-40.0));
        assert_eq!(parse_salary("abc"), None);
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("."), None);
    }
}
