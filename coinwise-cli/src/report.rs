use coinwise_core::{SpendingAnalysis, ValidatedTransaction, to_fixed_2};

pub fn print_transactions(txns: &[ValidatedTransaction]) {
    println!("Transactions: {}", txns.len());
    if let Some((first, last)) = date_range(txns) {
        println!("Period: {} .. {}", first, last);
    }
    println!();

    for t in txns {
        let kind = t.kind.as_ref().map(|k| k.as_str()).unwrap_or("-");
        println!(
            "{:<12} {:<36} {:>12} {:<8} {}",
            t.date,
            truncate(&t.description, 36),
            to_fixed_2(t.amount),
            kind,
            t.category
        );
    }
}

pub fn print_analysis(analysis: &SpendingAnalysis) {
    println!("\n## Spending\n");
    println!(
        "Total expenses: {} ({}% of salary)",
        to_fixed_2(analysis.total_expenses),
        analysis.percent_of_salary.trim_end_matches('%')
    );
    if analysis.categories.is_empty() {
        println!("(no expenses)");
        return;
    }
    for (category, s) in analysis.categories.iter() {
        println!(
            "- {:<14} {:>12} | {:>6}% of salary | {:>6}% of expenses",
            category.as_str(),
            s.amount,
            s.percent_of_salary,
            s.percent_of_total_expenses
        );
    }
}

/// Earliest and latest `YYYY-MM-DD` dates; other formats are skipped.
fn date_range(txns: &[ValidatedTransaction]) -> Option<(String, String)> {
    let mut dates = txns.iter().filter_map(|t| t.normalized_date());
    let first = dates.next()?;
    let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some((lo.to_string(), hi.to_string()))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
