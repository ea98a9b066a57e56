//! The closed set of spending categories a transaction can be filed under.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction category. Anything the model answers outside this set is
/// filed as `Other`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Salary,
    Rent,
    Utilities,
    Entertainment,
    Healthcare,
    #[default]
    Other,
}

impl Category {
    /// Every category, in the order they are offered to the model.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Salary,
        Category::Rent,
        Category::Utilities,
        Category::Entertainment,
        Category::Healthcare,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Salary => "Salary",
            Category::Rent => "Rent",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Healthcare => "Healthcare",
            Category::Other => "Other",
        }
    }

    /// Exact label match, ignoring case, surrounding whitespace, quotes and
    /// punctuation in any nesting. `"\"food\"."` parses, `"Fast food"` does not.
    pub fn from_label(label: &str) -> Option<Category> {
        let cleaned = label
            .trim_matches(|c: char| {
                c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '*' | '.' | '!' | ',')
            });

        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(cleaned))
    }

    /// Comma-separated list used in prompts: `Food, Transport, ...`.
    pub fn option_list() -> String {
        Category::ALL
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
