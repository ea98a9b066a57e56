//! coinwise-core: transaction types, validation and spending analysis for
//! bank-statement processing. No I/O; everything here is deterministic.

pub mod analysis;
pub mod category;
pub mod error;
pub mod transaction;
pub mod validation;

pub use analysis::{
    CategoryBreakdown, CategorySpending, SpendingAnalysis, calculate_spending_analysis,
    parse_salary, to_fixed_2, usable_salary,
};
pub use category::Category;
pub use error::{Error, Result};
pub use transaction::{
    CandidateTransaction, CategorizedTransaction, RawAmount, StatementText, TransactionKind,
    ValidatedTransaction,
};
pub use validation::validate_transactions;
