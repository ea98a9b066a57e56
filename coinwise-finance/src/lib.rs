//! coinwise-finance: LLM-backed statement pipeline (extraction, concurrent
//! categorization, validation, spending analysis)

pub mod categorization;
pub mod completion;
pub mod extraction;
pub mod pipeline;
pub mod prompts;

pub use categorization::{categorize_all, parse_category_reply};
pub use completion::{CompletionClient, CompletionError, complete_within};
pub use extraction::{ExtractionError, extract_candidates, parse_extraction_reply};
pub use pipeline::{
    ErrorResponse, PipelineError, PipelineOptions, ProcessedStatement, StatementPipeline,
    StatementResponse,
};
