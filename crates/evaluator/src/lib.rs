pub mod adapter;
pub mod error;
pub mod llm_evaluator;
pub mod models;
pub mod ollama_client;
pub mod prompts;
pub mod remote;
pub mod traits;

pub use error::{EvaluatorError, Result};
pub use llm_evaluator::{LlmEvaluator, OllamaScorer};
pub use models::{
    CriterionResult, EvaluationRequest, EvaluationResult, SubmissionContent, WeightedParameter,
};
pub use ollama_client::OllamaClient;
pub use remote::RemoteEvaluator;
pub use traits::{CriterionScorer, SubmissionEvaluator};
