use std::sync::Arc;

use axum::extract::FromRef;
use evaluator::SubmissionEvaluator;
use storage::Database;

use crate::features::parameters::debounce::WeightWriteQueue;
use crate::middleware::auth::ApiKeys;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Database,
    pub evaluator: Arc<dyn SubmissionEvaluator>,
    pub weight_queue: WeightWriteQueue,
    pub api_keys: ApiKeys,
}
