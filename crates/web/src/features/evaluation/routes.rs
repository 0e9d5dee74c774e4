use axum::{Router, middleware, routing::post};

use super::handlers::evaluate_submissions;
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/hackathons/:hackathon_id/evaluate", post(evaluate_submissions))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
