use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_submission, get_submission, list_submissions, mark_reviewed, remove_review,
    select_top, set_manual_score, submission_stats, update_statuses,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/hackathons/:hackathon_id/submissions", post(create_submission))
        .route(
            "/hackathons/:hackathon_id/submissions/select-top",
            post(select_top),
        )
        .route(
            "/hackathons/:hackathon_id/submissions/status",
            put(update_statuses),
        )
        .route(
            "/submissions/:submission_id/review",
            put(mark_reviewed).delete(remove_review),
        )
        .route("/submissions/:submission_id/score", put(set_manual_score))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/hackathons/:hackathon_id/submissions", get(list_submissions))
        .route(
            "/hackathons/:hackathon_id/submissions/stats",
            get(submission_stats),
        )
        .route("/submissions/:submission_id", get(get_submission))
        .merge(protected)
}
