use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    create_hackathon, delete_hackathon, get_hackathon, list_hackathons, update_hackathon,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/hackathons", post(create_hackathon))
        .route(
            "/hackathons/:hackathon_id",
            put(update_hackathon).delete(delete_hackathon),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/hackathons", get(list_hackathons))
        .route("/hackathons/:hackathon_id", get(get_hackathon))
        .merge(protected)
}
