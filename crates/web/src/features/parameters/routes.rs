use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use super::handlers::{
    adjust_weight, create_parameter, delete_parameter, list_parameters, toggle_parameter,
    update_parameter,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/hackathons/:hackathon_id/parameters", post(create_parameter))
        .route(
            "/hackathons/:hackathon_id/parameters/:parameter_id",
            put(update_parameter).delete(delete_parameter),
        )
        .route(
            "/hackathons/:hackathon_id/parameters/:parameter_id/toggle",
            post(toggle_parameter),
        )
        .route(
            "/hackathons/:hackathon_id/parameters/:parameter_id/weight",
            put(adjust_weight),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/hackathons/:hackathon_id/parameters", get(list_parameters))
        .merge(protected)
}
