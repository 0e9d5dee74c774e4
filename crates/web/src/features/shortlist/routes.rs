use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use super::handlers::{finalize_shortlist, get_shortlist, move_entry, save_order, send_to_admin};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    let protected = Router::new()
        .route("/hackathons/:hackathon_id/shortlist", post(finalize_shortlist))
        .route("/hackathons/:hackathon_id/shortlist/order", patch(save_order))
        .route("/hackathons/:hackathon_id/shortlist/move", post(move_entry))
        .route(
            "/hackathons/:hackathon_id/shortlist/send-to-admin",
            post(send_to_admin),
        )
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth));

    Router::new()
        .route("/hackathons/:hackathon_id/shortlist", get(get_shortlist))
        .merge(protected)
}
