/*
 * Responsibility
 * - URL structure of v1
 * - Decide which routes sit behind the guard (reject policy: 401 JSON)
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::v1::handlers::{
    health::health,
    me::{greeting, me},
    session::{create_session, delete_session},
};
use crate::config::Config;
use crate::middleware::auth::{RequireAuth, access};
use crate::state::AppState;

pub fn routes(state: &AppState, config: &Config) -> Router<AppState> {
    let mut public = Router::new()
        .route("/health", get(health))
        .route("/greeting", get(greeting));

    // Minting tokens for arbitrary subjects is a development convenience.
    if !config.app_env.is_production() {
        public = public.route("/session", post(create_session).delete(delete_session));
    }

    let protected = Router::new().route("/me", get(me));
    let protected = access::apply(protected, RequireAuth::reject(state.auth.clone()));

    public.merge(protected)
}
