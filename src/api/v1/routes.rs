/*
 * Responsibility
 * - v1 の URL 構造を定義
 *   - /health (認証なし)
 *   - /database/{key}, /database/{scope}/{key} (access middleware の内側)
 * - access middleware は route_layer で掛けるので、405 fallback より先に走る
 */
use axum::{
    Router,
    routing::{MethodRouter, get},
};

use crate::api::v1::handlers::{
    health::health,
    objects::{delete_object, get_object, method_not_allowed, put_object},
};
use crate::middleware::auth::access;
use crate::state::AppState;

fn object_methods() -> MethodRouter<AppState> {
    get(get_object)
        .put(put_object)
        .post(put_object)
        .delete(delete_object)
        .fallback(method_not_allowed)
}

pub fn routes(state: AppState) -> Router<AppState> {
    let objects = Router::new()
        .route("/database/{key}", object_methods())
        .route("/database/{scope}/{key}", object_methods());

    Router::new()
        .route("/health", get(health))
        .merge(access::apply(objects, state))
}
