//! scanner token 検証 → 認可済み context → object key 導出 → extensions に格納
//!
//! 順番に実行する（どの段階でもリクエストを止められる）:
//! - identity: `Authorization: Bearer <jwt>` + path params（I/O なし）
//! - authorization: registry 判定を cache 経由で取得（miss なら registry へ）
//! - key derivation: scope ごとに分離された storage key

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AuthError, AuthErrorKind, identity, keys};
use crate::state::AppState;

/// Put the object routes behind authorization.
///
/// Uses `route_layer`, so unmatched paths still 404 without touching auth.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let ctx = identity::extract(
        state.verifier.as_ref(),
        req.headers(),
        params.get("scope").map(String::as_str),
        params.get("key").map(String::as_str),
    )
    .map_err(|err| reject(err, &method, &path))?;

    let ctx = state
        .authorizer
        .authorize(ctx)
        .await
        .map_err(|err| reject(err, &method, &path))?;

    let object_key = keys::derive_key(&ctx).map_err(|err| reject(err, &method, &path))?;

    tracing::debug!(
        bot_id = %ctx.bot_id,
        scanner = %ctx.scanner,
        scope = %ctx.scope,
        key = %object_key,
        "request authorized"
    );

    req.extensions_mut().insert(AuthCtx::new(ctx, object_key));

    Ok(next.run(req).await)
}

// 詳細な理由はここでログに残し、呼び出し側には粗い status だけ返す
fn reject(err: AuthError, method: &axum::http::Method, path: &str) -> AppError {
    match err.kind() {
        AuthErrorKind::Internal => {
            tracing::error!(error = %err, %method, path, "authorization backend failure");
        }
        AuthErrorKind::Denied | AuthErrorKind::NotFound => {
            tracing::warn!(
                error = %err,
                denied = err.is_denial(),
                %method,
                path,
                "request rejected"
            );
        }
    }
    AppError::from(err)
}
