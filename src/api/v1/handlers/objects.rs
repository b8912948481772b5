/*
 * Responsibility
 * - 導出済み key に対する GET / PUT / POST / DELETE
 * - store に無い -> 404, store 障害 -> 500
 * - それ以外の method -> 405 (認可の後)
 */
use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_object(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<impl IntoResponse, AppError> {
    let Some(body) = state.blobs.get(&auth.object_key).await.map_err(|err| {
        tracing::error!(error = %err, key = %auth.object_key, "object read failed");
        AppError::from(err)
    })?
    else {
        return Err(AppError::not_found("object"));
    };

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        body,
    ))
}

pub async fn put_object(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    state
        .blobs
        .put(&auth.object_key, &body)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, key = %auth.object_key, "object write failed");
            AppError::from(err)
        })?;

    tracing::info!(
        bot_id = %auth.context.bot_id,
        scope = %auth.context.scope,
        key = %auth.object_key,
        bytes = body.len(),
        "object stored"
    );
    Ok((StatusCode::OK, Json(json!({"message": "OK"}))))
}

pub async fn delete_object(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state
        .blobs
        .delete(&auth.object_key)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, key = %auth.object_key, "object delete failed");
            AppError::from(err)
        })?;

    if !deleted {
        return Err(AppError::not_found("object"));
    }

    tracing::info!(
        bot_id = %auth.context.bot_id,
        scope = %auth.context.scope,
        key = %auth.object_key,
        "object deleted"
    );
    Ok((StatusCode::OK, Json(json!({"message": "OK"}))))
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
