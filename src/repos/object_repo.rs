/*
 * Responsibility
 * - objects テーブル向け SQLx 操作 (導出済み key -> bytes)
 * - key は scope 分離済み。この層では中身を解釈しない
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoError;

#[derive(Debug, FromRow)]
pub struct ObjectRow {
    #[sqlx(rename = "objectKey")]
    pub object_key: String,
    pub body: Vec<u8>,
    #[sqlx(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

pub async fn get(db: &PgPool, object_key: &str) -> Result<Option<ObjectRow>, RepoError> {
    let row = sqlx::query_as::<_, ObjectRow>(
        r#"
        SELECT "objectKey", body, "updatedAt"
        FROM objects
        WHERE "objectKey" = $1
        "#,
    )
    .bind(object_key)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn put(db: &PgPool, object_key: &str, body: &[u8]) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO objects ("objectKey", body)
        VALUES ($1, $2)
        ON CONFLICT ("objectKey") DO UPDATE
        SET
            body = EXCLUDED.body,
            "updatedAt" = now()
        "#,
    )
    .bind(object_key)
    .bind(body)
    .execute(db)
    .await?;

    Ok(())
}

pub async fn delete(db: &PgPool, object_key: &str) -> Result<bool, RepoError> {
    let result = sqlx::query(
        r#"
        DELETE FROM objects
        WHERE "objectKey" = $1
        "#,
    )
    .bind(object_key)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
