/*
 * Responsibility
 * - scanner registry テーブルへの読み取り専用クエリ
 *   (scanners, scanner_assignments, agents)
 * - address は大文字小文字を区別せず比較 (書き込み元ごとに checksum casing が違う)
 */
use sqlx::PgPool;

use crate::repos::error::RepoError;

/// `None` when the scanner is not registered at all.
pub async fn scanner_enabled(db: &PgPool, scanner: &str) -> Result<Option<bool>, RepoError> {
    let enabled = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT enabled
        FROM scanners
        WHERE lower(scanner_id) = lower($1)
        "#,
    )
    .bind(scanner)
    .fetch_optional(db)
    .await?;

    Ok(enabled)
}

pub async fn assignment_exists(db: &PgPool, scanner: &str, bot_id: &str) -> Result<bool, RepoError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM scanner_assignments
            WHERE lower(scanner_id) = lower($1)
              AND lower(bot_id) = lower($2)
        )
        "#,
    )
    .bind(scanner)
    .bind(bot_id)
    .fetch_one(db)
    .await?;

    Ok(exists)
}

pub async fn agent_owner(db: &PgPool, bot_id: &str) -> Result<Option<String>, RepoError> {
    let owner = sqlx::query_scalar::<_, String>(
        r#"
        SELECT owner
        FROM agents
        WHERE lower(bot_id) = lower($1)
        "#,
    )
    .bind(bot_id)
    .fetch_optional(db)
    .await?;

    Ok(owner)
}
