//! # 방문자 세션 데이터베이스 쿼리 모듈
//!
//! 클라이언트가 보낸 세션 ID를 `visitor_sessions` 테이블에 기록합니다.
//!
//! ## 세션 라이프사이클
//! ```text
//! 첫 조회 → INSERT (created_at = last_activity = now)
//! 이후 조회 → UPDATE last_activity = now
//! ```
//! 세션 행은 삭제하지 않습니다. 만료 판단은 클라이언트의 SessionManager가 합니다.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use super::format_timestamp;
use crate::error::AppError;

/// 세션 행을 만들거나 `last_activity`를 갱신합니다. (upsert)
///
/// `ON CONFLICT(id) DO UPDATE`: 같은 id가 이미 있으면 INSERT 대신 UPDATE를 실행합니다.
/// `created_at`은 처음 INSERT된 값이 유지됩니다.
pub async fn touch_session(
    pool: &SqlitePool,
    id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    let now = format_timestamp(now);

    sqlx::query(
        r#"
        INSERT INTO visitor_sessions (id, created_at, last_activity)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET last_activity = excluded.last_activity
        "#,
    )
    .bind(id)
    .bind(&now) // created_at (INSERT일 때만 사용)
    .bind(&now) // last_activity (excluded.last_activity로 UPDATE에도 쓰임)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use chrono::TimeZone;

    #[tokio::test]
    async fn touch_creates_then_bumps_last_activity() {
        let pool = memory_pool().await;
        let first = Utc.with_ymd_and_hms(2026, 10, 15, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2026, 10, 15, 9, 10, 0).unwrap();

        touch_session(&pool, "s1", first).await.unwrap();
        touch_session(&pool, "s1", later).await.unwrap();

        let (created_at, last_activity): (String, String) = sqlx::query_as(
            "SELECT created_at, last_activity FROM visitor_sessions WHERE id = ?",
        )
        .bind("s1")
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(created_at, "2026-10-15T09:00:00.000Z");
        assert_eq!(last_activity, "2026-10-15T09:10:00.000Z");

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitor_sessions")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }
}
