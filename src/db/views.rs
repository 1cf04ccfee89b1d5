//! # 조회 기록 데이터베이스 쿼리 모듈
//!
//! - `session_viewed_content`: 세션별로 이미 카운트된 콘텐츠 집합 (ViewedContentSet)
//! - `view_events`: 카운트된 조회 한 건당 한 행
//!
//! 중복 검사(`has_viewed`)는 기록(`mark_viewed`, `insert_view_event`)과 따로 실행됩니다.
//! 같은 세션의 두 요청이 동시에 들어오면 둘 다 검사를 통과해 중복 이벤트가 생길 수 있습니다.
//! 두 INSERT는 호출하는 쪽(트래커)이 한 트랜잭션으로 묶습니다.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool};

use super::{format_date, format_timestamp};
use crate::error::AppError;
use crate::models::{ContentType, ViewEvent};

/// 세션이 이 콘텐츠를 이미 조회한 것으로 기록되어 있는지 확인합니다.
pub async fn has_viewed(
    pool: &SqlitePool,
    session_id: &str,
    content_type: ContentType,
    content_id: &str,
) -> Result<bool, AppError> {
    // EXISTS(...)는 0 또는 1을 반환합니다
    let exists: i64 = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM session_viewed_content
            WHERE session_id = ? AND content_type = ? AND content_id = ?
        )
        "#,
    )
    .bind(session_id)
    .bind(content_type.as_str())
    .bind(content_id)
    .fetch_one(pool)
    .await?;

    Ok(exists != 0)
}

/// 콘텐츠를 세션의 조회 집합에 추가합니다.
///
/// `executor`는 `&SqlitePool`이나 트랜잭션 안의 연결(`&mut *tx`) 모두 받습니다.
/// 트래커는 `insert_view_event`와 같은 트랜잭션 안에서 호출합니다.
pub async fn mark_viewed<'e, E>(
    executor: E,
    session_id: &str,
    content_type: ContentType,
    content_id: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        r#"
        INSERT INTO session_viewed_content (session_id, content_type, content_id, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(session_id)
    .bind(content_type.as_str())
    .bind(content_id)
    .bind(format_timestamp(now)) // RFC 3339, 밀리초, UTC (예: 2026-10-15T09:00:00.000Z)
    .execute(executor) // 풀이든 트랜잭션이든 같은 코드로 실행
    .await?;

    Ok(())
}

/// 조회 이벤트 한 건을 기록하고, 기록된 행을 반환합니다.
///
/// `view_date`는 `now`의 UTC 달력 날짜입니다.
pub async fn insert_view_event<'e, E>(
    executor: E,
    content_type: ContentType,
    content_id: &str,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<ViewEvent, AppError>
where
    E: sqlx::Executor<'e, Database = Sqlite>,
{
    // 행을 먼저 만들어 두고 그대로 바인딩한 뒤 반환합니다 (RETURNING 없이)
    let event = ViewEvent {
        // UUIDv7은 시간 순으로 정렬되므로 id 순서가 기록 순서와 같습니다
        id: uuid::Uuid::now_v7().to_string(),
        content_type: content_type.as_str().to_string(),
        content_id: content_id.to_string(),
        session_id: session_id.to_string(),
        view_date: format_date(now.date_naive()),
        created_at: format_timestamp(now),
    };

    sqlx::query(
        r#"
        INSERT INTO view_events (id, content_type, content_id, session_id, view_date, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    // 바인딩 순서는 VALUES의 ? 순서와 같아야 합니다
    .bind(&event.id)
    .bind(&event.content_type)
    .bind(&event.content_id)
    .bind(&event.session_id)
    .bind(&event.view_date)
    .bind(&event.created_at)
    .execute(executor)
    .await?;

    Ok(event)
}
