//! # 조회 중복 제거 트래커
//!
//! 페이지 조회 한 번이 조회 이벤트로 기록되어야 하는지 판단하고 기록합니다.
//!
//! ## 판단 순서
//! 1. User-Agent가 봇이면 → 기록하지 않음 (DB를 건드리지 않음)
//! 2. 이 세션의 조회 집합에 이미 콘텐츠가 있으면 → 기록하지 않음
//! 3. 아니면 → 조회 집합에 추가하고 조회 이벤트를 기록 (두 INSERT는 한 트랜잭션)
//!
//! 중복 제거 키는 `(session_id, content_type, content_id)`입니다. 날짜는 포함하지 않으므로
//! 자정을 넘긴 세션이 같은 콘텐츠를 다시 봐도 새 이벤트가 생기지 않습니다.
//! 2의 검사와 3의 기록 사이에는 잠금이 없으므로 동시 요청은 중복 이벤트를 만들 수 있습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::error::AppError;
use crate::models::{RecordViewRequest, ViewOutcome};
use crate::services::bot::BotFilter;

/// session_id / content_id의 최대 길이
pub const MAX_ID_LEN: usize = 128;

/// 조회 기록 서비스
///
/// `Clone`은 저렴합니다. (SqlitePool과 Arc만 복제)
#[derive(Clone)]
pub struct ViewTracker {
    pool: SqlitePool,
    bot_filter: Arc<BotFilter>,
}

impl ViewTracker {
    pub fn new(pool: SqlitePool, bot_filter: BotFilter) -> Self {
        Self {
            pool,
            bot_filter: Arc::new(bot_filter),
        }
    }

    pub fn bot_filter(&self) -> &BotFilter {
        &self.bot_filter
    }

    /// 페이지 조회 한 건을 처리합니다.
    ///
    /// # 에러
    /// - `AppError::BadRequest`: ID가 비어 있거나 너무 긴 경우
    /// - `AppError::Database`: 저장소 읽기/쓰기 실패
    pub async fn record_view(
        &self,
        req: &RecordViewRequest,
        user_agent: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ViewOutcome, AppError> {
        // 봇은 다른 어떤 검사보다 먼저 걸러냅니다 (ID가 비어 있어도 400이 아니라 미집계)
        if self.bot_filter.is_bot(user_agent) {
            tracing::debug!(
                content_type = %req.content_type,
                content_id = %req.content_id,
                "Skipping view from bot user agent"
            );
            return Ok(ViewOutcome::SKIPPED);
        }

        let session_id = validate_id("session_id", &req.session_id)?;
        let content_id = validate_id("content_id", &req.content_id)?;

        db::touch_session(&self.pool, session_id, now).await?;

        // 중복 검사 — 여기와 아래 기록 사이에는 잠금이 없습니다
        if db::has_viewed(&self.pool, session_id, req.content_type, content_id).await? {
            tracing::debug!(session_id, content_id, "View already counted for this session");
            return Ok(ViewOutcome::SKIPPED);
        }

        // 조회 집합 추가와 이벤트 기록은 한 트랜잭션으로 묶습니다.
        // 이벤트 기록이 실패하면 조회 집합 추가도 롤백되어, 다음 조회 때 다시 카운트됩니다.
        // (commit 전에 `?`로 빠져나가면 tx가 drop되면서 자동으로 롤백)
        let mut tx = self.pool.begin().await?;
        db::mark_viewed(&mut *tx, session_id, req.content_type, content_id, now).await?;
        let event =
            db::insert_view_event(&mut *tx, req.content_type, content_id, session_id, now)
                .await?;
        tx.commit().await?;

        tracing::info!(
            event_id = %event.id,
            content_type = %req.content_type,
            content_id,
            "Recorded view"
        );
        Ok(ViewOutcome::COUNTED)
    }
}

/// 앞뒤 공백을 제거한 ID를 돌려줍니다. 비어 있거나 너무 길면 400.
fn validate_id<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if value.len() > MAX_ID_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_ID_LEN} bytes"
        )));
    }
    Ok(value)
}
