//! # 조회수 통계 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/v1/stats/{type}/{id} | `get_view_stats` | 총 조회수 / 순방문자 / 오늘 조회수 |
//! | GET | /api/v1/stats/{type}/{id}/daily?days=7 | `get_daily_views` | 최근 N일 일별 조회수 |
//! | GET | /api/v1/stats/{type}?ids=a,b | `get_bulk_stats` | 여러 콘텐츠의 카운터 |
//! | GET | /api/v1/popular/{type}?limit=10 | `get_popular` | 조회수 순위 |
//!
//! `{type}`은 `project`/`post` (복수형도 허용). 그 외 값은 400입니다.
//! "오늘"은 UTC 달력 날짜입니다.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Days, Utc};
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    models::*,
    routes::AppState,
};

/// 일별 조회수 기본/최대 기간
const DEFAULT_DAYS: i64 = 7;
const MAX_DAYS: i64 = 90;
/// 인기 콘텐츠 기본/최대 개수
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;
/// 한 번에 조회할 수 있는 최대 ID 수
const MAX_BULK_IDS: usize = 100;

fn parse_content_type(raw: &str) -> Result<ContentType, AppError> {
    raw.parse().map_err(AppError::BadRequest)
}

/// 범위를 벗어난 값은 400으로 거절합니다.
fn bounded(name: &str, value: Option<i64>, default: i64, max: i64) -> Result<i64, AppError> {
    match value {
        None => Ok(default),
        Some(v) if (1..=max).contains(&v) => Ok(v),
        Some(_) => Err(AppError::BadRequest(format!(
            "{name} must be between 1 and {max}"
        ))),
    }
}

/// `GET /api/v1/stats/{type}/{id}` → `{ "total_views": 2, "unique_visitors": 2, "today_views": 1 }`
pub async fn get_view_stats(
    State(state): State<AppState>,
    Path((content_type, content_id)): Path<(String, String)>,
) -> Result<Json<ViewStats>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let today = Utc::now().date_naive();

    let stats = db::view_stats(&state.pool, content_type, &content_id, today).await?;
    Ok(Json(stats))
}

/// `GET /api/v1/stats/{type}/{id}/daily?days=7` → `{ "days": [{ "view_date", "views" }, ...] }`
///
/// 오늘을 포함한 최근 N일을 오래된 날짜부터 반환합니다.
pub async fn get_daily_views(
    State(state): State<AppState>,
    Path((content_type, content_id)): Path<(String, String)>,
    Query(query): Query<DailyViewsQuery>,
) -> Result<Json<Value>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let days = bounded("days", query.days, DEFAULT_DAYS, MAX_DAYS)?;

    let today = Utc::now().date_naive();
    // days는 1..=90 범위이므로 u64 변환과 날짜 계산이 실패하지 않습니다
    let since = today
        .checked_sub_days(Days::new(days as u64 - 1))
        .unwrap_or(today);

    let daily = db::daily_views(&state.pool, content_type, &content_id, since, today).await?;
    Ok(Json(json!({ "days": daily })))
}

/// `GET /api/v1/stats/{type}?ids=a,b,c` → `{ "stats": { "a": {...}, "b": {...} } }`
pub async fn get_bulk_stats(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Query(query): Query<BulkStatsQuery>,
) -> Result<Json<Value>, AppError> {
    let content_type = parse_content_type(&content_type)?;

    let ids: Vec<String> = query
        .ids
        .as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect();
    if ids.len() > MAX_BULK_IDS {
        return Err(AppError::BadRequest(format!(
            "at most {MAX_BULK_IDS} ids per request"
        )));
    }

    let today = Utc::now().date_naive();
    let stats = db::bulk_stats(&state.pool, content_type, &ids, today).await?;
    Ok(Json(json!({ "stats": stats })))
}

/// `GET /api/v1/popular/{type}?limit=10` → `{ "items": [{ "content_id", "total_views", "unique_visitors" }] }`
pub async fn get_popular(
    State(state): State<AppState>,
    Path(content_type): Path<String>,
    Query(query): Query<PopularQuery>,
) -> Result<Json<Value>, AppError> {
    let content_type = parse_content_type(&content_type)?;
    let limit = bounded("limit", query.limit, DEFAULT_LIMIT, MAX_LIMIT)?;

    let items = db::popular_content(&state.pool, content_type, limit).await?;
    Ok(Json(json!({ "items": items })))
}
