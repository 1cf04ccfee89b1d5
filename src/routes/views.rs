//! # 조회 기록 라우트 핸들러
//!
//! ## 엔드포인트
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/views | `record_view` | 페이지 조회 한 건 기록 |
//!
//! 요청: `{ "session_id": "...", "content_type": "project", "content_id": "42" }`
//! 응답: `{ "counted": true }`
//!
//! 조회 기록은 페이지 렌더링에 영향을 주면 안 됩니다.
//! 저장소 에러는 로그만 남기고 `{ "counted": false }`로 응답합니다.
//! 잘못된 요청(빈 ID 등)만 400을 반환합니다.

use axum::{
    extract::State,
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use chrono::Utc;

use crate::{
    error::AppError,
    models::{RecordViewRequest, ViewOutcome},
    routes::AppState,
};

/// `POST /api/v1/views` — 페이지 조회 한 건을 기록합니다.
///
/// User-Agent는 요청 헤더에서 읽습니다. 헤더가 없거나 UTF-8이 아니면 `None`입니다.
pub async fn record_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<RecordViewRequest>,
) -> Result<Json<ViewOutcome>, AppError> {
    let user_agent = headers.get(USER_AGENT).and_then(|v| v.to_str().ok());

    match state.tracker.record_view(&req, user_agent, Utc::now()).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(AppError::BadRequest(msg)) => Err(AppError::BadRequest(msg)),
        Err(e) => {
            // 재시도 큐 없음: 이 조회는 버려집니다
            tracing::warn!(
                content_type = %req.content_type,
                content_id = %req.content_id,
                "Dropping view after store failure: {}",
                e
            );
            Ok(Json(ViewOutcome::SKIPPED))
        }
    }
}
