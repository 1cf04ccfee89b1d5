//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /api/v1/health` → `{ "status": "ok", "database": "ok" }`
//!
//! DB에 `SELECT 1`을 보내 연결 풀이 살아 있는지도 함께 확인합니다.
//! DB가 응답하지 않으면 `"status": "degraded"`로 응답합니다.
//! (조회 기록 실패가 페이지를 깨지 않는 것처럼, 헬스체크도 200을 유지합니다)

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::routes::AppState;

/// `GET /health` — 서버와 DB 상태를 확인합니다.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            "unavailable"
        }
    };
    let status = if database == "ok" { "ok" } else { "degraded" };

    Json(json!({
        "status": status,
        "database": database
    }))
}
