//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들과 API 라우터를 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `stats`: 조회수 집계 조회
//! - `views`: 페이지 조회 기록

pub mod health;
pub mod stats;
pub mod views;

pub use health::*;
pub use stats::*;
pub use views::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::services::ViewTracker;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool과 ViewTracker 모두 내부적으로 Arc를 쓰므로 clone이 저렴합니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (집계 쿼리용)
    pub pool: SqlitePool,
    /// 조회 기록 서비스
    pub tracker: ViewTracker,
}

/// `/api/v1` 아래의 모든 라우트를 구성합니다.
///
/// CORS, 요청 로깅 같은 미들웨어는 main.rs에서 덧붙입니다.
pub fn api_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/views", post(record_view))
        .route("/stats/{content_type}", get(get_bulk_stats))
        .route("/stats/{content_type}/{content_id}", get(get_view_stats))
        .route("/stats/{content_type}/{content_id}/daily", get(get_daily_views))
        .route("/popular/{content_type}", get(get_popular))
        .route("/health", get(health_check))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .fallback(|| async { AppError::NotFound })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_pool;
    use crate::services::BotFilter;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    const BROWSER: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                           (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

    async fn test_app() -> (Router, SqlitePool) {
        let pool = memory_pool().await;
        let state = AppState {
            pool: pool.clone(),
            tracker: ViewTracker::new(pool.clone(), BotFilter::default()),
        };
        (api_router(state), pool)
    }

    fn view_request(session_id: &str, content_id: &str, user_agent: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/v1/views")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(ua) = user_agent {
            builder = builder.header(header::USER_AGENT, ua);
        }
        let body = serde_json::json!({
            "session_id": session_id,
            "content_type": "project",
            "content_id": content_id,
        });
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "ok");
    }

    #[tokio::test]
    async fn test_record_view_and_read_stats() {
        let (app, _) = test_app().await;

        let (status, body) = send(&app, view_request("S1", "P1", Some(BROWSER))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counted"], true);

        let (_, body) = send(&app, view_request("S1", "P1", Some(BROWSER))).await;
        assert_eq!(body["counted"], false);

        let (_, body) = send(&app, view_request("S2", "P1", None)).await;
        assert_eq!(body["counted"], true);

        let (_, body) = send(
            &app,
            view_request("S3", "P1", Some("Mozilla/5.0 (compatible; Googlebot/2.1)")),
        )
        .await;
        assert_eq!(body["counted"], false);

        let (status, stats) = send(&app, get("/api/v1/stats/project/P1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_views"], 2);
        assert_eq!(stats["unique_visitors"], 2);
        assert_eq!(stats["today_views"], 2);
    }

    #[tokio::test]
    async fn test_record_view_rejects_blank_ids() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, view_request("", "P1", Some(BROWSER))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    #[tokio::test]
    async fn test_bot_with_blank_ids_is_skipped_not_rejected() {
        let (app, _) = test_app().await;
        let googlebot = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
        let (status, body) = send(&app, view_request("", "P1", Some(googlebot))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counted"], false);
    }

    #[tokio::test]
    async fn test_malformed_view_body_is_client_error() {
        let (app, _) = test_app().await;
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/views")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, BROWSER)
            .body(Body::from(r#"{"session_id":1}"#))
            .unwrap();

        // Json 추출기 거부 응답은 본문이 JSON이 아니므로 상태 코드만 확인합니다
        let resp = app.clone().oneshot(req).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn test_store_failure_is_not_an_error() {
        let (app, pool) = test_app().await;
        pool.close().await;

        let (status, body) = send(&app, view_request("S1", "P1", Some(BROWSER))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["counted"], false);
    }

    #[tokio::test]
    async fn test_unknown_content_type_is_bad_request() {
        let (app, _) = test_app().await;
        let (status, _) = send(&app, get("/api/v1/stats/video/1")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, get("/api/v1/popular/video")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_daily_views_endpoint() {
        let (app, _) = test_app().await;
        send(&app, view_request("S1", "P1", None)).await;

        let (status, body) = send(&app, get("/api/v1/stats/projects/P1/daily?days=3")).await;
        assert_eq!(status, StatusCode::OK);
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2]["views"], 1);
        assert_eq!(days[0]["views"], 0);

        let (status, _) = send(&app, get("/api/v1/stats/project/P1/daily?days=0")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = send(&app, get("/api/v1/stats/project/P1/daily?days=91")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_bulk_and_popular_endpoints() {
        let (app, _) = test_app().await;
        send(&app, view_request("S1", "A", None)).await;
        send(&app, view_request("S2", "A", None)).await;
        send(&app, view_request("S1", "B", None)).await;

        let (status, body) = send(&app, get("/api/v1/stats/project?ids=A,B,C")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["A"]["total_views"], 2);
        assert_eq!(body["stats"]["B"]["unique_visitors"], 1);
        assert_eq!(body["stats"]["C"]["total_views"], 0);

        let (status, body) = send(&app, get("/api/v1/popular/project?limit=1")).await;
        assert_eq!(status, StatusCode::OK);
        let items = body["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["content_id"], "A");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let (app, _) = test_app().await;
        let (status, body) = send(&app, get("/api/v1/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "not_found");
    }
}
