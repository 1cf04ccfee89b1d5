//! # vibeviews 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩
//! 4. SQLite 데이터베이스 연결 풀 생성
//! 5. 데이터베이스 마이그레이션 실행
//! 6. 봇 필터와 조회 트래커 구성
//! 7. CORS와 API 라우터 설정
//! 8. HTTP 서버 시작

use anyhow::Result; // main에서는 어떤 에러든 담을 수 있는 anyhow::Result를 씁니다
use sqlx::sqlite::SqlitePoolOptions; // SQLite 연결 풀 설정 옵션
use tower_http::{
    cors::{Any, CorsLayer}, // CORS(Cross-Origin Resource Sharing) 설정
    trace::TraceLayer,      // HTTP 요청/응답 로깅 미들웨어
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt}; // 로깅 초기화 유틸리티
use vibeviews::{
    config::Config,
    routes::{self, AppState},
    services::{BotFilter, ViewTracker},
};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .ok(): .env 파일이 없어도 에러 없이 넘어갑니다 (운영 환경은 실제 환경변수 사용)
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // registry()에 필터와 포맷터를 레이어처럼 쌓습니다
    tracing_subscriber::registry()
        .with(
            // RUST_LOG가 없으면 vibeviews, tower_http, axum 모듈을 debug 레벨로 출력
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vibeviews=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer()) // 터미널 출력 포맷터
        .init(); // 전역 로거로 등록

    // ── 3단계: 설정 로딩 ──
    // DATABASE_URL이 없으면 여기서 `?`로 종료합니다. 나머지 값은 기본값이 있습니다
    let config = Config::from_env()?;
    tracing::info!("Starting vibeviews server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections) // DATABASE_MAX_CONNECTIONS (기본 5)
        .connect(&config.database_url) // 예: sqlite:data/vibeviews.db?mode=rwc (rwc: 파일이 없으면 생성)
        .await?;

    // ── 5단계: 마이그레이션 실행 ──
    // migrate!는 컴파일 시점에 ./migrations 폴더의 SQL 파일을 바이너리에 포함시킵니다.
    // 이미 적용된 파일은 _sqlx_migrations 테이블을 보고 건너뜁니다.
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 봇 필터와 트래커 구성 ──
    // 기본 패턴 목록에 BOT_EXTRA_PATTERNS 값을 더합니다
    let bot_filter = BotFilter::with_extra_patterns(&config.bot_extra_patterns);
    tracing::info!("Bot filter loaded with {} patterns", bot_filter.patterns().len());

    // SqlitePool은 내부적으로 Arc이므로 clone은 연결을 복제하지 않습니다
    let state = AppState {
        pool: pool.clone(),
        tracker: ViewTracker::new(pool, bot_filter),
    };

    // ── 7단계: CORS와 라우터 ──
    // 조회 기록은 프론트엔드(다른 출처)에서 호출되므로 CORS를 엽니다
    let cors = CorsLayer::new()
        .allow_origin(Any) // 모든 출처 허용
        .allow_methods(Any) // GET, POST, OPTIONS 등
        .allow_headers(Any); // Content-Type, User-Agent 등

    // .layer()는 나중에 추가한 레이어가 바깥쪽에서 먼저 요청을 받습니다 (TraceLayer → CORS → 라우터)
    let app = routes::api_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 8단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // 종료 신호가 올 때까지 요청을 처리합니다
    axum::serve(listener, app).await?;

    Ok(())
}
