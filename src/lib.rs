//! # vibeviews
//!
//! 커뮤니티 플랫폼의 프로젝트/블로그 글 조회수를 집계하는 라이브러리입니다.
//!
//! - `session`: 클라이언트 측 방문자 세션 (30분 만료, 세션별 조회 집합)
//! - `services`: 봇 필터와 조회 중복 제거 트래커
//! - `db`: SQLite 쿼리 (세션, 조회 이벤트, 집계)
//! - `routes`: axum HTTP 핸들러와 라우터
//!
//! 서버 바이너리는 `main.rs`에 있습니다.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
