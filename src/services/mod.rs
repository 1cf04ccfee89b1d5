//! # 비즈니스 로직 모듈
//!
//! - `bot`: User-Agent 기반 봇/크롤러 판별
//! - `tracker`: 세션 단위 조회 중복 제거와 조회 이벤트 기록

pub mod bot;
pub mod tracker;

pub use bot::BotFilter;
pub use tracker::ViewTracker;
