//! # 방문자 세션 관리 (클라이언트 측)
//!
//! 페이지를 보여주는 쪽(브라우저 셸, Rust 클라이언트)이 사용하는 모듈입니다.
//! - `store`: 키-값 세션 저장소 트레이트와 구현체
//! - `manager`: 30분 만료 규칙을 적용하는 `SessionManager`

pub mod manager;
pub mod store;

pub use manager::*;
pub use store::*;
