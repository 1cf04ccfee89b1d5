//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `session`: 방문자 세션 관련 구조체
//! - `view`: 조회 이벤트와 집계 결과 구조체
//!
//! `pub use X::*;`로 하위 모듈 항목을 재공개하여
//! `crate::models::ViewStats`처럼 짧게 접근할 수 있게 합니다.

pub mod session;
pub mod view;

pub use session::*;
pub use view::*;
