//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스(services/)와 라우트 핸들러(routes/)가 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `sessions`: 방문자 세션 기록 (`visitor_sessions`)
//! - `views`: 세션별 조회 집합과 조회 이벤트 기록 (`session_viewed_content`, `view_events`)
//! - `stats`: 조회 이벤트 집계 쿼리
//!
//! 시각은 모두 UTC 기준 문자열로 저장합니다.
//! - 타임스탬프: `2026-10-15T09:00:00.000Z`
//! - 달력 날짜: `2026-10-15`

pub mod sessions;
pub mod stats;
pub mod views;

pub use sessions::*;
pub use stats::*;
pub use views::*;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// DB에 저장할 타임스탬프 문자열을 만듭니다.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// DB에 저장할 달력 날짜 문자열을 만듭니다.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;

    /// 마이그레이션이 적용된 인메모리 SQLite 풀
    ///
    /// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 연결을 하나로 제한합니다.
    pub async fn memory_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamp_and_date_formats() {
        let at = Utc.with_ymd_and_hms(2026, 10, 15, 9, 5, 0).unwrap();
        assert_eq!(format_timestamp(at), "2026-10-15T09:05:00.000Z");
        assert_eq!(format_date(at.date_naive()), "2026-10-15");
    }
}
