//! # 방문자 세션 모델 정의
//!
//! 로그인 없이도 방문자를 구분하기 위한 익명 세션 구조체입니다.
//! 세션은 클라이언트(브라우저 저장소)가 보관하고,
//! 서버는 조회를 기록할 때마다 같은 세션 ID로 `visitor_sessions` 행을 갱신합니다.
//!
//! ## 세션 흐름
//! 1. 첫 페이지 방문 → 유효한 세션이 없으므로 새 세션 발급
//! 2. 30분 안에 다시 방문 → 같은 세션, `last_activity`만 갱신
//! 3. 마지막 활동 후 30분 경과 → 만료, 다음 방문 시 새 세션 발급

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// 클라이언트가 보관하는 방문자 세션
///
/// 저장소(`vibedev_session` 키)에는 다음 JSON 형태로 저장됩니다:
/// `{ "id": "...", "createdAt": "2026-10-15T09:00:00Z", "lastActivity": "..." }`
///
/// `rename_all = "camelCase"`: Rust의 snake_case 필드를 JSON의 camelCase 키로 변환합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorSession {
    /// 세션 토큰 (랜덤 UUIDv4)
    pub id: String,
    /// 세션 생성 시각
    pub created_at: DateTime<Utc>,
    /// 마지막 활동 시각
    pub last_activity: DateTime<Utc>,
}

impl VisitorSession {
    /// `now` 시각에 새 세션을 발급합니다. `created_at`과 `last_activity`가 같습니다.
    pub fn new_at(now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: now,
            last_activity: now,
        }
    }

    /// `now` 기준으로 세션이 만료되었는지 확인합니다.
    pub fn is_expired_at(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        is_session_expired(self, now, timeout)
    }
}

/// 세션 만료 판정 (순수 함수)
///
/// 세션은 `now - last_activity < timeout`인 동안만 유효합니다.
/// 경과 시간이 정확히 timeout과 같으면 만료로 봅니다.
/// 시계가 뒤로 간 경우(경과 시간이 음수)는 유효한 것으로 취급합니다.
pub fn is_session_expired(session: &VisitorSession, now: DateTime<Utc>, timeout: Duration) -> bool {
    now.signed_duration_since(session.last_activity) >= timeout
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, h, m, 0).unwrap()
    }

    #[test]
    fn new_session_has_equal_timestamps() {
        let s = VisitorSession::new_at(at(9, 0));
        assert_eq!(s.created_at, s.last_activity);
        assert!(!s.id.is_empty());
    }

    #[test]
    fn expiry_boundary() {
        let s = VisitorSession::new_at(at(9, 0));
        let timeout = Duration::minutes(30);
        assert!(!s.is_expired_at(at(9, 29), timeout));
        assert!(s.is_expired_at(at(9, 30), timeout));
        assert!(s.is_expired_at(at(10, 0), timeout));
    }

    #[test]
    fn clock_skew_does_not_expire() {
        let s = VisitorSession::new_at(at(9, 0));
        assert!(!s.is_expired_at(at(8, 0), Duration::minutes(30)));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let s = VisitorSession::new_at(at(9, 0));
        let value = serde_json::to_value(&s).unwrap();
        assert!(value.get("createdAt").is_some());
        assert!(value.get("lastActivity").is_some());
        assert_eq!(value["createdAt"], "2026-10-15T09:00:00Z");
    }
}
