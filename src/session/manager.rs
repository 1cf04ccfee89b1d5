//! # 세션 매니저 (클라이언트 측)
//!
//! 로그인 없이 페이지 로드 사이에서 같은 방문자임을 식별하기 위한 세션을 관리합니다.
//!
//! ## 규칙
//! - 저장된 세션이 없거나 마지막 활동 후 timeout(기본 30분)이 지났으면 새 세션 발급
//! - 유효한 세션이면 `last_activity`만 현재 시각으로 갱신
//! - 만료는 백그라운드 정리 없이, 다음 호출 때 시각을 비교해서 판단 (lazy expiry)
//!
//! ## 저장소 장애
//! 저장소를 읽거나 쓸 수 없어도 에러를 반환하지 않습니다.
//! 경고 로그를 남기고 저장되지 않은 새 세션을 돌려줍니다.
//! 조회수가 과대 집계될 수는 있지만 페이지가 깨지지는 않습니다.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use super::store::{SessionStore, StoreError};
use crate::config::DEFAULT_SESSION_TIMEOUT_MINUTES;
use crate::models::VisitorSession;

/// 현재 세션을 저장하는 키
pub const SESSION_KEY: &str = "vibedev_session";
/// 세션 ID → 이미 카운트된 콘텐츠 ID 목록을 저장하는 키
pub const VIEWED_CONTENT_KEY: &str = "vibedev_viewed_projects";

/// 클라이언트 측 ViewedContentSet: `{ "<session id>": ["<content id>", ...] }`
pub type ViewedContentMap = HashMap<String, Vec<String>>;

/// 방문자 세션 매니저
///
/// 저장소 타입 `S`를 주입받습니다. (브라우저 저장소에 직접 접근하지 않음)
pub struct SessionManager<S> {
    store: S,
    timeout: Duration,
}

impl<S: SessionStore> SessionManager<S> {
    /// 기본 만료 시간(30분)으로 매니저를 만듭니다.
    pub fn new(store: S) -> Self {
        Self::with_timeout(store, Duration::minutes(DEFAULT_SESSION_TIMEOUT_MINUTES))
    }

    pub fn with_timeout(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// 저장된 세션을 갱신 없이 읽습니다.
    ///
    /// 저장소 에러나 손상된 JSON은 `None`으로 취급합니다. 만료 여부는 보지 않습니다.
    pub fn current_session(&self) -> Option<VisitorSession> {
        match self.load_session() {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Failed to read visitor session: {}", e);
                None
            }
        }
    }

    /// 현재 시각 기준으로 세션을 가져오거나 새로 만듭니다.
    pub fn get_or_create_session(&self) -> VisitorSession {
        self.get_or_create_session_at(Utc::now())
    }

    /// `now` 시각 기준으로 세션을 가져오거나 새로 만듭니다.
    ///
    /// 반환된 세션은 항상 `now - last_activity < timeout`을 만족합니다.
    pub fn get_or_create_session_at(&self, now: DateTime<Utc>) -> VisitorSession {
        let existing = match self.load_session() {
            Ok(session) => session,
            Err(e) => {
                // 저장소를 쓸 수 없으면 매번 새 익명 세션으로 취급합니다
                tracing::warn!("Session storage unavailable, using a transient session: {}", e);
                return VisitorSession::new_at(now);
            }
        };

        let session = match existing {
            Some(mut session) if !session.is_expired_at(now, self.timeout) => {
                session.last_activity = now;
                session
            }
            previous => {
                if let Some(expired) = previous {
                    tracing::debug!(session_id = %expired.id, "Visitor session expired");
                }
                let session = VisitorSession::new_at(now);
                // 새 세션은 빈 ViewedContentSet으로 시작합니다
                if let Err(e) = self.store.clear(VIEWED_CONTENT_KEY) {
                    tracing::warn!("Failed to reset viewed content set: {}", e);
                }
                tracing::debug!(session_id = %session.id, "Minted visitor session");
                session
            }
        };

        if let Err(e) = self.save_session(&session) {
            tracing::warn!("Failed to persist visitor session: {}", e);
        }
        session
    }

    /// 세션과 조회 기록을 모두 지웁니다. (로그아웃, 추적 초기화)
    pub fn end_session(&self) {
        for key in [SESSION_KEY, VIEWED_CONTENT_KEY] {
            if let Err(e) = self.store.clear(key) {
                tracing::warn!("Failed to clear {}: {}", key, e);
            }
        }
    }

    /// 이 세션에서 해당 콘텐츠가 이미 카운트되었는지 확인합니다.
    ///
    /// 저장소를 읽을 수 없으면 `false` (카운트 요청을 보내는 쪽으로 실패).
    pub fn has_viewed(&self, session_id: &str, content_id: &str) -> bool {
        self.load_viewed()
            .map(|viewed| {
                viewed
                    .get(session_id)
                    .is_some_and(|ids| ids.iter().any(|id| id == content_id))
            })
            .unwrap_or(false)
    }

    /// 콘텐츠를 이 세션의 ViewedContentSet에 추가합니다. 이미 있으면 아무것도 하지 않습니다.
    pub fn mark_viewed(&self, session_id: &str, content_id: &str) {
        let mut viewed = match self.load_viewed() {
            Ok(viewed) => viewed,
            Err(e) => {
                tracing::warn!("Failed to read viewed content set: {}", e);
                return;
            }
        };

        let ids = viewed.entry(session_id.to_string()).or_default();
        if ids.iter().any(|id| id == content_id) {
            return;
        }
        ids.push(content_id.to_string());

        let result = serde_json::to_string(&viewed)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(VIEWED_CONTENT_KEY, &raw));
        if let Err(e) = result {
            tracing::warn!("Failed to persist viewed content set: {}", e);
        }
    }

    fn load_session(&self) -> Result<Option<VisitorSession>, StoreError> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // 손상된 값은 "세션 없음"과 같습니다
                tracing::debug!("Discarding malformed visitor session: {}", e);
                Ok(None)
            }
        }
    }

    fn save_session(&self, session: &VisitorSession) -> Result<(), StoreError> {
        let raw = serde_json::to_string(session)?;
        self.store.set(SESSION_KEY, &raw)
    }

    fn load_viewed(&self) -> Result<ViewedContentMap, StoreError> {
        match self.store.get(VIEWED_CONTENT_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw).unwrap_or_default()),
            None => Ok(ViewedContentMap::new()),
        }
    }
}
