//! # 조회(View) 모델 정의
//!
//! 조회 기록과 집계 결과에 쓰이는 구조체들입니다.
//!
//! - `ContentType`: 조회 대상 종류 (프로젝트 / 블로그 글)
//! - `ViewEvent`: DB의 `view_events` 테이블 한 행 (카운트된 조회 한 건)
//! - `RecordViewRequest` / `ViewOutcome`: `POST /api/v1/views`의 요청/응답
//! - `ViewStats`, `DailyViews`, `PopularContent`: 집계 조회 결과

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 조회 대상 콘텐츠 종류
///
/// JSON과 DB에는 소문자 문자열(`"project"`, `"post"`)로 저장됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Project,
    Post,
}

impl ContentType {
    /// DB 바인딩용 문자열 표현
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Project => "project",
            ContentType::Post => "post",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// URL 경로의 `{content_type}` 세그먼트를 파싱할 때 사용합니다.
/// 복수형(`projects`, `posts`)도 허용합니다.
impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project" | "projects" => Ok(ContentType::Project),
            "post" | "posts" => Ok(ContentType::Post),
            other => Err(format!("unknown content type: {other}")),
        }
    }
}

/// 조회 이벤트 — DB의 `view_events` 테이블 한 행에 대응합니다.
///
/// 총 조회수 = 행 수, 순방문자 수 = 서로 다른 `session_id` 수,
/// 오늘 조회수 = `view_date`가 오늘인 행 수.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ViewEvent {
    /// 이벤트 ID (UUIDv7)
    pub id: String,
    /// "project" 또는 "post"
    pub content_type: String,
    pub content_id: String,
    pub session_id: String,
    /// UTC 기준 달력 날짜 ("2026-10-15")
    pub view_date: String,
    /// 기록 시각 (RFC 3339)
    pub created_at: String,
}

/// 조회 기록 요청 — `POST /api/v1/views`의 요청 본문
///
/// User-Agent는 본문이 아니라 HTTP 헤더에서 읽습니다.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordViewRequest {
    pub session_id: String,
    pub content_type: ContentType,
    pub content_id: String,
}

/// 조회 기록 결과 — `{ "counted": true }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOutcome {
    /// 새 조회 이벤트가 기록되었는지 여부
    pub counted: bool,
}

impl ViewOutcome {
    pub const COUNTED: ViewOutcome = ViewOutcome { counted: true };
    pub const SKIPPED: ViewOutcome = ViewOutcome { counted: false };
}

/// 콘텐츠 하나의 집계 카운터
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ViewStats {
    pub total_views: i64,
    pub unique_visitors: i64,
    pub today_views: i64,
}

/// 일별 조회수 (차트용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DailyViews {
    pub view_date: String,
    pub views: i64,
}

/// 인기 콘텐츠 순위 항목
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PopularContent {
    pub content_id: String,
    pub total_views: i64,
    pub unique_visitors: i64,
}

/// `GET /stats/{type}/{id}/daily?days=7`의 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct DailyViewsQuery {
    pub days: Option<i64>,
}

/// `GET /stats/{type}?ids=a,b,c`의 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct BulkStatsQuery {
    pub ids: Option<String>,
}

/// `GET /popular/{type}?limit=10`의 쿼리 파라미터
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<i64>,
}
