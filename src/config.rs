//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `DATABASE_MAX_CONNECTIONS`: 연결 풀 최대 크기
//! - `BOT_EXTRA_PATTERNS`: 기본 목록에 추가할 봇 User-Agent 패턴 (쉼표 구분)

use std::env;

/// 세션 만료 시간 기본값 (분). 마지막 활동 후 30분이 지나면 새 세션이 발급됩니다.
/// 클라이언트 측 `SessionManager`의 기본값으로 쓰입니다.
pub const DEFAULT_SESSION_TIMEOUT_MINUTES: i64 = 30;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 URL (예: "sqlite:data/vibeviews.db?mode=rwc")
    pub database_url: String,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
    /// SQLite 연결 풀의 최대 연결 수 (기본값: 5)
    pub max_connections: u32,
    /// 기본 봇 목록에 더해 차단할 User-Agent 부분 문자열
    pub bot_extra_patterns: Vec<String>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`은 필수이며, 없으면 `VarError`를 반환합니다.
    /// 나머지 설정은 기본값이 있고, 숫자 파싱에 실패해도 기본값을 사용합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            // `?`: 필수 값이 없으면 VarError를 그대로 반환합니다
            database_url: env::var("DATABASE_URL")?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            // 값이 없거나 숫자가 아니면 3000
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            // .ok()로 Option으로 바꾼 뒤 파싱 실패도 None으로 취급합니다
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            // 설정하지 않으면 빈 목록 (기본 패턴만 사용)
            bot_extra_patterns: env::var("BOT_EXTRA_PATTERNS")
                .map(|raw| parse_pattern_list(&raw))
                .unwrap_or_default(),
        })
    }
}

/// 쉼표로 구분된 패턴 목록을 파싱합니다.
///
/// 앞뒤 공백을 제거하고 소문자로 바꾸며, 빈 항목은 버립니다.
/// 예: `" FooBot, ,bar-crawler "` → `["foobot", "bar-crawler"]`
pub fn parse_pattern_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}
