//! # 봇/크롤러 필터 서비스
//!
//! User-Agent 문자열에 알려진 봇 서명이 포함되어 있는지 검사합니다.
//!
//! 보안 경계가 아니라 통계 정확도를 위한 휴리스틱입니다.
//! 목록을 빠져나가는 봇(false negative)은 허용합니다.
//! User-Agent가 없거나 비어 있으면 봇이 아닌 것으로 봅니다 (fail open).

/// 기본 차단 목록 — 모두 소문자 부분 문자열입니다.
///
/// 구체적인 이름을 먼저 두고, 마지막에 일반적인 봇 표기로 나머지를 잡습니다.
/// "bot"은 단독으로 쓰지 않습니다. 브라우저 UA에도 들어갈 수 있기 때문입니다
/// (예: 휴대폰 모델명 `CUBOT_X30`). 대신 `SomeBot/1.0`, `(compatible; SomeBot)`,
/// `some-bot`처럼 봇 이름 뒤에 오는 구분자까지 포함해서 비교합니다.
pub const DEFAULT_BOT_PATTERNS: &[&str] = &[
    "googlebot",
    "bingbot",
    "slurp",
    "duckduckbot",
    "baiduspider",
    "yandexbot",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "slackbot",
    "discordbot",
    "whatsapp",
    "telegrambot",
    "applebot",
    "ahrefsbot",
    "semrushbot",
    "mj12bot",
    "petalbot",
    "headlesschrome",
    "phantomjs",
    "lighthouse",
    "curl/",
    "wget/",
    "python-requests",
    "go-http-client",
    "bot/",
    "bot;",
    "bot)",
    "-bot",
    "crawler",
    "spider",
];

/// User-Agent 기반 봇 판별기
#[derive(Debug, Clone)]
pub struct BotFilter {
    patterns: Vec<String>,
}

impl Default for BotFilter {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_BOT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl BotFilter {
    /// 기본 목록에 패턴을 더한 필터를 만듭니다. 패턴은 소문자로 비교됩니다.
    pub fn with_extra_patterns<I, P>(extra: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let mut filter = Self::default();
        for pattern in extra {
            let pattern = pattern.as_ref().trim().to_lowercase();
            if !pattern.is_empty() && !filter.patterns.contains(&pattern) {
                filter.patterns.push(pattern);
            }
        }
        filter
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// User-Agent가 봇으로 보이면 `true`.
    pub fn is_bot(&self, user_agent: Option<&str>) -> bool {
        let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
            return false;
        };
        let ua = ua.to_lowercase();
        self.patterns.iter().any(|p| ua.contains(p.as_str()))
    }
}
