//! # 조회수 집계 쿼리 모듈
//!
//! `view_events` 행에서 화면에 표시할 카운터를 계산합니다.
//! 캐시나 증분 카운터 없이, 읽을 때마다 전체 이벤트에서 다시 집계합니다.
//!
//! - 총 조회수: 행 수
//! - 순방문자 수: 서로 다른 `session_id` 수
//! - 오늘 조회수: `view_date`가 오늘인 행 수 (항상 총 조회수 이하)

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::format_date;
use crate::error::AppError;
use crate::models::{ContentType, DailyViews, PopularContent, ViewStats};

/// 콘텐츠 하나의 조회수 카운터를 계산합니다.
///
/// 이벤트가 하나도 없으면 모든 값이 0입니다.
pub async fn view_stats(
    pool: &SqlitePool,
    content_type: ContentType,
    content_id: &str,
    today: NaiveDate,
) -> Result<ViewStats, AppError> {
    // 한 번의 스캔으로 세 카운터를 계산합니다
    // - COUNT(DISTINCT session_id): 같은 세션의 중복 이벤트는 순방문자 1명
    // - SUM(CASE ...): 오늘 날짜 행만 1로 셉니다. 행이 없으면 NULL이므로 COALESCE로 0을 채웁니다
    // 컬럼 별칭(AS total_views 등)이 ViewStats의 필드 이름과 같아야 FromRow가 매핑합니다
    let stats = sqlx::query_as::<_, ViewStats>(
        r#"
        SELECT COUNT(*) AS total_views,
               COUNT(DISTINCT session_id) AS unique_visitors,
               COALESCE(SUM(CASE WHEN view_date = ? THEN 1 ELSE 0 END), 0) AS today_views
        FROM view_events
        WHERE content_type = ? AND content_id = ?
        "#,
    )
    .bind(format_date(today)) // 첫 번째 ? → view_date 비교 ("YYYY-MM-DD")
    .bind(content_type.as_str())
    .bind(content_id)
    .fetch_one(pool) // 집계 쿼리는 행이 없어도 항상 한 행을 반환합니다
    .await?;

    Ok(stats)
}

/// 여러 콘텐츠의 카운터를 한 번에 계산합니다. (목록 페이지용)
///
/// 이벤트가 없는 ID도 결과에 0으로 포함됩니다. 중복 ID는 한 번만 계산합니다.
pub async fn bulk_stats(
    pool: &SqlitePool,
    content_type: ContentType,
    content_ids: &[String],
    today: NaiveDate,
) -> Result<HashMap<String, ViewStats>, AppError> {
    let mut result: HashMap<String, ViewStats> = content_ids
        .iter()
        .map(|id| (id.clone(), ViewStats::default()))
        .collect();
    if result.is_empty() {
        return Ok(result);
    }

    // QueryBuilder: IN (...) 목록처럼 개수가 바뀌는 바인딩을 안전하게 만듭니다
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT content_id, COUNT(*) AS total_views, \
         COUNT(DISTINCT session_id) AS unique_visitors, \
         COALESCE(SUM(CASE WHEN view_date = ",
    );
    query.push_bind(format_date(today));
    query.push(" THEN 1 ELSE 0 END), 0) AS today_views FROM view_events WHERE content_type = ");
    query.push_bind(content_type.as_str());
    query.push(" AND content_id IN (");
    let mut ids = query.separated(", ");
    for id in result.keys() {
        ids.push_bind(id.clone());
    }
    ids.push_unseparated(") GROUP BY content_id");
    // 완성된 SQL 예: ... AND content_id IN (?, ?, ?) GROUP BY content_id

    // 이벤트가 있는 ID만 행으로 돌아오고, 나머지는 위에서 넣은 0이 유지됩니다
    let rows: Vec<(String, i64, i64, i64)> = query.build_query_as().fetch_all(pool).await?;
    for (content_id, total_views, unique_visitors, today_views) in rows {
        result.insert(
            content_id,
            ViewStats {
                total_views,
                unique_visitors,
                today_views,
            },
        );
    }

    Ok(result)
}

/// `since`부터 `until`까지(양 끝 포함) 일별 조회수를 날짜 오름차순으로 반환합니다.
///
/// 조회가 없던 날도 0으로 채워서, 항상 (until - since + 1)개의 항목을 돌려줍니다.
pub async fn daily_views(
    pool: &SqlitePool,
    content_type: ContentType,
    content_id: &str,
    since: NaiveDate,
    until: NaiveDate,
) -> Result<Vec<DailyViews>, AppError> {
    // view_date는 "YYYY-MM-DD" 문자열이므로 문자열 비교가 날짜 순서와 같습니다
    let rows = sqlx::query_as::<_, DailyViews>(
        r#"
        SELECT view_date, COUNT(*) AS views
        FROM view_events
        WHERE content_type = ? AND content_id = ?
          AND view_date >= ? AND view_date <= ?
        GROUP BY view_date
        ORDER BY view_date ASC
        "#,
    )
    .bind(content_type.as_str())
    .bind(content_id)
    .bind(format_date(since))
    .bind(format_date(until))
    .fetch_all(pool)
    .await?;

    Ok(fill_missing_days(rows, since, until))
}

/// 비어 있는 날짜를 0으로 채웁니다.
fn fill_missing_days(rows: Vec<DailyViews>, since: NaiveDate, until: NaiveDate) -> Vec<DailyViews> {
    let counts: HashMap<String, i64> = rows.into_iter().map(|r| (r.view_date, r.views)).collect();

    let mut days = Vec::new();
    let mut day = since;
    while day <= until {
        let view_date = format_date(day);
        let views = counts.get(&view_date).copied().unwrap_or(0);
        days.push(DailyViews { view_date, views });
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    days
}

/// 총 조회수가 많은 순서로 콘텐츠를 반환합니다. 동률이면 ID 오름차순입니다.
pub async fn popular_content(
    pool: &SqlitePool,
    content_type: ContentType,
    limit: i64,
) -> Result<Vec<PopularContent>, AppError> {
    // content_id ASC를 두 번째 정렬 키로 두어 동률일 때도 순서가 고정됩니다
    let items = sqlx::query_as::<_, PopularContent>(
        r#"
        SELECT content_id,
               COUNT(*) AS total_views,
               COUNT(DISTINCT session_id) AS unique_visitors
        FROM view_events
        WHERE content_type = ?
        GROUP BY content_id
        ORDER BY total_views DESC, content_id ASC
        LIMIT ?
        "#,
    )
    .bind(content_type.as_str())
    .bind(limit) // LIMIT도 바인딩 가능합니다 (라우트에서 1..=100으로 검증)
    .fetch_all(pool)
    .await?;

    Ok(items)
}
