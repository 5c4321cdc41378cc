//! # Analytics Aggregator
//!
//! Rolls the per-day counters into the dashboard report: a 7-day series,
//! week-over-week trend, lifetime totals and the top articles.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use domains::{Article, ArticleRepository, DailyStat, Result, ViewStatsRepository};
use serde::Serialize;
use uuid::Uuid;

/// Days per comparison window.
pub const WINDOW_DAYS: i64 = 7;

/// How many articles the "top performing" table shows.
pub const TOP_ARTICLES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. "Mon"
    pub label: String,
    pub views: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopArticle {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub published: bool,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Article> for TopArticle {
    fn from(article: Article) -> Self {
        TopArticle {
            id: article.id,
            title: article.title,
            slug: article.slug,
            published: article.published,
            views: article.views,
            created_at: article.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsReport {
    pub total_views: i64,
    pub article_count: i64,
    pub average_views: i64,
    pub current_week_total: i64,
    pub previous_week_total: i64,
    pub trend_percent: i64,
    /// Oldest day first
    pub series: Vec<DayPoint>,
    pub top_articles: Vec<TopArticle>,
}

/// The last `WINDOW_DAYS` days ending at `today`, oldest first, and the
/// `WINDOW_DAYS` days before them.
pub fn comparison_windows(today: NaiveDate) -> (Vec<NaiveDate>, Vec<NaiveDate>) {
    let current = (0..WINDOW_DAYS)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect();
    let previous = (WINDOW_DAYS..2 * WINDOW_DAYS)
        .rev()
        .map(|back| today - Duration::days(back))
        .collect();
    (current, previous)
}

/// Sums rows per day.
pub fn group_by_day(rows: &[DailyStat]) -> HashMap<NaiveDate, i64> {
    let mut totals = HashMap::new();
    for row in rows {
        *totals.entry(row.day).or_insert(0) += row.views;
    }
    totals
}

/// Looks up each day, missing days count as zero.
pub fn fill_days(days: &[NaiveDate], totals: &HashMap<NaiveDate, i64>) -> Vec<i64> {
    days.iter()
        .map(|day| totals.get(day).copied().unwrap_or(0))
        .collect()
}

/// Week-over-week change in percent, rounded half away from zero.
/// A rise from nothing is pinned at 100, nothing to nothing is 0.
pub fn trend_percent(current: i64, previous: i64) -> i64 {
    if previous > 0 {
        (((current - previous) as f64 / previous as f64) * 100.0).round() as i64
    } else if current > 0 {
        100
    } else {
        0
    }
}

/// Rounded mean, 0 when there is nothing to divide by.
pub fn average_views(total_views: i64, article_count: i64) -> i64 {
    if article_count <= 0 {
        return 0;
    }
    (total_views as f64 / article_count as f64).round() as i64
}

#[derive(Clone)]
pub struct AnalyticsService {
    articles: Arc<dyn ArticleRepository>,
    stats: Arc<dyn ViewStatsRepository>,
}

impl AnalyticsService {
    pub fn new(articles: Arc<dyn ArticleRepository>, stats: Arc<dyn ViewStatsRepository>) -> Self {
        Self { articles, stats }
    }

    /// Builds the report for `owner_id` as seen at `now`.
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn report(&self, owner_id: Uuid, now: DateTime<Utc>) -> Result<AnalyticsReport> {
        let (current, previous) = comparison_windows(now.date_naive());

        // 1. Daily rows for the whole 14-day window, one query
        let rows = self
            .stats
            .daily_stats(owner_id, previous[0], current[current.len() - 1])
            .await?;
        let totals = group_by_day(&rows);

        // 2. Gap-filled weeks
        let current_views = fill_days(&current, &totals);
        let previous_views = fill_days(&previous, &totals);
        let current_week_total: i64 = current_views.iter().sum();
        let previous_week_total: i64 = previous_views.iter().sum();

        // 3. Lifetime numbers come from the article counters
        let lifetime = self.articles.view_totals(owner_id).await?;
        let top_articles = self
            .articles
            .top_articles(owner_id, TOP_ARTICLES)
            .await?
            .into_iter()
            .map(TopArticle::from)
            .collect();

        let series = current
            .iter()
            .zip(current_views)
            .map(|(date, views)| DayPoint {
                date: *date,
                label: date.format("%a").to_string(),
                views,
            })
            .collect();

        Ok(AnalyticsReport {
            total_views: lifetime.total_views,
            article_count: lifetime.article_count,
            average_views: average_views(lifetime.total_views, lifetime.article_count),
            current_week_total,
            previous_week_total,
            trend_percent: trend_percent(current_week_total, previous_week_total),
            series,
            top_articles,
        })
    }
}
