//! Storage metrics: per-query latency and connection pool occupancy.

use metrics::{gauge, histogram};
use sqlx::SqlitePool;
use std::time::Instant;

const QUERY_DURATION: &str = "phrasebook_db_query_duration_seconds";

/// Records how long one named query took and whether it succeeded.
pub fn record_query_duration(query: &'static str, outcome: &'static str, duration_secs: f64) {
    histogram!(QUERY_DURATION, "query" => query, "outcome" => outcome).record(duration_secs);
}

/// Snapshot of the connection pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    pub total: u32,
    pub idle: u32,
    pub active: u32,
}

impl PoolStats {
    pub fn of(pool: &SqlitePool) -> Self {
        let total = pool.size();
        let idle = u32::try_from(pool.num_idle()).unwrap_or(total);
        Self {
            total,
            idle,
            active: total.saturating_sub(idle),
        }
    }
}

/// Publishes pool occupancy as gauges. Called from the health check.
pub fn record_pool_metrics(pool: &SqlitePool) -> PoolStats {
    let stats = PoolStats::of(pool);
    gauge!("phrasebook_db_connections_total").set(f64::from(stats.total));
    gauge!("phrasebook_db_connections_idle").set(f64::from(stats.idle));
    gauge!("phrasebook_db_connections_active").set(f64::from(stats.active));
    stats
}

/// Wall-clock timer around one repository query.
///
/// ```ignore
/// let timer = QueryTimer::start("list_phrases");
/// timer.finish(sqlx::query_as(...).fetch_all(&pool).await)
/// ```
pub struct QueryTimer {
    query: &'static str,
    started: Instant,
}

impl QueryTimer {
    pub fn start(query: &'static str) -> Self {
        Self {
            query,
            started: Instant::now(),
        }
    }

    /// Records the elapsed time labelled with the result's outcome and hands
    /// the result back unchanged.
    pub fn finish<T, E>(self, result: Result<T, E>) -> Result<T, E> {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        record_query_duration(self.query, outcome, self.started.elapsed().as_secs_f64());
        result
    }
}
