//! Service configuration, read once at startup.
//!
//! Values come from the process environment after `main` has loaded `.env`.
//! Missing or unparsable numeric values fall back to their defaults; an
//! unknown `BOARD_SORT` is logged and ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use kanban::columns::SortPolicy;
use tracing::warn;

pub(crate) const DEFAULT_PORT: u16 = 3000;
pub(crate) const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub(crate) const DEFAULT_BOARD_SORT: SortPolicy = SortPolicy::ScoreThenRecency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Postgres URL. `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    /// Column order used by `GET /api/board` when the request names none.
    pub board_sort: SortPolicy,
}

impl AppConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            database_url: env_string("DATABASE_URL"),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            board_sort: board_sort_from(env_string("BOARD_SORT").as_deref()),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn board_sort_from(raw: Option<&str>) -> SortPolicy {
    let Some(raw) = raw else {
        return DEFAULT_BOARD_SORT;
    };
    SortPolicy::parse(raw.trim()).unwrap_or_else(|| {
        warn!(value = raw, "unknown BOARD_SORT; using score order");
        DEFAULT_BOARD_SORT
    })
}
