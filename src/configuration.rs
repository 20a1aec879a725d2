use std::{env, fs, ops::Deref, str::FromStr, sync::Arc};

use crate::{
    cache::ApiCache,
    dao::get_path,
    error::Error,
    handler::ActivityLog,
    provider::DatabasePool,
};

/// How many recent activity events are retained in-process per user.
pub const RECENT_ACTIVITY_CAPACITY: usize = 50;

/// How many DAOs the snapshot sweep refreshes each cycle. DAOs outside
/// this set only get fresh metrics on direct request.
pub const DEFAULT_ACTIVE_DAO_SWEEP_LIMIT: i64 = 25;

const DEFAULT_ENGAGEMENT_WINDOW_DAYS: u32 = 30;
const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_RETENTION_RATE: f64 = 0.85;
const DEFAULT_CACHE_TTL_SECONDS: u64 = 90;
const DEFAULT_NATIVE_CURRENCY: &str = "cUSD";

#[derive(Debug)]
pub struct AppState<T>(Arc<T>);

impl<T> AppState<T> {
    pub fn new(state: T) -> AppState<T> {
        AppState(Arc::new(state))
    }
}

impl<T> Clone for AppState<T> {
    fn clone(&self) -> AppState<T> {
        AppState(Arc::clone(&self.0))
    }
}

impl<T> Deref for AppState<T> {
    type Target = Arc<T>;

    fn deref(&self) -> &Arc<T> {
        &self.0
    }
}

#[derive(Debug)]
pub struct State {
    pub config: Config,
    pub database: DatabasePool,
    pub api_cache: ApiCache,
    pub activity_log: ActivityLog,
}

impl State {
    pub async fn new(
        config: Config,
        database: DatabasePool,
    ) -> Result<State, Error> {
        Self::init_migrations(&database).await?;
        Ok(Self {
            api_cache: ApiCache::new(config.cache_ttl_seconds),
            activity_log: ActivityLog::new(RECENT_ACTIVITY_CAPACITY),
            config,
            database,
        })
    }

    async fn init_migrations(database: &DatabasePool) -> Result<(), Error> {
        let files = vec![
            "daos.sql",
            "users.sql",
            "tasks.sql",
            "user_activities.sql",
            "proposals.sql",
            "votes.sql",
            "vote_delegations.sql",
            "vaults.sql",
            "transactions.sql",
            "dao_memberships.sql",
        ];

        let dir = env!("CARGO_MANIFEST_DIR");

        for file in files {
            let path = get_path(dir, file);
            let data = fs::read_to_string(path)?;
            sqlx::raw_sql(data.as_str())
                .execute(&database.pool)
                .await?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Rolling window classifying members as active and bounding treasury
    /// flow sums.
    pub engagement_window_days: u32,
    /// Snapshot sweep cadence.
    pub refresh_interval_seconds: u64,
    /// Retention reading reported when the prior window had no active
    /// users at all.
    pub retention_default: f64,
    pub cache_ttl_seconds: u64,
    pub active_dao_sweep_limit: i64,
    /// Currency reported for a treasury with no vaults.
    pub native_currency: String,
}

pub fn get_configuration() -> Result<Config, Error> {
    let database_url = env::var("DATABASE_URL")?;
    let server_host = env::var("SERVER_HOST")?;
    let port: u16 = env::var("PORT")?.parse()?;
    let allowed_origins = env::var("ALLOWED_ORIGINS")?
        .split(',')
        .map(|item| item.to_owned())
        .collect::<Vec<String>>();

    let engagement_window_days =
        env_or("ENGAGEMENT_WINDOW_DAYS", DEFAULT_ENGAGEMENT_WINDOW_DAYS)?;
    let refresh_interval_seconds = env_or(
        "REFRESH_INTERVAL_SECONDS",
        DEFAULT_REFRESH_INTERVAL_SECONDS,
    )?;
    let retention_default =
        env_or("RETENTION_DEFAULT", DEFAULT_RETENTION_RATE)?;
    let cache_ttl_seconds =
        env_or("CACHE_TTL_SECONDS", DEFAULT_CACHE_TTL_SECONDS)?;
    let active_dao_sweep_limit =
        env_or("ACTIVE_DAO_SWEEP_LIMIT", DEFAULT_ACTIVE_DAO_SWEEP_LIMIT)?;
    let native_currency = env::var("NATIVE_CURRENCY")
        .unwrap_or_else(|_| DEFAULT_NATIVE_CURRENCY.to_owned());

    Ok(Config {
        database_url,
        server_host,
        port,
        allowed_origins,
        engagement_window_days,
        refresh_interval_seconds,
        retention_default,
        cache_ttl_seconds,
        active_dao_sweep_limit,
        native_currency,
    })
}

fn env_or<T>(key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    Error: From<T::Err>,
{
    match env::var(key) {
        Ok(value) => Ok(value.parse()?),
        Err(_) => Ok(default),
    }
}

/// Loads `.env` from the manifest directory into the process environment.
/// A missing file is fine; deployment environments set variables directly.
pub fn set_configuration() -> Result<(), Error> {
    let config_file: &str = ".env";

    let directory = env!("CARGO_MANIFEST_DIR");
    let path = format!("{}/{}", directory, config_file);

    match fs::read_to_string(path) {
        Ok(config_string) => parse_config_string(config_string),
        Err(_) => Ok(()),
    }
}

fn parse_config_string(config: String) -> Result<(), Error> {
    let params: Vec<Option<(&str, &str)>> = config
        .split('\n')
        .map(|s| {
            let element = s.find('=');
            if let Some(e) = element {
                return Some(s.split_at(e));
            }
            None
        })
        .map(|value| {
            if let Some((k, v)) = value {
                return Some((k, &v[1..]));
            }
            None
        })
        .collect();

    for (key, value) in params.into_iter().flatten() {
        env::set_var(key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_prefers_default_when_unset() {
        env::remove_var("KWETU_TEST_UNSET");
        let value: u32 = env_or("KWETU_TEST_UNSET", 30).unwrap();
        assert_eq!(value, 30);
    }

    #[test]
    fn env_or_parses_set_values() {
        env::set_var("KWETU_TEST_WINDOW", "14");
        let value: u32 = env_or("KWETU_TEST_WINDOW", 30).unwrap();
        assert_eq!(value, 14);
        env::remove_var("KWETU_TEST_WINDOW");
    }

    #[test]
    fn env_or_rejects_garbage() {
        env::set_var("KWETU_TEST_GARBAGE", "not-a-number");
        let value: Result<u32, Error> = env_or("KWETU_TEST_GARBAGE", 30);
        assert!(value.is_err());
        env::remove_var("KWETU_TEST_GARBAGE");
    }

    #[test]
    fn config_lines_are_parsed_into_env() {
        parse_config_string(
            "KWETU_TEST_PARSE_A=hello\ninvalid line\nKWETU_TEST_PARSE_B=1".to_string(),
        )
        .unwrap();
        assert_eq!(env::var("KWETU_TEST_PARSE_A").unwrap(), "hello");
        assert_eq!(env::var("KWETU_TEST_PARSE_B").unwrap(), "1");
        env::remove_var("KWETU_TEST_PARSE_A");
        env::remove_var("KWETU_TEST_PARSE_B");
    }
}
