//! Redis-backed redirection registry.

use std::collections::HashSet;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::Redirection;
use crate::domain::repositories::RedirectionRepository;
use crate::error::AppError;

/// Namespace for every key this repository writes.
pub const KEY_PREFIX: &str = "redirection:";

const SCAN_BATCH: usize = 100;

/// Stores each redirection as a plain string value under `redirection:{key}`.
///
/// Every operation is a single Redis command, so `create` (`SET NX`) and
/// `delete` (`GETDEL`) are atomic on the server side. Uses `ConnectionManager`
/// for automatic reconnection.
pub struct RedisRedirectionRepository {
    conn: ConnectionManager,
    key_prefix: String,
}

impl RedisRedirectionRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        Self::connect_with_prefix(redis_url, KEY_PREFIX).await
    }

    /// Same as [`Self::connect`] with a custom key namespace.
    pub async fn connect_with_prefix(redis_url: &str, key_prefix: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url).map_err(|e| AppError::from(e).context("redis connect"))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::from(e).context("redis connect"))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| AppError::from(e).context("redis ping"))?;

        info!("✓ Connected to Redis");

        Ok(Self {
            conn: manager,
            key_prefix: key_prefix.to_string(),
        })
    }

    fn build_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn strip_prefix<'a>(&self, redis_key: &'a str) -> Option<&'a str> {
        redis_key.strip_prefix(self.key_prefix.as_str())
    }

    /// Rebuilds an entity from a stored value.
    fn decode(key: &str, location: String) -> Result<Redirection, AppError> {
        Redirection::new(key, location).map_err(|e| {
            AppError::internal(
                format!("stored redirection is invalid: {e}"),
                json!({ "key": key }),
            )
        })
    }

    async fn scan_keys(&self) -> Result<Vec<String>, AppError> {
        let mut conn = self.conn.clone();
        let pattern = format!("{}*", self.key_prefix);
        let mut seen = HashSet::new();
        let mut cursor: u64 = 0;

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            // SCAN may return the same key more than once.
            seen.extend(batch);

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(seen.into_iter().collect())
    }
}

#[async_trait]
impl RedirectionRepository for RedisRedirectionRepository {
    async fn create(&self, redirection: Redirection) -> Result<(), AppError> {
        let redis_key = self.build_key(redirection.key());
        let mut conn = self.conn.clone();

        let inserted: bool = conn
            .set_nx(&redis_key, redirection.location())
            .await
            .map_err(|e| AppError::from(e).context("redis create"))?;

        if !inserted {
            return Err(AppError::conflict(
                "redirection already exists",
                json!({ "key": redirection.key() }),
            ));
        }

        debug!(key = redirection.key(), "Redis SET NX");
        Ok(())
    }

    async fn delete(&self, redirection: &Redirection) -> Result<(), AppError> {
        let redis_key = self.build_key(redirection.key());
        let mut conn = self.conn.clone();

        let removed: Option<String> = conn
            .get_del(&redis_key)
            .await
            .map_err(|e| AppError::from(e).context("redis delete"))?;

        match removed {
            Some(_) => {
                debug!(key = redirection.key(), "Redis GETDEL");
                Ok(())
            }
            None => Err(AppError::not_found(
                "redirection not found",
                json!({ "key": redirection.key() }),
            )),
        }
    }

    async fn find_by_key(&self, key: &str) -> Result<Redirection, AppError> {
        let mut conn = self.conn.clone();

        let location: Option<String> = conn
            .get(self.build_key(key))
            .await
            .map_err(|e| AppError::from(e).context("redis find"))?;

        match location {
            Some(location) => Self::decode(key, location),
            None => Err(AppError::not_found("redirection not found", json!({ "key": key }))),
        }
    }

    async fn find_all(&self) -> Result<Vec<Redirection>, AppError> {
        let redis_keys = self
            .scan_keys()
            .await
            .map_err(|e| e.context("redis find all"))?;

        let mut conn = self.conn.clone();
        let mut redirections = Vec::with_capacity(redis_keys.len());

        for redis_key in redis_keys {
            let Some(key) = self.strip_prefix(&redis_key) else {
                continue;
            };

            let location: Option<String> = conn
                .get(&redis_key)
                .await
                .map_err(|e| AppError::from(e).context("redis find all"))?;

            match location {
                Some(location) => match Self::decode(key, location) {
                    Ok(redirection) => redirections.push(redirection),
                    Err(e) => warn!(key, error = %e, "Skipping invalid stored redirection"),
                },
                // Deleted between SCAN and GET.
                None => continue,
            }
        }

        Ok(redirections)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        let mut conn = self.conn.clone();
        conn.ping::<()>().await.map_err(|e| AppError::from(e).context("redis ping"))
    }
}
