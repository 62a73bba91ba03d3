use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use crate::{
    database::ports::RecordStore,
    error::{Result, RosterError},
    query::sorting::{SortDirection, SortRequest},
};

/// `RecordStore` backed by a Redis server.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = redis::Client::open(redis_url).map_err(|e| {
            RosterError::Store(format!("Failed to create Redis client: {e}"))
        })?;

        let conn = ConnectionManager::new(client).await.map_err(|e| {
            RosterError::StoreUnavailable(format!(
                "Failed to connect to Redis: {e}"
            ))
        })?;

        info!("Successfully connected to Redis");

        Ok(Self::from_manager(conn))
    }

    pub fn from_manager(conn: ConnectionManager) -> Self {
        Self { conn }
    }
}

/// Connection-level failures become `StoreUnavailable`; replies such as
/// WRONGTYPE become `Store`.
fn store_error(command: &str, err: RedisError) -> RosterError {
    let message = format!("Redis {command} failed: {err}");
    if err.is_io_error()
        || err.is_connection_dropped()
        || err.is_connection_refusal()
        || err.is_timeout()
    {
        RosterError::StoreUnavailable(message)
    } else {
        RosterError::Store(message)
    }
}

#[async_trait]
impl RecordStore for RedisStore {
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        debug!("Redis HGETALL: {}", key);
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(key)
            .await
            .map_err(|e| store_error("HGETALL", e))?;
        Ok(fields)
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        debug!("Redis HGET: {} {}", key, field);
        let mut conn = self.conn.clone();
        let value: Option<String> = conn
            .hget(key, field)
            .await
            .map_err(|e| store_error("HGET", e))?;
        Ok(value)
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        debug!("Redis HSET: {} {}", key, field);
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset(key, field, value)
            .await
            .map_err(|e| store_error("HSET", e))?;
        Ok(())
    }

    async fn hset_all(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        if fields.is_empty() {
            return Ok(());
        }
        debug!("Redis HSET: {} ({} fields)", key, fields.len());
        let mut conn = self.conn.clone();
        let _: () = conn
            .hset_multiple(key, fields)
            .await
            .map_err(|e| store_error("HSET", e))?;
        Ok(())
    }

    async fn replace_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        debug!("Redis DEL+HSET: {} ({} fields)", key, fields.len());
        let mut conn = self.conn.clone();

        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();
        if !fields.is_empty() {
            pipe.hset_multiple(key, fields).ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| store_error("MULTI", e))?;
        Ok(())
    }

    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
        debug!("Redis ZADD: {} {} {}", key, score, member);
        let mut conn = self.conn.clone();
        let _: () = conn
            .zadd(key, member, score)
            .await
            .map_err(|e| store_error("ZADD", e))?;
        Ok(())
    }

    async fn zrange(
        &self,
        key: &str,
        direction: SortDirection,
    ) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        let members: Vec<String> = match direction {
            SortDirection::Asc => {
                debug!("Redis ZRANGE: {} 0 -1", key);
                conn.zrange(key, 0, -1)
                    .await
                    .map_err(|e| store_error("ZRANGE", e))?
            }
            SortDirection::Desc => {
                debug!("Redis ZREVRANGE: {} 0 -1", key);
                conn.zrevrange(key, 0, -1)
                    .await
                    .map_err(|e| store_error("ZREVRANGE", e))?
            }
        };
        Ok(members)
    }

    async fn zcard(&self, key: &str) -> Result<usize> {
        let mut conn = self.conn.clone();
        let count: usize =
            conn.zcard(key).await.map_err(|e| store_error("ZCARD", e))?;
        Ok(count)
    }

    async fn sort_by(
        &self,
        key: &str,
        request: &SortRequest,
    ) -> Result<Vec<String>> {
        debug!(
            "Redis SORT: {} BY {}{} {}",
            key,
            request.pattern,
            if request.alpha { " ALPHA" } else { "" },
            request.direction.as_command_arg()
        );

        let mut cmd = redis::cmd("SORT");
        cmd.arg(key).arg("BY").arg(&request.pattern);
        if request.alpha {
            cmd.arg("ALPHA");
        }
        cmd.arg(request.direction.as_command_arg());

        let mut conn = self.conn.clone();
        let members: Vec<String> = cmd
            .query_async(&mut conn)
            .await
            .map_err(|e| store_error("SORT", e))?;
        Ok(members)
    }
}
