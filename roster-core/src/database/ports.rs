use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::Result;
use crate::query::sorting::{SortDirection, SortRequest};

/// Command set the listing core needs from a key-value / sorted-set store.
///
/// Every call round-trips to the store. Implementations must surface
/// transport failures as `RosterError::StoreUnavailable` and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `HGETALL`. A missing key yields an empty map.
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>>;
    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>>;
    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()>;
    /// Merge `fields` into the hash. Untouched fields survive.
    async fn hset_all(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()>;
    /// Atomically drop the hash and write `fields` in its place.
    async fn replace_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()>;

    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()>;
    /// Full range (`0 -1`) in ascending or descending score order.
    async fn zrange(
        &self,
        key: &str,
        direction: SortDirection,
    ) -> Result<Vec<String>>;
    async fn zcard(&self, key: &str) -> Result<usize>;

    /// `SORT key BY pattern [ALPHA] ASC|DESC` over the members of `key`.
    async fn sort_by(
        &self,
        key: &str,
        request: &SortRequest,
    ) -> Result<Vec<String>>;
}
