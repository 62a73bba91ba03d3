use tracing::{debug, warn};

use crate::{
    database::{keys::KeyScheme, ports::RecordStore},
    error::{Result, RosterError},
    query::sorting::SortDirection,
    user::{User, UserRecord, fields, parse_integer},
};

/// Maps user ids to their records and exposes an application's membership
/// index. Nothing is cached; every call goes to the store.
#[derive(Debug, Clone)]
pub struct UserRepository<S> {
    store: S,
    keys: KeyScheme,
}

pub(crate) fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(RosterError::InvalidIdentifier);
    }
    Ok(())
}

impl<S: RecordStore> UserRepository<S> {
    pub fn new(store: S, keys: KeyScheme) -> Self {
        Self { store, keys }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &KeyScheme {
        &self.keys
    }

    /// Load the main record and derived score of one user.
    ///
    /// Fails with `NotFound` when the main record does not exist. A missing
    /// score record only leaves `score` empty.
    pub async fn get_entity(&self, id: &str) -> Result<User> {
        require_id(id)?;

        let raw = self.store.hgetall(&self.keys.user(id)).await?;
        if raw.is_empty() {
            return Err(RosterError::NotFound(id.to_string()));
        }
        let record = UserRecord::from_fields(raw);
        let score = self.get_score(id).await?;

        Ok(User {
            id: id.to_string(),
            record,
            score,
        })
    }

    /// Overwrite the main record. Fields not in `record` are removed.
    pub async fn put_entity(
        &self,
        id: &str,
        record: &UserRecord,
    ) -> Result<()> {
        require_id(id)?;
        self.store
            .replace_hash(&self.keys.user(id), &record.to_fields())
            .await
    }

    /// Write the attributes present in `record`. Other fields are untouched.
    pub async fn merge_entity(
        &self,
        id: &str,
        record: &UserRecord,
    ) -> Result<()> {
        require_id(id)?;
        self.store
            .hset_all(&self.keys.user(id), &record.to_fields())
            .await
    }

    pub async fn get_score(&self, id: &str) -> Result<Option<i64>> {
        require_id(id)?;
        let raw = self
            .store
            .hget(&self.keys.user_sorting(id), fields::RISK_SCORE)
            .await?;
        Ok(raw.and_then(|value| parse_integer(fields::RISK_SCORE, &value)))
    }

    /// Record a derived score. Only the auxiliary record is touched.
    pub async fn set_score(&self, id: &str, score: i64) -> Result<()> {
        require_id(id)?;
        self.store
            .hset(
                &self.keys.user_sorting(id),
                fields::RISK_SCORE,
                &score.to_string(),
            )
            .await
    }

    /// Member ids in membership score order.
    pub async fn membership_ids(
        &self,
        app_id: &str,
        direction: SortDirection,
    ) -> Result<Vec<String>> {
        require_id(app_id)?;
        self.store
            .zrange(&self.keys.membership(app_id), direction)
            .await
    }

    pub async fn member_count(&self, app_id: &str) -> Result<usize> {
        require_id(app_id)?;
        self.store.zcard(&self.keys.membership(app_id)).await
    }

    /// Insert or re-score a member. Re-adding with the same score is a no-op.
    pub async fn add_member(
        &self,
        app_id: &str,
        id: &str,
        score: i64,
    ) -> Result<()> {
        require_id(app_id)?;
        require_id(id)?;
        self.store
            .zadd(&self.keys.membership(app_id), score as f64, id)
            .await
    }

    /// Store a new user and index it under `app_id` by creation time.
    pub async fn register(&self, app_id: &str, user: &User) -> Result<()> {
        let created_at = user.record.created_at.ok_or_else(|| {
            RosterError::InvalidRecord(format!(
                "user {} has no created_at",
                user.id
            ))
        })?;

        self.put_entity(&user.id, &user.record).await?;
        if let Some(score) = user.score {
            self.set_score(&user.id, score).await?;
        }
        self.add_member(app_id, &user.id, created_at).await?;
        debug!("Registered user {} in {}", user.id, app_id);
        Ok(())
    }

    /// Load users in the given order. A member without a main record becomes
    /// an empty `User`, so the output always has one entry per id.
    pub async fn hydrate(&self, ids: &[String]) -> Result<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_entity(id).await {
                Ok(user) => users.push(user),
                Err(RosterError::NotFound(_)) => {
                    warn!("Member {} has no record; listing it empty", id);
                    let score = self.get_score(id).await?;
                    users.push(User {
                        score,
                        ..User::empty(id.as_str())
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(users)
    }
}
