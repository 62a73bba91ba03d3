//! Sort projection over an application's membership index.
//!
//! Membership order is served straight from the sorted set. Every other key
//! becomes a single store-side `SORT ... BY <pattern>`, so ordering and field
//! dereferencing happen in one store command. Ids are then hydrated in the
//! returned order; nothing is re-sorted afterwards.

use tracing::debug;

use crate::{
    database::{
        ports::RecordStore,
        repository::{UserRepository, require_id},
    },
    error::Result,
    query::sorting::{
        ComparatorKind, ListQuery, SortDirection, SortKey, SortRequest,
    },
    user::User,
};

#[derive(Debug, Clone)]
pub struct UserListing<S> {
    users: UserRepository<S>,
}

impl<S: RecordStore> UserListing<S> {
    pub fn new(users: UserRepository<S>) -> Self {
        Self { users }
    }

    pub fn repository(&self) -> &UserRepository<S> {
        &self.users
    }

    /// The store request used for `key`, or `None` when membership order
    /// already answers it.
    pub fn sort_request(
        &self,
        key: SortKey,
        direction: SortDirection,
    ) -> Option<SortRequest> {
        match key.comparator() {
            ComparatorKind::Native => None,
            comparator => {
                let pattern = self.users.keys().sort_pattern(key)?;
                Some(SortRequest::new(pattern, comparator, direction))
            }
        }
    }

    /// Member ids of `app_id` ordered by `key`.
    pub async fn ordered_ids(
        &self,
        app_id: &str,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<String>> {
        require_id(app_id)?;
        match self.sort_request(key, direction) {
            None => self.users.membership_ids(app_id, direction).await,
            Some(request) => {
                let index = self.users.keys().membership(app_id);
                self.users.store().sort_by(&index, &request).await
            }
        }
    }

    /// Users of `app_id` ordered by `key`. Every member appears exactly once,
    /// including members whose sort field is missing.
    pub async fn list(
        &self,
        app_id: &str,
        key: SortKey,
        direction: SortDirection,
    ) -> Result<Vec<User>> {
        let ids = self.ordered_ids(app_id, key, direction).await?;
        debug!(
            "Listing {} users of {} by {} {}",
            ids.len(),
            app_id,
            key,
            direction
        );
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.users.hydrate(&ids).await
    }

    pub async fn list_query(
        &self,
        app_id: &str,
        query: ListQuery,
    ) -> Result<Vec<User>> {
        self.list(app_id, query.sort_by, query.direction).await
    }

    /// Entry point for untyped callers. The descriptor and direction are
    /// validated before any store call.
    pub async fn list_raw(
        &self,
        app_id: &str,
        sort_by: &str,
        direction: &str,
    ) -> Result<Vec<User>> {
        let query = ListQuery::parse(sort_by, direction)?;
        self.list_query(app_id, query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{keys::KeyScheme, ports::MockRecordStore};
    use crate::error::RosterError;
    use std::collections::HashMap;

    fn listing(mock: MockRecordStore) -> UserListing<MockRecordStore> {
        UserListing::new(UserRepository::new(mock, KeyScheme::default()))
    }

    #[test]
    fn native_order_needs_no_sort_request() {
        let listing = listing(MockRecordStore::new());
        assert_eq!(
            listing.sort_request(SortKey::None, SortDirection::Asc),
            None
        );

        let request = listing
            .sort_request(SortKey::Email, SortDirection::Desc)
            .unwrap();
        assert_eq!(request.pattern, "identity:user:*->email");
        assert!(request.alpha);
        assert_eq!(request.direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn invalid_descriptor_makes_no_store_calls() {
        let err = listing(MockRecordStore::new())
            .list_raw("app", "rank", "asc")
            .await
            .unwrap_err();
        assert_eq!(err, RosterError::InvalidDescriptor("rank".into()));
    }

    #[tokio::test]
    async fn empty_app_id_is_rejected_for_every_key() {
        // No expectations: any store call would panic.
        let listing = listing(MockRecordStore::new());
        for key in SortKey::ALL {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let err = listing.list("", key, direction).await.unwrap_err();
                assert_eq!(err, RosterError::InvalidIdentifier, "{key}");
            }
        }
    }

    #[tokio::test]
    async fn score_sorts_through_the_sorting_record() {
        let mut mock = MockRecordStore::new();
        mock.expect_sort_by()
            .withf(|key, request| {
                key == "identity:oauthapp:app:index:users:created_at"
                    && request.pattern == "identity:user:*:sorting->risk_score"
                    && !request.alpha
                    && request.direction == SortDirection::Desc
            })
            .times(1)
            .returning(|_, _| Ok(vec!["u2".to_string(), "u1".to_string()]));
        mock.expect_hgetall().returning(|key| {
            let created = if key.ends_with("u1") { "100" } else { "200" };
            Ok(HashMap::from([(
                "created_at".to_string(),
                created.to_string(),
            )]))
        });
        mock.expect_hget().returning(|key, _| {
            Ok(Some(if key.contains("u1") { "10" } else { "90" }.to_string()))
        });

        let users = listing(mock)
            .list("app", SortKey::Score, SortDirection::Desc)
            .await
            .unwrap();

        let ids: Vec<_> = users.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
        assert_eq!(users[0].score, Some(90));
    }

    #[tokio::test]
    async fn sort_failure_is_surfaced() {
        let mut mock = MockRecordStore::new();
        mock.expect_sort_by().returning(|_, _| {
            Err(RosterError::StoreUnavailable("broken pipe".into()))
        });

        let err = listing(mock)
            .list("app", SortKey::CreatedAt, SortDirection::Asc)
            .await
            .unwrap_err();
        assert_eq!(err, RosterError::StoreUnavailable("broken pipe".into()));
    }

    #[tokio::test]
    async fn hydration_failure_aborts_the_listing() {
        let mut mock = MockRecordStore::new();
        mock.expect_zrange()
            .returning(|_, _| Ok(vec!["u1".to_string(), "u2".to_string()]));
        mock.expect_hgetall().returning(|key| {
            if key.ends_with("u2") {
                Err(RosterError::StoreUnavailable("timeout".into()))
            } else {
                Ok(HashMap::from([("email".to_string(), "a@x".to_string())]))
            }
        });
        mock.expect_hget().returning(|_, _| Ok(None));

        let err = listing(mock)
            .list("app", SortKey::None, SortDirection::Asc)
            .await
            .unwrap_err();
        assert_eq!(err, RosterError::StoreUnavailable("timeout".into()));
    }
}
