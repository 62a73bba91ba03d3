#![allow(dead_code)]

use roster_core::{
    database::{KeyScheme, MemoryStore, UserRepository},
    query::UserListing,
    user::{User, UserRecord},
};

pub const APP: &str = "0c6c0d2e-7665-48ed-b923-cd77c0a48c8f";

/// One seeded member. `None` fields are left out of the stored records.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    pub id: String,
    pub joined_at: i64,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub email: Option<String>,
    pub score: Option<i64>,
}

impl Seed {
    pub fn new(id: impl Into<String>, joined_at: i64) -> Self {
        Self {
            id: id.into(),
            joined_at,
            created_at: Some(joined_at),
            ..Self::default()
        }
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn updated_at(mut self, ts: i64) -> Self {
        self.updated_at = Some(ts);
        self
    }

    pub fn score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }
}

pub fn keys() -> KeyScheme {
    KeyScheme::default().with_namespace("test")
}

pub async fn seeded_listing(
    seeds: &[Seed],
) -> (MemoryStore, UserListing<MemoryStore>) {
    let store = MemoryStore::new();
    let users = UserRepository::new(store.clone(), keys());

    for seed in seeds {
        let record = UserRecord {
            email: seed.email.clone(),
            created_at: seed.created_at,
            updated_at: seed.updated_at,
            ..UserRecord::default()
        };
        users.put_entity(&seed.id, &record).await.expect("put user");
        if let Some(score) = seed.score {
            users.set_score(&seed.id, score).await.expect("set score");
        }
        users
            .add_member(APP, &seed.id, seed.joined_at)
            .await
            .expect("add member");
    }

    (store, UserListing::new(users))
}

pub fn ids(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.id.as_str()).collect()
}
