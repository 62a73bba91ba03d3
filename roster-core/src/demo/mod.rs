//! Synthetic data for local runs: seeded users with spread-out timestamps and
//! a batch job that recomputes every member's risk score.
//!
//! Random values are drawn before any await so the returned futures stay
//! `Send`.

use chrono::Utc;
use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::{
    database::{ports::RecordStore, repository::UserRepository},
    error::Result,
    query::sorting::SortDirection,
    user::{User, UserRecord},
};

pub mod config;

pub use config::DemoSeedOptions;


pub const SCORE_RANGE: std::ops::RangeInclusive<i64> = 1..=100;

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// `now` pushed forward by a random product of day, hour, minute and second
/// factors, which scatters users over roughly the next few months.
pub fn new_timestamp<R: Rng + ?Sized>(rng: &mut R, now: i64) -> i64 {
    let day: i64 = rng.random_range(1..=10);
    let hour: i64 = rng.random_range(1..=24);
    let minute: i64 = rng.random_range(1..=60);
    let second: i64 = rng.random_range(1..=60);
    now + day * hour * minute * second
}

pub fn random_score<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.random_range(SCORE_RANGE)
}

/// Build `opts.users` users without touching the store.
pub fn generate_users<R: Rng + ?Sized>(
    rng: &mut R,
    now: i64,
    opts: &DemoSeedOptions,
) -> Vec<User> {
    (0..opts.users)
        .map(|i| User {
            id: new_id(),
            record: UserRecord::new(
                format!("user{i}@{}", opts.email_domain),
                new_timestamp(rng, now),
                new_timestamp(rng, now),
            ),
            score: opts.with_scores.then(|| random_score(rng)),
        })
        .collect()
}

/// Create synthetic users and index them under `app_id`. Returns their ids in
/// creation order.
pub async fn seed_app_users<S: RecordStore>(
    users: &UserRepository<S>,
    app_id: &str,
    opts: &DemoSeedOptions,
) -> Result<Vec<String>> {
    let generated = {
        let mut rng = rand::rng();
        generate_users(&mut rng, Utc::now().timestamp(), opts)
    };

    for user in &generated {
        users.register(app_id, user).await?;
    }

    info!("Seeded {} users into {}", generated.len(), app_id);
    Ok(generated.into_iter().map(|user| user.id).collect())
}

/// Recompute the risk score of every member of `app_id`. Only the auxiliary
/// sorting records are written. Returns the number of scores written.
pub async fn prepare_scores<S: RecordStore>(
    users: &UserRepository<S>,
    app_id: &str,
) -> Result<usize> {
    let ids = users.membership_ids(app_id, SortDirection::Desc).await?;
    let scores: Vec<i64> = {
        let mut rng = rand::rng();
        ids.iter().map(|_| random_score(&mut rng)).collect()
    };

    for (id, score) in ids.iter().zip(scores) {
        users.set_score(id, score).await?;
    }

    info!("Prepared {} risk scores for {}", ids.len(), app_id);
    Ok(ids.len())
}
