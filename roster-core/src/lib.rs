//! # Roster Core
//!
//! Sorted listings of an application's users, where each user lives in a flat
//! key-value record and application membership is tracked in a sorted set.
//!
//! ## Overview
//!
//! - **Records**: [`user::UserRecord`] is the main hash of a user. The derived
//!   risk score lives in a separate `:sorting` hash owned by the scoring job.
//! - **Store port**: [`database::RecordStore`] is the small command set the
//!   core needs (hashes, sorted sets, `SORT ... BY`). [`database::RedisStore`]
//!   implements it over Redis and [`database::MemoryStore`] in process.
//! - **Repository**: [`database::UserRepository`] maps ids to users and exposes
//!   the membership index.
//! - **Listings**: [`query::UserListing`] orders members by a
//!   [`query::SortKey`], pushing the sort down to the store and hydrating ids
//!   in order.
//!
//! ## Feature Flags
//!
//! - `redis`: Enables the Redis-backed store
//! - `demo`: Synthetic user seeding and score recomputation
//!
//! ## Examples
//!
//! ```no_run
//! use roster_core::{
//!     database::{KeyScheme, MemoryStore, UserRepository},
//!     query::{SortDirection, SortKey, UserListing},
//! };
//!
//! async fn newest_first() -> roster_core::Result<()> {
//!     let users =
//!         UserRepository::new(MemoryStore::new(), KeyScheme::default());
//!     let listing = UserListing::new(users);
//!     let newest = listing
//!         .list("app", SortKey::CreatedAt, SortDirection::Desc)
//!         .await?;
//!     for user in newest {
//!         println!("{user}");
//!     }
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Store port, key naming and store implementations
#[allow(missing_docs)]
pub mod database;

/// Demo-mode helpers for seeding synthetic users.
#[cfg(feature = "demo")]
#[cfg_attr(docsrs, doc(cfg(feature = "demo")))]
#[allow(missing_docs)]
pub mod demo;

/// Error types and error handling utilities
#[allow(missing_docs)]
pub mod error;

/// Sort descriptors and the listing engine
#[allow(missing_docs)]
pub mod query;

/// User entities and their flat record encoding
#[allow(missing_docs)]
pub mod user;

pub use error::{Result, RosterError};
