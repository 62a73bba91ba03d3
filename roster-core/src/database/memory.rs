//! In-process `RecordStore`.
//!
//! Mirrors the Redis semantics the listing core relies on, including
//! `SORT ... BY` dereferencing, so listings can run without a server. Failure
//! injection makes it usable as a test double for an unreachable store.

use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    database::ports::RecordStore,
    error::{Result, RosterError},
    query::sorting::{SortDirection, SortRequest},
};

const WRONGTYPE: &str =
    "WRONGTYPE Operation against a key holding the wrong kind of value";

const NOT_A_DOUBLE: &str =
    "One or more scores can't be converted into double";

#[derive(Debug, Default)]
struct MemoryState {
    hashes: HashMap<String, HashMap<String, String>>,
    sorted_sets: HashMap<String, HashMap<String, f64>>,
}

impl MemoryState {
    fn hash(&self, key: &str) -> Result<Option<&HashMap<String, String>>> {
        if self.sorted_sets.contains_key(key) {
            return Err(RosterError::Store(WRONGTYPE.to_string()));
        }
        Ok(self.hashes.get(key))
    }

    fn hash_mut(&mut self, key: &str) -> Result<&mut HashMap<String, String>> {
        if self.sorted_sets.contains_key(key) {
            return Err(RosterError::Store(WRONGTYPE.to_string()));
        }
        Ok(self.hashes.entry(key.to_string()).or_default())
    }

    fn sorted_set(&self, key: &str) -> Result<Option<&HashMap<String, f64>>> {
        if self.hashes.contains_key(key) {
            return Err(RosterError::Store(WRONGTYPE.to_string()));
        }
        Ok(self.sorted_sets.get(key))
    }

    /// Members ordered by `(score, member)` as ZRANGE returns them.
    fn ranked(&self, key: &str) -> Result<Vec<String>> {
        let Some(set) = self.sorted_set(key)? else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<(&String, f64)> =
            set.iter().map(|(m, s)| (m, *s)).collect();
        entries.sort_by(|a, b| {
            a.1.total_cmp(&b.1).then_with(|| a.0.as_bytes().cmp(b.0.as_bytes()))
        });
        Ok(entries.into_iter().map(|(m, _)| m.clone()).collect())
    }

    /// Resolve `pattern` for one member. Only hash-field patterns can hit.
    fn dereference(&self, pattern: &str, member: &str) -> Option<&String> {
        let star = pattern.find('*')?;
        let arrow = pattern[star + 1..].find("->").map(|i| star + 1 + i);
        let (key_pattern, field) = match arrow {
            Some(pos) if pos + 2 < pattern.len() => {
                (&pattern[..pos], &pattern[pos + 2..])
            }
            _ => return None,
        };
        let key = key_pattern.replacen('*', member, 1);
        self.hashes.get(&key)?.get(field)
    }
}

/// Numeric value of a dereferenced field as Redis SORT reads it with
/// `strtod`: leading whitespace is skipped, an empty value is zero, and any
/// trailing text or NaN is rejected.
fn parse_sort_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|number| !number.is_nan())
}

#[derive(Clone, Debug)]
enum SortValue {
    Number(f64),
    Text(Option<String>),
}

/// Redis SORT comparison: values first, members byte-wise on ties, the whole
/// result negated for DESC.
fn compare_sorted(
    a: &(String, SortValue),
    b: &(String, SortValue),
    direction: SortDirection,
) -> Ordering {
    let by_value = match (&a.1, &b.1) {
        (SortValue::Number(x), SortValue::Number(y)) => x.total_cmp(y),
        (SortValue::Text(x), SortValue::Text(y)) => match (x, y) {
            (Some(x), Some(y)) => x.as_bytes().cmp(y.as_bytes()),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
        _ => Ordering::Equal,
    };
    let ordering =
        by_value.then_with(|| a.0.as_bytes().cmp(b.0.as_bytes()));
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
    unavailable: Arc<AtomicBool>,
    commands: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every command fails with `StoreUnavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, AtomicOrdering::SeqCst);
    }

    /// Number of commands received so far, failed ones included.
    pub fn command_count(&self) -> usize {
        self.commands.load(AtomicOrdering::SeqCst)
    }

    fn begin(&self, command: &str, key: &str) -> Result<()> {
        self.commands.fetch_add(1, AtomicOrdering::SeqCst);
        debug!("Memory {}: {}", command, key);
        if self.unavailable.load(AtomicOrdering::SeqCst) {
            return Err(RosterError::StoreUnavailable(format!(
                "{command} {key}: connection refused"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn hgetall(&self, key: &str) -> Result<HashMap<String, String>> {
        self.begin("HGETALL", key)?;
        let state = self.state.read().await;
        Ok(state.hash(key)?.cloned().unwrap_or_default())
    }

    async fn hget(&self, key: &str, field: &str) -> Result<Option<String>> {
        self.begin("HGET", key)?;
        let state = self.state.read().await;
        Ok(state.hash(key)?.and_then(|hash| hash.get(field).cloned()))
    }

    async fn hset(&self, key: &str, field: &str, value: &str) -> Result<()> {
        self.begin("HSET", key)?;
        let mut state = self.state.write().await;
        state
            .hash_mut(key)?
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hset_all(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        self.begin("HSET", key)?;
        if fields.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().await;
        state.hash_mut(key)?.extend(fields.iter().cloned());
        Ok(())
    }

    async fn replace_hash(
        &self,
        key: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        self.begin("DEL+HSET", key)?;
        let mut state = self.state.write().await;
        state.sorted_sets.remove(key);
        if fields.is_empty() {
            state.hashes.remove(key);
        } else {
            state
                .hashes
                .insert(key.to_string(), fields.iter().cloned().collect());
        }
        Ok(())
    }

    async fn zadd(&self, key: &str, score: f64, member: &str) -> Result<()> {
        self.begin("ZADD", key)?;
        let mut state = self.state.write().await;
        if state.hashes.contains_key(key) {
            return Err(RosterError::Store(WRONGTYPE.to_string()));
        }
        state
            .sorted_sets
            .entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn zrange(
        &self,
        key: &str,
        direction: SortDirection,
    ) -> Result<Vec<String>> {
        self.begin("ZRANGE", key)?;
        let state = self.state.read().await;
        let mut members = state.ranked(key)?;
        if direction == SortDirection::Desc {
            members.reverse();
        }
        Ok(members)
    }

    async fn zcard(&self, key: &str) -> Result<usize> {
        self.begin("ZCARD", key)?;
        let state = self.state.read().await;
        Ok(state.sorted_set(key)?.map_or(0, HashMap::len))
    }

    async fn sort_by(
        &self,
        key: &str,
        request: &SortRequest,
    ) -> Result<Vec<String>> {
        self.begin("SORT", key)?;
        let state = self.state.read().await;
        let members = state.ranked(key)?;

        // A pattern without a wildcard means "do not sort".
        if !request.pattern.contains('*') {
            return Ok(members);
        }

        let mut keyed = Vec::with_capacity(members.len());
        for member in members {
            let raw = state.dereference(&request.pattern, &member);
            let value = if request.alpha {
                SortValue::Text(raw.cloned())
            } else {
                let number = match raw {
                    None => Some(0.0),
                    Some(text) => parse_sort_number(text),
                };
                SortValue::Number(number.ok_or_else(|| {
                    RosterError::Store(NOT_A_DOUBLE.to_string())
                })?)
            };
            keyed.push((member, value));
        }

        keyed.sort_by(|a, b| compare_sorted(a, b, request.direction));
        Ok(keyed.into_iter().map(|(member, _)| member).collect())
    }
}
