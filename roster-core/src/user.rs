//! User entities as they are laid out in the store.
//!
//! The store has no schema: every attribute is a flat string field. Decoding
//! is lenient, so an absent or malformed field becomes `None` instead of an
//! error. A malformed value is kept verbatim in `extra` and written back
//! unchanged. Numeric or lexicographic meaning is decided by the query, never
//! here.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::warn;

/// Field names used in the main and auxiliary records.
pub mod fields {
    pub const EMAIL: &str = "email";
    pub const CREATED_AT: &str = "created_at";
    pub const UPDATED_AT: &str = "updated_at";
    /// Lives in the auxiliary `:sorting` record, never in the main one.
    pub const RISK_SCORE: &str = "risk_score";
}

/// Contents of a user's main record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: Option<String>,
    /// Seconds since the Unix epoch.
    pub created_at: Option<i64>,
    /// Seconds since the Unix epoch.
    pub updated_at: Option<i64>,
    /// Fields written by other producers, and typed fields whose stored value
    /// did not parse. Kept so a replace round-trips them.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl UserRecord {
    pub fn new(
        email: impl Into<String>,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            email: Some(email.into()),
            created_at: Some(created_at),
            updated_at: Some(updated_at),
            extra: BTreeMap::new(),
        }
    }

    /// Decode a record from the raw hash returned by the store.
    pub fn from_fields(mut raw: HashMap<String, String>) -> Self {
        let email = raw.remove(fields::EMAIL);
        let created_at = take_integer(&mut raw, fields::CREATED_AT);
        let updated_at = take_integer(&mut raw, fields::UPDATED_AT);

        Self {
            email,
            created_at,
            updated_at,
            extra: raw.into_iter().collect(),
        }
    }

    /// Flatten into `(field, value)` pairs. Absent attributes are omitted.
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(3 + self.extra.len());
        if let Some(email) = &self.email {
            out.push((fields::EMAIL.to_string(), email.clone()));
        }
        if let Some(created_at) = self.created_at {
            out.push((fields::CREATED_AT.to_string(), created_at.to_string()));
        }
        if let Some(updated_at) = self.updated_at {
            out.push((fields::UPDATED_AT.to_string(), updated_at.to_string()));
        }
        // A typed value that is set wins over a raw one kept from the store.
        for (field, value) in &self.extra {
            if !out.iter().any(|(written, _)| written == field) {
                out.push((field.clone(), value.clone()));
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.created_at.is_none()
            && self.updated_at.is_none()
            && self.extra.is_empty()
    }
}

/// Remove and parse an integer field. An unparsable value stays in `raw`.
fn take_integer(
    raw: &mut HashMap<String, String>,
    field: &'static str,
) -> Option<i64> {
    let parsed = parse_integer(field, raw.get(field)?);
    if parsed.is_some() {
        raw.remove(field);
    }
    parsed
}

pub(crate) fn parse_integer(field: &str, value: &str) -> Option<i64> {
    match value.parse::<i64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("Non-integer value {:?} in field {}", value, field);
            None
        }
    }
}

/// A fully hydrated user: main record plus the derived score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub record: UserRecord,
    /// Read from the auxiliary `:sorting` record.
    pub score: Option<i64>,
}

impl User {
    /// Placeholder for a member whose main record is missing.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.record.email.as_deref()
    }

    pub fn created_at(&self) -> Option<i64> {
        self.record.created_at
    }

    pub fn updated_at(&self) -> Option<i64> {
        self.record.updated_at
    }

    /// Typed value of an integer field, or the raw stored text when it did
    /// not parse.
    fn shown_integer(
        &self,
        typed: Option<i64>,
        field: &str,
    ) -> Option<String> {
        typed
            .map(|value| value.to_string())
            .or_else(|| self.record.extra.get(field).cloned())
    }
}

struct Shown<'a, T>(&'a Option<T>);

impl<T: fmt::Display> fmt::Display for Shown<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => value.fmt(f),
            None => f.write_str("-"),
        }
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let created_at =
            self.shown_integer(self.created_at(), fields::CREATED_AT);
        let updated_at =
            self.shown_integer(self.updated_at(), fields::UPDATED_AT);
        write!(
            f,
            "id: {}\t score: {}, created_at: {}\t updated_at: {}\t email: {}",
            self.id,
            Shown(&self.score),
            Shown(&created_at),
            Shown(&updated_at),
            Shown(&self.record.email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn decodes_known_and_extra_fields() {
        let record = UserRecord::from_fields(raw(&[
            ("email", "a@x"),
            ("created_at", "100"),
            ("updated_at", "200"),
            ("nickname", "ace"),
        ]));

        assert_eq!(record.email.as_deref(), Some("a@x"));
        assert_eq!(record.created_at, Some(100));
        assert_eq!(record.updated_at, Some(200));
        assert_eq!(
            record.extra.get("nickname").map(String::as_str),
            Some("ace")
        );
    }

    #[test]
    fn missing_fields_are_absent() {
        let record = UserRecord::from_fields(HashMap::new());

        assert_eq!(record.email, None);
        assert_eq!(record.created_at, None);
        assert_eq!(record.updated_at, None);
        assert!(record.is_empty());
    }

    #[test]
    fn malformed_integers_keep_their_raw_value() {
        let record = UserRecord::from_fields(raw(&[
            ("created_at", "100.5"),
            ("updated_at", "200"),
        ]));

        assert_eq!(record.created_at, None);
        assert_eq!(record.updated_at, Some(200));
        assert_eq!(
            record.extra.get("created_at").map(String::as_str),
            Some("100.5")
        );
        assert!(
            record
                .to_fields()
                .contains(&("created_at".to_string(), "100.5".to_string()))
        );
    }

    #[test]
    fn typed_value_overrides_kept_raw_value() {
        let mut record =
            UserRecord::from_fields(raw(&[("created_at", "yesterday")]));
        record.created_at = Some(300);

        assert_eq!(
            record.to_fields(),
            vec![("created_at".to_string(), "300".to_string())]
        );
    }

    #[test]
    fn absent_attributes_are_not_written() {
        let record = UserRecord {
            email: Some("b@x".into()),
            ..UserRecord::default()
        };

        assert_eq!(
            record.to_fields(),
            vec![("email".to_string(), "b@x".to_string())]
        );
    }

    #[test]
    fn display_marks_missing_values() {
        let user = User::empty("u1");
        assert_eq!(
            user.to_string(),
            "id: u1\t score: -, created_at: -\t updated_at: -\t email: -"
        );
    }

    #[test]
    fn display_falls_back_to_raw_timestamps() {
        let user = User {
            id: "u1".into(),
            record: UserRecord::from_fields(raw(&[("created_at", "100.5")])),
            score: None,
        };
        assert!(user.to_string().contains("created_at: 100.5\t"));
    }
}
