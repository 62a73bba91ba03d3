//! Sort descriptors for user listings.
//!
//! Every orderable field is a closed variant mapped at compile time to a
//! comparator kind and a field location. Anything outside the set is rejected
//! while parsing, before a store is touched.

use crate::error::RosterError;
use crate::user::fields;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How dereferenced values are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparatorKind {
    /// Order maintained by the membership set itself.
    Native,
    /// Values compared as numbers. A missing value counts as zero.
    Numeric,
    /// Values compared byte-wise. A missing value sorts as the empty string.
    Lexicographic,
}

/// Where the value for a sort key lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLocation {
    /// Score of the membership set entry.
    MembershipScore,
    /// A field of the main user record.
    Main(&'static str),
    /// A field of the auxiliary `:sorting` record.
    Sorting(&'static str),
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Membership order (join time).
    #[default]
    None,
    CreatedAt,
    UpdatedAt,
    Email,
    Score,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::None,
        SortKey::CreatedAt,
        SortKey::UpdatedAt,
        SortKey::Email,
        SortKey::Score,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            SortKey::None => "none",
            SortKey::CreatedAt => "created_at",
            SortKey::UpdatedAt => "updated_at",
            SortKey::Email => "email",
            SortKey::Score => "score",
        }
    }

    pub const fn comparator(self) -> ComparatorKind {
        match self {
            SortKey::None => ComparatorKind::Native,
            SortKey::CreatedAt | SortKey::UpdatedAt | SortKey::Score => {
                ComparatorKind::Numeric
            }
            SortKey::Email => ComparatorKind::Lexicographic,
        }
    }

    pub const fn location(self) -> FieldLocation {
        match self {
            SortKey::None => FieldLocation::MembershipScore,
            SortKey::CreatedAt => FieldLocation::Main(fields::CREATED_AT),
            SortKey::UpdatedAt => FieldLocation::Main(fields::UPDATED_AT),
            SortKey::Email => FieldLocation::Main(fields::EMAIL),
            SortKey::Score => FieldLocation::Sorting(fields::RISK_SCORE),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = RosterError;

    /// The empty string selects membership order.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(SortKey::None),
            "created_at" => Ok(SortKey::CreatedAt),
            "updated_at" => Ok(SortKey::UpdatedAt),
            "email" => Ok(SortKey::Email),
            "score" => Ok(SortKey::Score),
            other => Err(RosterError::InvalidDescriptor(other.to_string())),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    /// Argument spelling used by the store's SORT command.
    pub const fn as_command_arg(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("asc") {
            Ok(SortDirection::Asc)
        } else if trimmed.eq_ignore_ascii_case("desc") {
            Ok(SortDirection::Desc)
        } else {
            Err(RosterError::InvalidDirection(trimmed.to_string()))
        }
    }
}

/// A store-side `SORT <set> BY <pattern> [ALPHA] ASC|DESC` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortRequest {
    /// Key pattern with a single `*` replaced by each member, optionally
    /// followed by `->field` to read a hash field.
    pub pattern: String,
    pub direction: SortDirection,
    /// Compare byte-wise instead of numerically.
    pub alpha: bool,
}

impl SortRequest {
    pub fn new(
        pattern: impl Into<String>,
        comparator: ComparatorKind,
        direction: SortDirection,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            direction,
            alpha: comparator == ComparatorKind::Lexicographic,
        }
    }
}

/// Caller-facing listing parameters.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct ListQuery {
    pub sort_by: SortKey,
    pub direction: SortDirection,
}

impl ListQuery {
    pub const fn new(sort_by: SortKey, direction: SortDirection) -> Self {
        Self { sort_by, direction }
    }

    /// Parse raw request strings. Fails on anything outside the closed sets.
    pub fn parse(sort_by: &str, direction: &str) -> Result<Self, RosterError> {
        Ok(Self {
            sort_by: sort_by.parse()?,
            direction: direction.parse()?,
        })
    }
}
