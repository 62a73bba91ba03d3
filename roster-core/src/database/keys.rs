use crate::query::sorting::{FieldLocation, SortKey};
use serde::{Deserialize, Serialize};

/// Key naming for records and indices.
///
/// Layout is fixed for interoperability with existing data:
/// `<ns>:<entity>:<id>` for main records, `<ns>:<entity>:<id>:sorting` for
/// derived records and `<ns>:<parent>:<parent-id>:index:<collection>` for
/// membership sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyScheme {
    pub namespace: String,
    pub entity_kind: String,
    pub parent_kind: String,
    pub collection: String,
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self {
            namespace: "identity".to_string(),
            entity_kind: "user".to_string(),
            parent_kind: "oauthapp".to_string(),
            collection: "users:created_at".to_string(),
        }
    }
}

impl KeyScheme {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn user(&self, id: &str) -> String {
        format!("{}:{}:{}", self.namespace, self.entity_kind, id)
    }

    pub fn user_sorting(&self, id: &str) -> String {
        format!("{}:sorting", self.user(id))
    }

    pub fn membership(&self, parent_id: &str) -> String {
        format!(
            "{}:{}:{}:index:{}",
            self.namespace, self.parent_kind, parent_id, self.collection
        )
    }

    /// Dereference pattern for a sort key, `None` for membership order.
    pub fn sort_pattern(&self, key: SortKey) -> Option<String> {
        match key.location() {
            FieldLocation::MembershipScore => None,
            FieldLocation::Main(field) => {
                Some(format!("{}->{}", self.user("*"), field))
            }
            FieldLocation::Sorting(field) => {
                Some(format!("{}->{}", self.user_sorting("*"), field))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout() {
        let keys = KeyScheme::default();
        assert_eq!(keys.user("u1"), "identity:user:u1");
        assert_eq!(keys.user_sorting("u1"), "identity:user:u1:sorting");
        assert_eq!(
            keys.membership("app"),
            "identity:oauthapp:app:index:users:created_at"
        );
    }

    #[test]
    fn patterns_follow_field_location() {
        let keys = KeyScheme::default().with_namespace("test");
        assert_eq!(keys.sort_pattern(SortKey::None), None);
        assert_eq!(
            keys.sort_pattern(SortKey::CreatedAt).as_deref(),
            Some("test:user:*->created_at")
        );
        assert_eq!(
            keys.sort_pattern(SortKey::Email).as_deref(),
            Some("test:user:*->email")
        );
        assert_eq!(
            keys.sort_pattern(SortKey::Score).as_deref(),
            Some("test:user:*:sorting->risk_score")
        );
    }
}
