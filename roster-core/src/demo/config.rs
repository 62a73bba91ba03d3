use serde::{Deserialize, Serialize};

/// How many synthetic users to create and how they look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSeedOptions {
    pub users: usize,
    /// Emails are generated as `user<i>@<email_domain>`.
    pub email_domain: String,
    /// Also assign an initial risk score while seeding.
    pub with_scores: bool,
}

impl Default for DemoSeedOptions {
    fn default() -> Self {
        Self {
            users: 10,
            email_domain: "example.com".to_string(),
            with_scores: false,
        }
    }
}
