use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories an alarm keyword can map to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum KeywordCategory {
    Error,
    Timeout,
    NotFound,
    ServerError,
    ClientError,
}

impl KeywordCategory {
    pub const ALL: [KeywordCategory; 5] = [
        KeywordCategory::Error,
        KeywordCategory::Timeout,
        KeywordCategory::NotFound,
        KeywordCategory::ServerError,
        KeywordCategory::ClientError,
    ];

    /// Canonical label used in reports and dedup keys.
    pub fn label(&self) -> &'static str {
        match self {
            KeywordCategory::Error => "ERROR",
            KeywordCategory::Timeout => "TIMEOUT",
            KeywordCategory::NotFound => "NOT_FOUND",
            KeywordCategory::ServerError => "SERVER_ERROR",
            KeywordCategory::ClientError => "CLIENT_ERROR",
        }
    }
}

impl fmt::Display for KeywordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A keyword-to-category mapping, fixed at configuration time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub keyword: String,
    pub category: KeywordCategory,
}

impl Rule {
    pub fn new(keyword: impl Into<String>, category: KeywordCategory) -> Self {
        Self {
            keyword: keyword.into(),
            category,
        }
    }
}

/// The keyword set the log monitor ships with.
pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule::new("ERROR", KeywordCategory::Error),
        Rule::new("Timeout", KeywordCategory::Timeout),
        Rule::new("Not Found", KeywordCategory::NotFound),
        Rule::new("500", KeywordCategory::ServerError),
        Rule::new("404", KeywordCategory::NotFound),
    ]
}
