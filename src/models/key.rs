use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier as sent by the browser: a JSON number or a string.
///
/// Feed ids are numeric, but review links hand them back as strings taken from
/// the query string. Keys compare by their string form and serialize back in
/// the representation they arrived in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordKey {
    Number(i64),
    Text(String),
}

impl RecordKey {
    pub fn as_string(&self) -> String {
        match self {
            RecordKey::Number(n) => n.to_string(),
            RecordKey::Text(s) => s.clone(),
        }
    }

    pub fn matches(&self, raw: &str) -> bool {
        match self {
            RecordKey::Number(n) => n.to_string() == raw,
            RecordKey::Text(s) => s == raw,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, RecordKey::Text(s) if s.trim().is_empty())
    }
}

impl PartialEq for RecordKey {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.as_string())
    }
}

impl Eq for RecordKey {}

impl From<i64> for RecordKey {
    fn from(n: i64) -> Self {
        RecordKey::Number(n)
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey::Text(s.to_string())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Number(n) => write!(f, "{}", n),
            RecordKey::Text(s) => write!(f, "{}", s),
        }
    }
}
