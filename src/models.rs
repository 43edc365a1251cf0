use serde::{Deserialize, Serialize};
use std::fmt;

/// Next action of a like control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Like,
    Unlike,
}

impl LikeAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "like" => Some(Self::Like),
            "unlike" => Some(Self::Unlike),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Unlike => "unlike",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Like => Self::Unlike,
            Self::Unlike => Self::Like,
        }
    }
}

impl fmt::Display for LikeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Next action of a subscription control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    Add,
    Delete,
}

impl SubscriptionAction {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "add" => Some(Self::Add),
            "delete" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Add => Self::Delete,
            Self::Delete => Self::Add,
        }
    }
}

impl fmt::Display for SubscriptionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeRequest {
    pub article_id: String,
    pub action: LikeAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub username: String,
    pub action: SubscriptionAction,
}

/// Body both endpoints answer with. The server sends `{"status": ""}` on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: Some("ok".to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}
