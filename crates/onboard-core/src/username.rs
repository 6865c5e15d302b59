//! Username rules.
//!
//! Normalization and client-side validation for username candidates.
//! Validation happens before any gateway call is issued.

use serde::{Deserialize, Serialize};

/// Minimum accepted username length after normalization.
pub const MIN_USERNAME_LEN: usize = 6;
/// Maximum accepted username length after normalization.
pub const MAX_USERNAME_LEN: usize = 32;

/// A validated, normalized username.
///
/// 已校验并归一化的用户名。
///
/// Invariant: lowercase, trimmed, 6..=32 chars drawn from `[a-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Normalize and validate a raw candidate string.
    ///
    /// Input is trimmed and lowercased before the length and charset
    /// checks run, so `"  HelloWorld "` parses to `helloworld`.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let normalized = raw.trim().to_lowercase();

        if normalized.is_empty() {
            return Err(UsernameError::Empty);
        }

        let len = normalized.chars().count();
        if len < MIN_USERNAME_LEN {
            return Err(UsernameError::TooShort { len });
        }
        if len > MAX_USERNAME_LEN {
            return Err(UsernameError::TooLong { len });
        }

        if let Some(ch) = normalized
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(UsernameError::InvalidChar { ch });
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client-side validation failures, rendered inline next to the field.
///
/// 客户端校验错误，行内展示。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
pub enum UsernameError {
    #[error("Username is required")]
    Empty,
    #[error("Username must be at least {} characters", MIN_USERNAME_LEN)]
    TooShort { len: usize },
    #[error("Username must be at most {} characters", MAX_USERNAME_LEN)]
    TooLong { len: usize },
    #[error("Username may only contain lowercase letters, digits and underscores")]
    InvalidChar { ch: char },
}

/// Availability of a username candidate.
///
/// 用户名可用性（三态）。
///
/// Resets to [`Availability::Unknown`] whenever the input text changes;
/// only a gateway response moves it to one of the other two states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Unknown,
    Available,
    Taken,
}
