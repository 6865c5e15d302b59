//! Session user domain models.
//!
//! The session user is consumed by presentational code and mutated only by
//! shallow merge; sign-out clears it wholesale.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Account record returned by the auth/profile gateways.
///
/// 网关返回的账户记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub id: String,
    pub username: Option<String>,
}

/// Per-session user metadata. All fields optional; populated piecewise as
/// the onboarding flow progresses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: Option<String>,
    pub username: Option<String>,
    pub avatar_src: Option<String>,
    /// In-memory avatar bytes; not serialized, restored from the cache.
    #[serde(skip)]
    pub avatar_blob: Option<Bytes>,
}

impl SessionUser {
    /// Shallow-merge a patch into this user: `Some` fields overwrite,
    /// `None` fields leave the current value untouched. Never a replace.
    pub fn apply(&mut self, patch: SessionPatch) {
        if let Some(id) = patch.id {
            self.id = Some(id);
        }
        if let Some(username) = patch.username {
            self.username = Some(username);
        }
        if let Some(avatar_src) = patch.avatar_src {
            self.avatar_src = Some(avatar_src);
        }
        if let Some(avatar_blob) = patch.avatar_blob {
            self.avatar_blob = Some(avatar_blob);
        }
    }
}

impl From<AccountRecord> for SessionUser {
    fn from(account: AccountRecord) -> Self {
        Self {
            id: Some(account.id),
            username: account.username,
            avatar_src: None,
            avatar_blob: None,
        }
    }
}

/// Partial update for [`SessionUser`].
///
/// 会话用户的浅合并补丁。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPatch {
    pub id: Option<String>,
    pub username: Option<String>,
    pub avatar_src: Option<String>,
    pub avatar_blob: Option<Bytes>,
}

impl SessionPatch {
    pub fn username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn avatar(src: impl Into<String>, blob: Bytes) -> Self {
        Self {
            avatar_src: Some(src.into()),
            avatar_blob: Some(blob),
            ..Default::default()
        }
    }
}
