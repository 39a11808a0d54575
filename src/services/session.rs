//! Session capability
//!
//! The question view only needs to know who is signed in, if anyone. Where that
//! comes from (a cookie, an auth provider) stays behind this trait.

/// Supplies the signed-in user's identifier
pub trait SessionProvider: Send + Sync {
    /// Current user id, `None` when anonymous
    fn current_user_id(&self) -> Option<String>;
}

/// Session with a fixed identity, resolved up front
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    user_id: Option<String>,
}

impl StaticSession {
    pub fn signed_in(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn from_user_id(user_id: Option<String>) -> Self {
        Self {
            user_id: user_id.filter(|id| !id.trim().is_empty()),
        }
    }
}

impl SessionProvider for StaticSession {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
