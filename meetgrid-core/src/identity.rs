//! Current-user lookup.
//!
//! Authentication itself is handled elsewhere; the engine only needs the
//! acting username to key availability markers.

/// Yields the acting username, or `None` when nobody is signed in.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<String>;
}

/// Fixed identity, e.g. from the config file or a `--user` flag.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(username: impl Into<String>) -> Self {
        StaticIdentity(Some(username.into()))
    }

    pub fn anonymous() -> Self {
        StaticIdentity(None)
    }
}

impl From<Option<String>> for StaticIdentity {
    fn from(username: Option<String>) -> Self {
        StaticIdentity(username.filter(|u| !u.trim().is_empty()))
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.0.clone()
    }
}
