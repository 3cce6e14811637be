//! Explicit identity handed to the API client.
//!
//! The backend identifies the caller through a `userId` header. Instead of
//! reading a global on every request, the CLI loads the persisted identity
//! once and passes a [`Session`] into [`crate::api::ApiClient::new`].

use zeroize::Zeroize;

/// Header the backend reads the caller identity from.
pub const IDENTITY_HEADER: &str = "userId";

#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    user_id: Option<String>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Blank identities are treated as anonymous.
    pub fn for_user(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into().trim().to_string();
        if user_id.is_empty() {
            Self::anonymous()
        } else {
            Self {
                user_id: Some(user_id),
            }
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(id) = self.user_id.as_mut() {
            id.zeroize();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_identity_is_anonymous() {
        assert!(!Session::for_user("   ").is_authenticated());
        assert!(Session::anonymous().user_id().is_none());
    }

    #[test]
    fn identity_is_trimmed() {
        let session = Session::for_user(" 42 ");
        assert_eq!(session.user_id(), Some("42"));
    }

    #[test]
    fn debug_output_hides_identity() {
        let rendered = format!("{:?}", Session::for_user("secret-user"));
        assert!(!rendered.contains("secret-user"));
        assert!(rendered.contains("authenticated: true"));
    }
}
