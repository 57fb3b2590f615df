//! Request identity derived from a verified token.
use jobboard_common::{Role, ADMIN_MARKER};

/// Who is making a request. Re-derived from the bearer token every time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The configured superuser; has no backing user record
    Admin,
    /// A registered user
    User { id: String },
}

impl Identity {
    pub fn role(&self) -> Role {
        match self {
            Identity::Admin => Role::Admin,
            Identity::User { .. } => Role::User,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Identity::Admin => None,
            Identity::User { id } => Some(id),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin)
    }

    /// Value recorded as a job's `postedBy`
    pub fn poster(&self) -> String {
        self.user_id().unwrap_or(ADMIN_MARKER).to_string()
    }
}
