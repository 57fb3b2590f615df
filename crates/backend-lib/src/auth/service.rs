use async_trait::async_trait;
use jobboard_common::{MeResponse, Role, UserProfile};

use super::Identity;
use crate::error::AppError;
use crate::models::User;

/// Result of a successful login
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub role: Role,
    /// `None` for the superuser
    pub user: Option<UserProfile>,
}

/// Credentials in, identities out
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AppError>;

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError>;

    /// Overwrite the password of the account registered under `email`.
    /// Requires no proof of ownership.
    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError>;

    async fn change_password(
        &self,
        identity: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError>;

    /// Resolve the value of an `Authorization` header
    fn authenticate(&self, bearer_header: Option<&str>) -> Result<Identity, AppError>;

    async fn resolve_self(&self, identity: &Identity) -> Result<MeResponse, AppError>;
}
