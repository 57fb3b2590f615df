use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jobboard_common::{MeResponse, Role};
use metrics::counter;
use tracing::{info, warn};

use super::{AuthService, Identity, LoginOutcome, PasswordHasher, TokenCodec};
use crate::config::SuperuserSettings;
use crate::error::AppError;
use crate::metrics as keys;
use crate::models::User;
use crate::storage::CredentialStore;
use crate::SharedClock;

/// Auth policy over a credential store, a password hasher and a token codec
pub struct DefaultAuth {
    users: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: TokenCodec,
    token_ttl: Duration,
    superuser: SuperuserSettings,
    clock: SharedClock,
}

impl DefaultAuth {
    pub fn new(
        users: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: TokenCodec,
        token_ttl: Duration,
        superuser: SuperuserSettings,
        clock: SharedClock,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            token_ttl,
            superuser,
            clock,
        }
    }

    fn is_superuser(&self, email: &str, password: &str) -> bool {
        email == self.superuser.email && password == self.superuser.password
    }
}

/// Parse `Bearer <token>`: one space, then a token without whitespace
fn bearer_token(header: &str) -> Result<&str, AppError> {
    match header.split_once(' ') {
        Some(("Bearer", token)) if !token.is_empty() && !token.contains(char::is_whitespace) => {
            Ok(token)
        },
        _ => Err(AppError::BadFormat),
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, name: &str, email: &str, password: &str) -> Result<User, AppError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AppError::AllFieldsRequired);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: self.hasher.hash(password)?,
            is_admin: false,
            created_at: self.clock.utc(),
        };
        // the store re-checks the email atomically
        self.users.insert_user(user.clone()).await?;

        counter!(keys::USER_REGISTERED).increment(1);
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AppError> {
        if email.is_empty() || password.is_empty() {
            return Err(AppError::MissingCredentials);
        }

        if self.is_superuser(email, password) {
            let token = self.tokens.issue(&Identity::Admin, self.token_ttl)?;
            counter!(keys::LOGIN_SUCCESS).increment(1);
            info!(role = "admin", "superuser logged in");
            return Ok(LoginOutcome {
                token,
                role: Role::Admin,
                user: None,
            });
        }

        let Some(user) = self.users.find_by_email(email).await? else {
            counter!(keys::LOGIN_FAILURE).increment(1);
            return Err(AppError::UserNotFound);
        };
        if !self.hasher.verify(password, &user.password_hash) {
            counter!(keys::LOGIN_FAILURE).increment(1);
            warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(AppError::InvalidPassword);
        }

        let identity = Identity::User { id: user.id.clone() };
        let token = self.tokens.issue(&identity, self.token_ttl)?;
        counter!(keys::LOGIN_SUCCESS).increment(1);
        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome {
            token,
            role: Role::User,
            user: Some(user.profile()),
        })
    }

    async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), AppError> {
        if email.is_empty() {
            return Err(AppError::MissingFields("email"));
        }
        if new_password.is_empty() {
            return Err(AppError::MissingFields("newPassword"));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let hash = self.hasher.hash(new_password)?;
        self.users.update_password_hash(&user.id, &hash).await?;

        counter!(keys::PASSWORD_RESET).increment(1);
        info!(user_id = %user.id, "password reset without ownership proof");
        Ok(())
    }

    async fn change_password(
        &self,
        identity: &Identity,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let Identity::User { id } = identity else {
            return Err(AppError::Unauthorized);
        };
        if old_password.is_empty() {
            return Err(AppError::MissingFields("oldPassword"));
        }
        if new_password.is_empty() {
            return Err(AppError::MissingFields("newPassword"));
        }

        let user = self.users.find_user(id).await?.ok_or(AppError::UserNotFound)?;
        if !self.hasher.verify(old_password, &user.password_hash) {
            return Err(AppError::OldPasswordMismatch);
        }
        let hash = self.hasher.hash(new_password)?;
        self.users.update_password_hash(id, &hash).await?;

        info!(user_id = %id, "password changed");
        Ok(())
    }

    fn authenticate(&self, bearer_header: Option<&str>) -> Result<Identity, AppError> {
        let header = match bearer_header {
            Some(h) if !h.is_empty() => h,
            _ => return Err(AppError::NoToken),
        };
        let token = bearer_token(header)?;
        self.tokens.verify(token)
    }

    async fn resolve_self(&self, identity: &Identity) -> Result<MeResponse, AppError> {
        match identity {
            Identity::Admin => Ok(MeResponse {
                role: Role::Admin,
                user: None,
            }),
            Identity::User { id } => {
                let user = self.users.find_user(id).await?.ok_or(AppError::UserNotFound)?;
                Ok(MeResponse {
                    role: Role::User,
                    user: Some(user.profile()),
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::bearer_token;
    use crate::error::AppError;

    #[test]
    fn test_bearer_header_shapes() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");

        for bad in [
            "abc.def.ghi",
            "bearer abc",
            "Bearer",
            "Bearer ",
            "Bearer  abc",
            "Bearer abc def",
            "Basic dXNlcjpwYXNz",
            "Token abc",
        ] {
            assert!(
                matches!(bearer_token(bad), Err(AppError::BadFormat)),
                "accepted {bad:?}"
            );
        }
    }
}
