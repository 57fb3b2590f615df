// ============================
// jobboard-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod extract;
pub mod identity;
pub mod password;
pub mod token;
mod service;
mod service_impl;

pub use extract::RequestIdentity;
pub use identity::Identity;
pub use password::{PasswordHasher, ScryptHasher};
pub use service::{AuthService, LoginOutcome};
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenCodec};
