// ============================
// jobboard-backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the job board HTTP server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod router;
pub mod storage;

use std::sync::Arc;

use mockable::Clock;

use crate::auth::{AuthService, DefaultAuth, PasswordHasher, ScryptHasher, TokenCodec};
use crate::config::Settings;
use crate::jobs::JobLifecycle;
use crate::storage::{CredentialStore, JobStore};

/// Source of "now" shared by the policies
pub type SharedClock = Arc<dyn Clock + Send + Sync>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Job lifecycle policy
    pub jobs: Arc<JobLifecycle>,
    /// Settings the process started with
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state over one storage backend
    pub fn new<S>(storage: Arc<S>, settings: Settings, clock: SharedClock) -> anyhow::Result<Self>
    where
        S: CredentialStore + JobStore + 'static,
    {
        let hasher = Arc::new(ScryptHasher::from_settings(&settings.password)?);
        Ok(Self::with_hasher(storage, settings, hasher, clock))
    }

    /// Like [`AppState::new`] with an explicit password hasher
    pub fn with_hasher<S>(
        storage: Arc<S>,
        settings: Settings,
        hasher: Arc<dyn PasswordHasher>,
        clock: SharedClock,
    ) -> Self
    where
        S: CredentialStore + JobStore + 'static,
    {
        let users: Arc<dyn CredentialStore> = storage.clone();
        let job_store: Arc<dyn JobStore> = storage;

        let tokens = TokenCodec::new(settings.token.secret.as_bytes(), clock.clone());
        let auth = Arc::new(DefaultAuth::new(
            users,
            hasher,
            tokens,
            settings.token.ttl(),
            settings.superuser.clone(),
            clock.clone(),
        ));
        let jobs = Arc::new(JobLifecycle::new(job_store, clock));

        Self {
            auth,
            jobs,
            settings: Arc::new(settings),
        }
    }
}
