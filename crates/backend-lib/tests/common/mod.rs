//! Test utilities shared by the integration tests
//!
//! Builds an `AppState` over `MemoryStorage` with a clock the test can move
//! and scrypt parameters cheap enough to hash dozens of passwords quickly.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use jobboard_backend_lib::{
    auth::Identity,
    config::{PasswordSettings, Settings},
    storage::MemoryStorage,
    AppState,
};
use mockable::Clock;

pub const SUPERUSER_EMAIL: &str = "root@jobs.test";
pub const SUPERUSER_PASSWORD: &str = "root-password";

/// A clock that only moves when told to
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(now) })
    }

    pub fn advance(&self, by: TimeDelta) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.now().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now()
    }
}

pub struct TestEnv {
    pub state: Arc<AppState>,
    pub storage: Arc<MemoryStorage>,
    pub clock: Arc<ManualClock>,
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.token.secret = "integration-test-secret".to_string();
    settings.token.ttl_secs = 3600;
    settings.superuser.email = SUPERUSER_EMAIL.to_string();
    settings.superuser.password = SUPERUSER_PASSWORD.to_string();
    settings.password = PasswordSettings { log_n: 4, r: 8, p: 1 };
    settings.cors.allowed_origins = vec!["https://frontend.jobs.test".to_string()];
    settings
}

/// Fresh state over empty in-memory storage
pub fn setup_test_env() -> TestEnv {
    let storage = Arc::new(MemoryStorage::new());
    let clock = ManualClock::starting_at(Utc.with_ymd_and_hms(2025, 1, 15, 8, 0, 0).unwrap());
    let state = AppState::new(storage.clone(), test_settings(), clock.clone())
        .expect("Failed to create AppState for test");

    TestEnv {
        state: Arc::new(state),
        storage,
        clock,
    }
}

pub fn user(id: &str) -> Identity {
    Identity::User { id: id.to_string() }
}
