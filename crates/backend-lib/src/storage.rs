// ============================
// jobboard-backend-lib/src/storage.rs
// ============================
//! Storage abstraction with in-memory and flat-file implementations.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jobboard_common::Job;
use serde::{de::DeserializeOwned, Serialize};
use tokio::{fs as tokio_fs, sync::Mutex};

use crate::error::AppError;
use crate::models::User;

mod memory;

pub use memory::MemoryStorage;

/// Owner of user records
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive email lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError>;

    /// Store a new user. Fails with `EmailTaken` if the email is already in use.
    async fn insert_user(&self, user: User) -> Result<(), AppError>;

    /// Overwrite a user's password digest. Fails with `UserNotFound` if absent.
    async fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<(), AppError>;
}

/// Owner of job records
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Jobs whose position and company equal the arguments exactly. With
    /// `active_at`, only jobs without an expiry or expiring after that instant.
    async fn find_matching(
        &self,
        position: &str,
        company: &str,
        active_at: Option<DateTime<Utc>>,
    ) -> Result<Vec<Job>, AppError>;

    async fn insert_job(&self, job: Job) -> Result<(), AppError>;

    async fn find_job(&self, id: &str) -> Result<Option<Job>, AppError>;

    /// Returns whether a job was removed
    async fn delete_job(&self, id: &str) -> Result<bool, AppError>;

    /// Every job, newest first
    async fn list_jobs(&self) -> Result<Vec<Job>, AppError>;
}

/// A job counts as active at `at` if it never expires or expires strictly later
pub(crate) fn active_at(job: &Job, at: DateTime<Utc>) -> bool {
    job.expires_at.map_or(true, |exp| exp > at)
}

/// Newest first. Jobs created in the same instant fall back to id order so
/// the result does not depend on directory iteration order.
pub(crate) fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.posted_time.cmp(&a.posted_time))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Flat-file storage: one JSON document per record
///
/// ```text
/// <root>/users/<id>.json
/// <root>/jobs/<id>.json
/// ```
#[derive(Clone)]
pub struct FlatFileStorage {
    root: PathBuf,
    user_writes: std::sync::Arc<Mutex<()>>,
}

impl FlatFileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> anyhow::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(root.join("users"))?;
        std::fs::create_dir_all(root.join("jobs"))?;
        Ok(Self {
            root,
            user_writes: std::sync::Arc::new(Mutex::new(())),
        })
    }

    fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    fn jobs_dir(&self) -> PathBuf {
        self.root.join("jobs")
    }

    fn user_path(&self, id: &str) -> Option<PathBuf> {
        record_file(id).map(|file| self.users_dir().join(file))
    }

    fn job_path(&self, id: &str) -> Option<PathBuf> {
        record_file(id).map(|file| self.jobs_dir().join(file))
    }

    async fn users(&self) -> Result<Vec<User>, AppError> {
        read_all(&self.users_dir()).await
    }

    async fn jobs(&self) -> Result<Vec<Job>, AppError> {
        read_all(&self.jobs_dir()).await
    }
}

/// File name for a record id. Ids that could escape the directory name no
/// record, so lookups on them simply miss.
fn record_file(id: &str) -> Option<String> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return None;
    }
    Some(format!("{id}.json"))
}

async fn read_one<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    match tokio_fs::read_to_string(path).await {
        Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>, AppError> {
    let mut records = Vec::new();
    let mut entries = tokio_fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(record) = read_one(&path).await? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Write through a temp file so readers never see a half-written document
async fn write_atomic<T: Serialize>(path: &Path, record: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(record)?;
    let tmp = path.with_extension("json.tmp");
    tokio_fs::write(&tmp, json).await?;
    tokio_fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl CredentialStore for FlatFileStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().await?.into_iter().find(|u| u.email == email))
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        match self.user_path(id) {
            Some(path) => read_one(&path).await,
            None => Ok(None),
        }
    }

    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        // held across check and write so two registrations can't share an email
        let _guard = self.user_writes.lock().await;
        if self.users().await?.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }
        let path = self
            .user_path(&user.id)
            .ok_or_else(|| AppError::InvalidInput(format!("invalid user id `{}`", user.id)))?;
        write_atomic(&path, &user).await
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        let _guard = self.user_writes.lock().await;
        let path = self.user_path(id).ok_or(AppError::UserNotFound)?;
        let mut user: User = read_one(&path).await?.ok_or(AppError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        write_atomic(&path, &user).await
    }
}

#[async_trait]
impl JobStore for FlatFileStorage {
    async fn find_matching(
        &self,
        position: &str,
        company: &str,
        active: Option<DateTime<Utc>>,
    ) -> Result<Vec<Job>, AppError> {
        let mut jobs: Vec<Job> = self
            .jobs()
            .await?
            .into_iter()
            .filter(|j| j.position == position && j.company == company)
            .filter(|j| active.map_or(true, |at| active_at(j, at)))
            .collect();
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }

    async fn insert_job(&self, job: Job) -> Result<(), AppError> {
        let path = self
            .job_path(&job.id)
            .ok_or_else(|| AppError::InvalidInput(format!("invalid job id `{}`", job.id)))?;
        write_atomic(&path, &job).await
    }

    async fn find_job(&self, id: &str) -> Result<Option<Job>, AppError> {
        match self.job_path(id) {
            Some(path) => read_one(&path).await,
            None => Ok(None),
        }
    }

    async fn delete_job(&self, id: &str) -> Result<bool, AppError> {
        let Some(path) = self.job_path(id) else {
            return Ok(false);
        };
        match tokio_fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let mut jobs = self.jobs().await?;
        sort_newest_first(&mut jobs);
        Ok(jobs)
    }
}
