//! In-memory storage backed by concurrent maps.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};
use jobboard_common::Job;

use super::{active_at, CredentialStore, JobStore};
use crate::error::AppError;
use crate::models::User;

/// Volatile storage for tests and single-process deployments
#[derive(Clone, Default)]
pub struct MemoryStorage {
    users: Arc<DashMap<String, User>>,
    /// email -> user id
    emails: Arc<DashMap<String, String>>,
    /// id -> (insertion sequence, job)
    jobs: Arc<DashMap<String, (u64, Job)>>,
    next_seq: Arc<AtomicU64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Jobs matching `keep`, newest first. Insertion order breaks ties
    /// between jobs created in the same instant.
    fn collect_jobs(&self, keep: impl Fn(&Job) -> bool) -> Vec<Job> {
        let mut jobs: Vec<(u64, Job)> = self
            .jobs
            .iter()
            .filter(|entry| keep(&entry.value().1))
            .map(|entry| entry.value().clone())
            .collect();
        jobs.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at.cmp(&a.created_at).then(seq_b.cmp(seq_a))
        });
        jobs.into_iter().map(|(_, job)| job).collect()
    }
}

#[async_trait]
impl CredentialStore for MemoryStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(id) = self.emails.get(email).map(|id| id.value().clone()) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn insert_user(&self, user: User) -> Result<(), AppError> {
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(AppError::EmailTaken),
            Entry::Vacant(slot) => {
                // user is visible before the email index entry is released
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id);
                Ok(())
            },
        }
    }

    async fn update_password_hash(&self, id: &str, password_hash: &str) -> Result<(), AppError> {
        let mut user = self.users.get_mut(id).ok_or(AppError::UserNotFound)?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryStorage {
    async fn find_matching(
        &self,
        position: &str,
        company: &str,
        active: Option<DateTime<Utc>>,
    ) -> Result<Vec<Job>, AppError> {
        Ok(self.collect_jobs(|j| {
            j.position == position
                && j.company == company
                && active.map_or(true, |at| active_at(j, at))
        }))
    }

    async fn insert_job(&self, job: Job) -> Result<(), AppError> {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.jobs.insert(job.id.clone(), (seq, job));
        Ok(())
    }

    async fn find_job(&self, id: &str) -> Result<Option<Job>, AppError> {
        Ok(self.jobs.get(id).map(|entry| entry.value().1.clone()))
    }

    async fn delete_job(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.jobs.remove(id).is_some())
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        Ok(self.collect_jobs(|_| true))
    }
}
