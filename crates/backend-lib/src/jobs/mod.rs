// ============================
// jobboard-backend-lib/src/jobs/mod.rs
// ============================
//! Job lifecycle: who may post and delete, when a posting counts as a
//! duplicate, and when it expires.
//!
//! The duplicate check and the insert in [`JobLifecycle::post_job`] are two
//! separate store calls. Two admins posting the same position and company
//! at the same moment can both pass the check.

pub mod expiry;

use std::sync::Arc;

use jobboard_common::{Job, JobRequest, JobView, SkillsInput};
use metrics::counter;
use tracing::info;

use crate::auth::Identity;
use crate::error::AppError;
use crate::metrics as keys;
use crate::storage::JobStore;
use crate::SharedClock;

pub use expiry::{compute_expiry, is_expired};

/// Job policy over a job store
pub struct JobLifecycle {
    store: Arc<dyn JobStore>,
    clock: SharedClock,
}

impl JobLifecycle {
    pub fn new(store: Arc<dyn JobStore>, clock: SharedClock) -> Self {
        Self { store, clock }
    }

    /// True iff an exact position/company match is still active
    pub async fn is_duplicate_active(&self, position: &str, company: &str) -> Result<bool, AppError> {
        let now = self.clock.utc();
        let active = self.store.find_matching(position, company, Some(now)).await?;
        Ok(!active.is_empty())
    }

    pub async fn post_job(&self, identity: &Identity, req: JobRequest) -> Result<Job, AppError> {
        if !identity.is_admin() {
            return Err(AppError::Forbidden);
        }
        if req.position.trim().is_empty() {
            return Err(AppError::MissingFields("position"));
        }
        if req.company.trim().is_empty() {
            return Err(AppError::MissingFields("company"));
        }

        let now = self.clock.utc();
        let expires_at = compute_expiry(req.expires_in_hours, req.expires_at.as_deref(), now)?;

        if self.is_duplicate_active(&req.position, &req.company).await? {
            return Err(AppError::DuplicateActive);
        }

        let job = Job {
            id: uuid::Uuid::new_v4().to_string(),
            position: req.position,
            company: req.company,
            location: req.location,
            work_type: req.work_type,
            expected_year: req.expected_year,
            description: req.description,
            vacancies: req.vacancies,
            salary: req.salary,
            skills: split_skills(req.skills),
            education: req.education,
            posted_time: now,
            expires_at,
            posted_by: identity.poster(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_job(job.clone()).await?;

        counter!(keys::JOB_POSTED).increment(1);
        info!(job_id = %job.id, position = %job.position, company = %job.company, "job posted");
        Ok(job)
    }

    /// All jobs, newest first, flagged against the current time
    pub async fn list_jobs(&self) -> Result<Vec<JobView>, AppError> {
        let now = self.clock.utc();
        let jobs = self.store.list_jobs().await?;
        Ok(jobs
            .into_iter()
            .map(|job| JobView {
                is_expired: is_expired(job.expires_at, now),
                job,
            })
            .collect())
    }

    pub async fn delete_job(&self, identity: &Identity, job_id: &str) -> Result<(), AppError> {
        if !identity.is_admin() {
            return Err(AppError::Forbidden);
        }
        if self.store.find_job(job_id).await?.is_none() {
            return Err(AppError::JobNotFound);
        }
        // lost a race with another delete
        if !self.store.delete_job(job_id).await? {
            return Err(AppError::JobNotFound);
        }

        counter!(keys::JOB_DELETED).increment(1);
        info!(job_id, "job deleted");
        Ok(())
    }
}

/// Lists pass through untouched; a string is split on commas and trimmed
pub fn split_skills(skills: SkillsInput) -> Vec<String> {
    match skills {
        SkillsInput::List(list) => list,
        SkillsInput::Csv(csv) => csv
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_skills() {
        assert_eq!(
            split_skills(SkillsInput::Csv(" Rust,SQL , ,Docker ".to_string())),
            vec!["Rust", "SQL", "Docker"]
        );
        assert!(split_skills(SkillsInput::Csv(String::new())).is_empty());

        let list = vec![" keep spacing ".to_string(), "b".to_string()];
        assert_eq!(split_skills(SkillsInput::List(list.clone())), list);
    }
}
