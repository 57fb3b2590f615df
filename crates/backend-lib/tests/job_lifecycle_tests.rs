//! Job lifecycle: admin gating, duplicate prevention, read-time expiry.
mod common;

use chrono::TimeDelta;
use common::{setup_test_env, user};
use jobboard_backend_lib::{auth::Identity, error::AppError};
use jobboard_common::{JobRequest, SkillsInput, ADMIN_MARKER};

fn engineer_at_acme() -> JobRequest {
    JobRequest {
        position: "Engineer".to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        work_type: "Full-time".to_string(),
        description: "Build things".to_string(),
        vacancies: Some(2),
        skills: SkillsInput::Csv("Rust, Postgres,  Kubernetes".to_string()),
        ..JobRequest::default()
    }
}

#[tokio::test]
async fn test_admin_posts_job() {
    let env = setup_test_env();
    let now = env.clock.now();

    let job = env
        .state
        .jobs
        .post_job(&Identity::Admin, engineer_at_acme())
        .await
        .unwrap();

    assert_eq!(job.position, "Engineer");
    assert_eq!(job.skills, vec!["Rust", "Postgres", "Kubernetes"]);
    assert_eq!(job.posted_by, ADMIN_MARKER);
    assert_eq!(job.posted_time, now);
    assert_eq!(job.created_at, now);
    assert_eq!(job.expires_at, None);
    assert_eq!(env.storage.job_count(), 1);
}

#[tokio::test]
async fn test_non_admin_forbidden() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;
    let posted = jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();

    assert!(matches!(
        jobs.post_job(&user("u-1"), engineer_at_acme()).await,
        Err(AppError::Forbidden)
    ));
    assert!(matches!(
        jobs.delete_job(&user("u-1"), &posted.id).await,
        Err(AppError::Forbidden)
    ));
    assert_eq!(env.storage.job_count(), 1);
}

#[tokio::test]
async fn test_position_and_company_required() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;

    let mut req = engineer_at_acme();
    req.position = "  ".to_string();
    assert!(matches!(
        jobs.post_job(&Identity::Admin, req).await,
        Err(AppError::MissingFields("position"))
    ));

    let mut req = engineer_at_acme();
    req.company = String::new();
    assert!(matches!(
        jobs.post_job(&Identity::Admin, req).await,
        Err(AppError::MissingFields("company"))
    ));
    assert_eq!(env.storage.job_count(), 0);
}

#[tokio::test]
async fn test_duplicate_active_rejected() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;

    jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();
    assert!(jobs.is_duplicate_active("Engineer", "Acme").await.unwrap());

    let second = jobs.post_job(&Identity::Admin, engineer_at_acme()).await;
    assert!(matches!(second, Err(AppError::DuplicateActive)));
    assert_eq!(env.storage.job_count(), 1);
}

#[tokio::test]
async fn test_duplicate_match_is_exact() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;
    jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();

    let mut lower = engineer_at_acme();
    lower.position = "engineer".to_string();
    jobs.post_job(&Identity::Admin, lower).await.unwrap();

    let mut padded = engineer_at_acme();
    padded.company = "Acme ".to_string();
    jobs.post_job(&Identity::Admin, padded).await.unwrap();

    assert_eq!(env.storage.job_count(), 3);
}

#[tokio::test]
async fn test_expired_job_does_not_block_repost() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;

    let mut first = engineer_at_acme();
    first.expires_at = Some("2020-01-01T00:00:00Z".to_string());
    jobs.post_job(&Identity::Admin, first).await.unwrap();

    assert!(!jobs.is_duplicate_active("Engineer", "Acme").await.unwrap());
    jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();
    assert_eq!(env.storage.job_count(), 2);
}

#[tokio::test]
async fn test_one_hour_posting_expires_and_frees_slot() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;
    let start = env.clock.now();

    let mut req = engineer_at_acme();
    req.expires_in_hours = Some(1.0);
    let job = jobs.post_job(&Identity::Admin, req).await.unwrap();
    assert_eq!(job.expires_at, Some(start + TimeDelta::hours(1)));

    let listed = jobs.list_jobs().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_expired);

    // exactly at the expiry instant the posting is still active
    env.clock.advance(TimeDelta::hours(1));
    assert!(!jobs.list_jobs().await.unwrap()[0].is_expired);
    assert!(matches!(
        jobs.post_job(&Identity::Admin, engineer_at_acme()).await,
        Err(AppError::DuplicateActive)
    ));

    env.clock.advance(TimeDelta::seconds(1));
    let listed = jobs.list_jobs().await.unwrap();
    assert!(listed[0].is_expired);
    assert_eq!(listed[0].job.id, job.id);

    jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();
    assert_eq!(env.storage.job_count(), 2);
}

#[tokio::test]
async fn test_expires_in_hours_beats_expires_at() {
    let env = setup_test_env();
    let mut req = engineer_at_acme();
    req.expires_in_hours = Some(2.0);
    req.expires_at = Some("2020-01-01".to_string());

    let job = env.state.jobs.post_job(&Identity::Admin, req).await.unwrap();
    assert_eq!(job.expires_at, Some(env.clock.now() + TimeDelta::hours(2)));
}

#[tokio::test]
async fn test_bad_expiry_persists_nothing() {
    let env = setup_test_env();
    let mut req = engineer_at_acme();
    req.expires_at = Some("soon".to_string());

    assert!(matches!(
        env.state.jobs.post_job(&Identity::Admin, req).await,
        Err(AppError::InvalidInput(_))
    ));
    assert_eq!(env.storage.job_count(), 0);
}

#[tokio::test]
async fn test_list_newest_first_with_flags() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;

    let mut old = engineer_at_acme();
    old.position = "Old".to_string();
    old.expires_in_hours = Some(0.5);
    jobs.post_job(&Identity::Admin, old).await.unwrap();

    env.clock.advance(TimeDelta::hours(1));
    let mut new = engineer_at_acme();
    new.position = "New".to_string();
    jobs.post_job(&Identity::Admin, new).await.unwrap();

    let listed = jobs.list_jobs().await.unwrap();
    let summary: Vec<(&str, bool)> = listed
        .iter()
        .map(|v| (v.job.position.as_str(), v.is_expired))
        .collect();
    assert_eq!(summary, vec![("New", false), ("Old", true)]);
}

#[tokio::test]
async fn test_delete_job() {
    let env = setup_test_env();
    let jobs = &env.state.jobs;
    let job = jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();

    jobs.delete_job(&Identity::Admin, &job.id).await.unwrap();
    assert_eq!(env.storage.job_count(), 0);

    assert!(matches!(
        jobs.delete_job(&Identity::Admin, &job.id).await,
        Err(AppError::JobNotFound)
    ));

    // the slot is free again
    jobs.post_job(&Identity::Admin, engineer_at_acme()).await.unwrap();
}
