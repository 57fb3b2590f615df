// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between job board clients and the server.
//! This module defines the JSON request and response bodies of the HTTP API.

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

/// Marker stored in `postedBy` when the superuser posted a job
pub const ADMIN_MARKER: &str = "admin";

/// Role carried by a token and reported back to clients
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// Public view of a user record. Never carries the password hash.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /register`
///
/// Missing fields deserialize as empty strings so the server can answer
/// with its own field-level error.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body of `POST /login`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /reset-password`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

/// Body of `POST /change-password`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Reply to a successful login
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub role: Role,
    /// Absent for the superuser
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<UserProfile>,
}

/// Reply to `GET /me`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MeResponse {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user: Option<UserProfile>,
}

/// Reply to a successful registration
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

/// Plain acknowledgement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Skills as clients send them: either a list or one comma-separated string
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum SkillsInput {
    List(Vec<String>),
    Csv(String),
}

impl Default for SkillsInput {
    fn default() -> Self {
        SkillsInput::List(Vec::new())
    }
}

/// Body of `POST /jobs`
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct JobRequest {
    pub position: String,
    pub company: String,
    pub location: String,
    pub work_type: String,
    pub expected_year: String,
    pub description: String,
    /// A count, a whole-number float or a numeric string
    #[serde(deserialize_with = "loose_count")]
    pub vacancies: Option<u32>,
    pub salary: String,
    /// `null` is the same as no skills
    #[serde(deserialize_with = "skills_or_null")]
    pub skills: SkillsInput,
    pub education: String,
    /// Relative expiry; wins over `expires_at` when finite
    pub expires_in_hours: Option<f64>,
    /// Absolute expiry as a date or date-time string
    pub expires_at: Option<String>,
}

/// Shapes a form-style client may send for a count
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseCount {
    Int(u64),
    Float(f64),
    Text(String),
}

fn loose_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<LooseCount>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let whole = |f: f64| {
        (f.fract() == 0.0 && f >= 0.0 && f <= f64::from(u32::MAX)).then_some(f as u32)
    };
    let count = match raw {
        LooseCount::Int(n) => u32::try_from(n).ok(),
        LooseCount::Float(f) => whole(f),
        LooseCount::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<u32>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole))
        },
    };
    count
        .map(Some)
        .ok_or_else(|| de::Error::custom("vacancies must be a non-negative whole number"))
}

fn skills_or_null<'de, D>(deserializer: D) -> Result<SkillsInput, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SkillsInput>::deserialize(deserializer)?.unwrap_or_default())
}

/// A stored job posting
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub position: String,
    pub company: String,
    pub location: String,
    pub work_type: String,
    pub expected_year: String,
    pub description: String,
    pub vacancies: Option<u32>,
    pub salary: String,
    pub skills: Vec<String>,
    pub education: String,
    pub posted_time: DateTime<Utc>,
    /// `None` means the posting never expires
    pub expires_at: Option<DateTime<Utc>>,
    /// User id of the poster, or [`ADMIN_MARKER`]
    pub posted_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job as returned by `GET /jobs`, with its expiry status at read time
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    #[serde(flatten)]
    pub job: Job,
    pub is_expired: bool,
}

/// Reply to a successful `POST /jobs`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JobCreatedResponse {
    pub message: String,
    pub job: Job,
}
