// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const USER_REGISTERED: &str = "user.registered";
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const PASSWORD_RESET: &str = "password.reset";
pub const JOB_POSTED: &str = "job.posted";
pub const JOB_DELETED: &str = "job.deleted";
