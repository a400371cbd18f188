use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User record in the credential store.
///
/// `password` holds either a bcrypt hash or a legacy plaintext value that gets
/// upgraded on the next successful login. The field is serialized on purpose:
/// the store file and the `/users` listing both carry it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// One entry per successful login, append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginLogEntry {
    pub user_id: i64,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub login_time: OffsetDateTime,
}

/// Millisecond-precision creation timestamp doubling as the user id.
pub fn next_user_id() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
