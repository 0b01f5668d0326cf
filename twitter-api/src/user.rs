use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{Request, UrlParamEncoding};

/// Maximum number of ids the lookup endpoint accepts in a single request.
pub const LOOKUP_BATCH_SIZE: usize = 100;

#[derive(Debug, Serialize)]
pub struct UserLookupRequest {
    /// A comma separated list of user IDs. Up to 100 are allowed in a single request.
    ids: String,
}

impl UserLookupRequest {
    pub fn ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ids: ids.into_iter().collect::<Vec<_>>().join(","),
        }
    }
}

impl Request for UserLookupRequest {
    type Encoding = UrlParamEncoding;
    type Response = UserLookupResponse;

    const PATH: &'static str = "/2/users";
}

#[derive(Debug, Deserialize)]
pub struct UserLookupResponse {
    /// The expanded user records, in request order. Ids that could not be resolved are absent.
    pub data: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier of this user.
    pub id: String,

    /// The name of the user, as they've defined it on their profile. Not necessarily a person's name, and subject to change.
    pub name: String,

    /// The handle (screen name) of this user.
    pub username: String,

    /// The UTC datetime that the user account was created on the platform. Only present when the field was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
