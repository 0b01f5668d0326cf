use serde::{Deserialize, Serialize};

use crate::{
    client::{Request, UrlParamEncoding},
    pagination::Cursor,
};

/// Number of ids requested per page, the maximum the endpoint allows.
pub const PAGE_SIZE: usize = 5000;

#[derive(Debug, Serialize)]
pub struct FriendIdsRequest {
    /// The ID of the user for whom to return the list of followed accounts.
    pub user_id: String,

    /// The number of ids to attempt retrieval of per page, up to a maximum of 5,000.
    pub count: usize,

    /// Return ids as strings. Ids above 53 bits lose precision in consumers that parse JSON numbers as doubles.
    pub stringify_ids: bool,

    /// Breaks the list of connections into pages. The first page is requested with `-1`; the response carries the cursor of the next page.
    pub cursor: Cursor,
}

impl FriendIdsRequest {
    pub fn page(user_id: &str, cursor: Cursor) -> Self {
        Self {
            user_id: user_id.to_string(),
            count: PAGE_SIZE,
            stringify_ids: true,
            cursor,
        }
    }
}

impl Request for FriendIdsRequest {
    type Encoding = UrlParamEncoding;
    type Response = FriendIdsResponse;

    const PATH: &'static str = "/1.1/friends/ids.json";
}

#[derive(Debug, Deserialize)]
pub struct FriendIdsResponse {
    /// Ids of the accounts the queried user follows, in the order the platform returns them.
    pub ids: Vec<String>,

    /// Cursor of the next page, `0` when this was the last page.
    pub next_cursor: Cursor,
}
