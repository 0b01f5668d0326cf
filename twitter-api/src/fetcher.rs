use reqwest::StatusCode;

use crate::{
    client::Client,
    error::{ApiError, Result},
    friend::FriendIdsRequest,
    pagination::Cursor,
    rate_limit,
    user::{self, User, UserLookupRequest},
};

/// Retrieves the complete list of accounts a user follows.
///
/// Pages through the friend ids endpoint until the cursor runs out,
/// optionally expanding the collected ids into profile records through the
/// batched lookup endpoint. Throttled requests are waited out in place and
/// the interrupted page or batch is requested again, so a rate limit never
/// loses data.
pub struct Fetcher<'a> {
    client: &'a Client,
    expand: bool,
}

impl<'a> Fetcher<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            expand: false,
        }
    }

    /// Fetcher that expands ids into full profile records.
    pub fn expanded(client: &'a Client) -> Self {
        Self {
            client,
            expand: true,
        }
    }

    pub async fn fetch(&self, user_id: &str) -> Result<FriendList> {
        let mut cursor = Cursor::FIRST;
        let mut ids = Vec::new();

        while !cursor.is_end() {
            match self.client.send(&FriendIdsRequest::page(user_id, cursor)).await {
                Ok(page) => {
                    cursor = page.next_cursor;
                    ids.extend(page.ids);
                }
                Err(err) => self.wait_or_fail(user_id, err).await?,
            }
        }

        if self.expand {
            Ok(FriendList::Profiles(self.expand_ids(user_id, &ids).await?))
        } else {
            Ok(FriendList::Ids(ids))
        }
    }

    async fn expand_ids(&self, user_id: &str, ids: &[String]) -> Result<Vec<User>> {
        let mut users = Vec::with_capacity(ids.len());

        for batch in ids.chunks(user::LOOKUP_BATCH_SIZE) {
            let req = UserLookupRequest::ids(batch.iter().map(String::as_str));
            loop {
                match self.client.send(&req).await {
                    Ok(res) => {
                        users.extend(res.data);
                        break;
                    }
                    Err(err) => self.wait_or_fail(user_id, err).await?,
                }
            }
        }

        Ok(users)
    }

    /// Waits out a rate limit, maps everything else onto the failure for
    /// `user_id`. Returning `Ok` means the caller should retry its request.
    async fn wait_or_fail(&self, user_id: &str, err: ApiError) -> Result<()> {
        match err {
            ApiError::RateLimited { reset } => {
                eprintln!(
                    "rate limited, waiting {:?} for the window to reset",
                    rate_limit::duration_until(reset)
                );
                rate_limit::wait_until(reset).await;
                Ok(())
            }
            err => Err(match err.status() {
                Some(StatusCode::UNAUTHORIZED) => ApiError::PrivateUser {
                    user_id: user_id.to_string(),
                },
                Some(StatusCode::CONFLICT) => ApiError::UserNotFound {
                    user_id: user_id.to_string(),
                },
                Some(status) => ApiError::FetchFailed {
                    user_id: user_id.to_string(),
                    status,
                },
                None => err,
            }),
        }
    }
}

/// Result of a fetch: raw ids, or profile records when expansion is on.
#[derive(Debug)]
pub enum FriendList {
    Ids(Vec<String>),
    Profiles(Vec<User>),
}

impl FriendList {
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Profiles(users) => users.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::secret::Secret;

    const FRIEND_IDS_PATH: &str = "/1.1/friends/ids.json";
    const USER_LOOKUP_PATH: &str = "/2/users";

    fn test_client(server: &MockServer) -> Client {
        Client::with_base_url(Secret::new("test-token"), server.uri().parse().unwrap())
    }

    fn ids_page(ids: &[&str], next_cursor: i64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "ids": ids,
            "next_cursor": next_cursor,
        }))
    }

    #[tokio::test]
    async fn single_page_returns_its_ids() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("user_id", "2244994945"))
            .and(query_param("cursor", "-1"))
            .and(query_param("stringify_ids", "true"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ids_page(&["100", "200", "300"], 0))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let friends = Fetcher::new(&client).fetch("2244994945").await.unwrap();

        match friends {
            FriendList::Ids(ids) => assert_eq!(ids, ["100", "200", "300"]),
            other => panic!("expected ids, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn pages_are_concatenated_in_request_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("cursor", "-1"))
            .respond_with(ids_page(&["1", "2"], 1374004777531007833))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("cursor", "1374004777531007833"))
            .respond_with(ids_page(&["3"], 0))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let friends = Fetcher::new(&client).fetch("12").await.unwrap();

        match friends {
            FriendList::Ids(ids) => assert_eq!(ids, ["1", "2", "3"]),
            other => panic!("expected ids, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn private_user_is_reported_with_its_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "errors": [{"code": 32, "message": "Could not authenticate you."}],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = Fetcher::new(&client).fetch("6253282").await.unwrap_err();

        match err {
            ApiError::PrivateUser { user_id } => assert_eq!(user_id, "6253282"),
            other => panic!("expected private user, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_user_is_reported_with_its_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "errors": [{"code": 50, "message": "User not found."}],
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = Fetcher::new(&client).fetch("404404").await.unwrap_err();

        match err {
            ApiError::UserNotFound { user_id } => assert_eq!(user_id, "404404"),
            other => panic!("expected user not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn other_statuses_fail_with_status_and_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = Fetcher::new(&client).fetch("12").await.unwrap_err();

        match err {
            ApiError::FetchFailed { user_id, status } => {
                assert_eq!(user_id, "12");
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_page_is_retried_without_data_loss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("cursor", "-1"))
            .respond_with(ids_page(&["1", "2"], 50))
            .expect(1)
            .mount(&server)
            .await;
        // First request for the second page is throttled; the reset is
        // already in the past so the wait is immediate.
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("cursor", "50"))
            .respond_with(ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .and(query_param("cursor", "50"))
            .respond_with(ids_page(&["3", "4"], 0))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let friends = Fetcher::new(&client).fetch("12").await.unwrap();

        match friends {
            FriendList::Ids(ids) => assert_eq!(ids, ["1", "2", "3", "4"]),
            other => panic!("expected ids, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_without_reset_header_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let err = Fetcher::new(&client).fetch("12").await.unwrap_err();

        match err {
            ApiError::FetchFailed { status, .. } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
            }
            other => panic!("expected fetch failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn expansion_batches_ids_by_hundred() {
        let ids: Vec<String> = (0..150).map(|i| i.to_string()).collect();

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ids": ids,
                "next_cursor": 0,
            })))
            .expect(1)
            .mount(&server)
            .await;

        for batch in ids.chunks(100) {
            let users: Vec<_> = batch
                .iter()
                .map(|id| {
                    json!({
                        "id": id,
                        "name": format!("user {id}"),
                        "username": format!("u{id}"),
                    })
                })
                .collect();
            Mock::given(method("GET"))
                .and(path(USER_LOOKUP_PATH))
                .and(query_param("ids", batch.join(",")))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": users })))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = test_client(&server);
        let friends = Fetcher::expanded(&client).fetch("12").await.unwrap();

        match friends {
            FriendList::Profiles(users) => {
                assert_eq!(users.len(), 150);
                assert_eq!(users[0].id, "0");
                assert_eq!(users[0].username, "u0");
                assert_eq!(users[149].id, "149");
            }
            other => panic!("expected profiles, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_batch_is_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(FRIEND_IDS_PATH))
            .respond_with(ids_page(&["7", "8"], 0))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(USER_LOOKUP_PATH))
            .respond_with(ResponseTemplate::new(429).insert_header("x-rate-limit-reset", "1"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(USER_LOOKUP_PATH))
            .and(query_param("ids", "7,8"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    {"id": "7", "name": "seven", "username": "u7"},
                    {"id": "8", "name": "eight", "username": "u8"},
                ],
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let friends = Fetcher::expanded(&client).fetch("12").await.unwrap();

        match friends {
            FriendList::Profiles(users) => {
                assert_eq!(users.len(), 2);
                assert_eq!(users[1].name, "eight");
            }
            other => panic!("expected profiles, got {other:?}"),
        }
    }
}
