use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use crate::{
    config::ApiConfig,
    error::{ApiError, ErrorResponse, Result},
    rate_limit,
    secret::Secret,
};

static API_BASE_URL: &str = "https://api.twitter.com";

pub struct Client {
    http: reqwest::Client,
    base_url: Url,
    bearer: Secret,
}

impl Client {
    pub fn new(bearer: Secret) -> Self {
        Self::with_base_url(bearer, API_BASE_URL.parse().expect("api base url"))
    }

    /// Client pointed at a different host, e.g. a local mock server.
    pub fn with_base_url(bearer: Secret, base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            bearer,
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ApiConfig::load_from_env()?.bearer_token))
    }

    pub async fn send<T>(&self, req: &T) -> Result<T::Response>
    where
        T: Request,
    {
        let url = self.base_url.join(T::PATH).map_err(ApiError::BuildUrl)?;

        let res = self
            .http
            .request(T::Encoding::METHOD, url)
            .encode(req)
            .bearer(&self.bearer)
            .send()
            .await
            .map_err(ApiError::SendRequest)?;

        let status = res.status();

        if status.is_success() {
            res.json::<T::Response>()
                .await
                .map_err(ApiError::ParseResponse)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            // The reset header is the only part of a throttled response the
            // caller can act on. Without it the response is just an error.
            match rate_limit::reset_from_headers(res.headers()) {
                Some(reset) => Err(ApiError::RateLimited { reset }),
                None => Err(ApiError::UnexpectedApiStatus(status)),
            }
        } else if status.is_client_error() || status.is_server_error() {
            let res = res
                .json::<ErrorResponse>()
                .await
                .map_err(|err| ApiError::ParseErrorResponse(status, err))?;
            Err(ApiError::ErrorResponse(status, res))
        } else {
            Err(ApiError::UnexpectedApiStatus(status))
        }
    }
}

trait RequestBuilderExt {
    fn encode<T>(self, req: &T) -> Self
    where
        T: Request;

    fn bearer(self, token: &Secret) -> Self;
}

impl RequestBuilderExt for RequestBuilder {
    fn encode<T>(self, req: &T) -> Self
    where
        T: Request,
    {
        T::Encoding::encode(self, req)
    }

    fn bearer(self, token: &Secret) -> Self {
        self.header(header::AUTHORIZATION, token.bearer())
    }
}

pub trait Request: Serialize {
    type Encoding: Encoding;
    type Response: DeserializeOwned;

    const PATH: &'static str;
}

pub trait Encoding {
    const METHOD: Method;

    fn encode(builder: RequestBuilder, req: &impl Serialize) -> RequestBuilder;
}

pub enum UrlParamEncoding {}

impl Encoding for UrlParamEncoding {
    const METHOD: Method = Method::GET;

    fn encode(builder: RequestBuilder, req: &impl Serialize) -> RequestBuilder {
        builder.query(req)
    }
}
