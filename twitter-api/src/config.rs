use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{
    Deserialize,
    de::{DeserializeOwned, Error as _},
};

use crate::{
    error::{ApiError, Result},
    secret::Secret,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    pub bearer_token: Secret,
}

impl ApiConfig {
    pub fn load(path: &Path) -> Result<Self> {
        load_toml(path)
    }

    pub fn load_from_env() -> Result<Self> {
        Self::load(&from_env("TWITTER_API_CONFIG", "twitter-api.toml"))
    }
}

fn from_env(key: &str, default_value: &str) -> PathBuf {
    env::var_os(key)
        .unwrap_or_else(|| default_value.into())
        .into()
}

fn load_toml<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let config = fs::read_to_string(path)
        .map_err(toml::de::Error::custom)
        .map_err(ApiError::LoadConfig)?;
    toml::from_str(&config).map_err(ApiError::LoadConfig)
}
