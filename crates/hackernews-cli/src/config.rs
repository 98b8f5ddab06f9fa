use std::collections::HashMap;

use reqwest::Url;
use thiserror::Error;

const KEYWORD_ENV: &str = "HACKERNEWS_KEYWORD";
const ICON_ENV: &str = "HACKERNEWS_ICON";
const FEED_ENDPOINT_ENV: &str = "HACKERNEWS_FEED_ENDPOINT";

pub const DEFAULT_KEYWORD: &str = "hn";
pub const DEFAULT_ICON_PATH: &str = "assets/hacker-news.png";
pub const DEFAULT_FEED_ENDPOINT: &str = "https://hnrss.org";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub keyword: String,
    pub icon_path: String,
    pub feed_endpoint: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            keyword: DEFAULT_KEYWORD.to_string(),
            icon_path: DEFAULT_ICON_PATH.to_string(),
            feed_endpoint: DEFAULT_FEED_ENDPOINT.to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let env_map: HashMap<String, String> = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();

        let keyword = parse_keyword(env_map.get(KEYWORD_ENV).map(String::as_str))?;
        let icon_path = non_empty(env_map.get(ICON_ENV).map(String::as_str))
            .unwrap_or(DEFAULT_ICON_PATH)
            .to_string();
        let feed_endpoint =
            parse_feed_endpoint(env_map.get(FEED_ENDPOINT_ENV).map(String::as_str))?;

        Ok(Self {
            keyword,
            icon_path,
            feed_endpoint,
        })
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_keyword(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(value) = non_empty(raw) else {
        return Ok(DEFAULT_KEYWORD.to_string());
    };

    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidKeyword(value.to_string()));
    }

    Ok(value.to_string())
}

fn parse_feed_endpoint(raw: Option<&str>) -> Result<String, ConfigError> {
    let Some(value) = non_empty(raw) else {
        return Ok(DEFAULT_FEED_ENDPOINT.to_string());
    };

    let parsed =
        Url::parse(value).map_err(|_| ConfigError::InvalidFeedEndpoint(value.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ConfigError::InvalidFeedEndpoint(value.to_string()));
    }

    Ok(value.trim_end_matches('/').to_string())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid HACKERNEWS_KEYWORD: {0} (must be a single word)")]
    InvalidKeyword(String),
    #[error("invalid HACKERNEWS_FEED_ENDPOINT: {0} (expected http(s) URL)")]
    InvalidFeedEndpoint(String),
}
