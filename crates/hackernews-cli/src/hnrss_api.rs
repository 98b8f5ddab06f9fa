use std::sync::LazyLock;

use regex::Regex;
use reqwest::{StatusCode, header::USER_AGENT};
use rss::Channel;
use sysinfo::System;
use thiserror::Error;
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::topics::Topic;

pub const FEED_ITEM_LIMIT: usize = 30;
const CLIENT_NAME: &str = "Flow Launcher Extension, Flow/1.0.0";

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// One feed entry, flattened out of the RSS item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub creator: Option<String>,
    pub pub_date: Option<String>,
    pub comments: Option<String>,
    pub content_snippet: Option<String>,
}

impl FeedItem {
    fn from_rss(item: &rss::Item) -> Self {
        let creator = item
            .dublin_core_ext()
            .and_then(|dc| dc.creators().first())
            .map(String::as_str)
            .or_else(|| item.author());

        Self {
            title: owned(item.title()),
            link: owned(item.link()),
            creator: owned(creator),
            pub_date: owned(item.pub_date()),
            comments: owned(item.comments()),
            content_snippet: item.description().and_then(html_to_snippet),
        }
    }
}

/// Fetches up to [`FEED_ITEM_LIMIT`] items for `topic`. No topic, no request.
pub fn fetch_stories(
    config: &RuntimeConfig,
    topic: Option<Topic>,
) -> Result<Vec<FeedItem>, FeedError> {
    let Some(topic) = topic else {
        return Ok(Vec::new());
    };

    let url = feed_url(config, topic);
    debug!(%url, "fetching hnrss feed");

    let client = reqwest::blocking::Client::new();
    let response = client
        .get(&url)
        .header(USER_AGENT, user_agent())
        .send()
        .map_err(|source| FeedError::Transport { source })?;

    let status_code = response.status().as_u16();
    let body = response
        .bytes()
        .map_err(|source| FeedError::Transport { source })?;

    let items = parse_feed_response(status_code, &body)?;
    debug!(topic = %topic, count = items.len(), "parsed hnrss feed");
    Ok(items)
}

pub fn feed_url(config: &RuntimeConfig, topic: Topic) -> String {
    format!(
        "{}/{}?count={}",
        config.feed_endpoint,
        topic.as_str(),
        FEED_ITEM_LIMIT
    )
}

/// `Flow Launcher Extension, Flow/1.0.0 (<os type> <kernel release>)`.
pub fn user_agent() -> String {
    let os_release = System::kernel_version().unwrap_or_else(|| "unknown".to_string());
    user_agent_for(os_type(std::env::consts::OS), &os_release)
}

/// Kernel family name, so it pairs with the kernel release rather than a
/// distribution name.
fn os_type(target_os: &str) -> &str {
    match target_os {
        "linux" | "android" => "Linux",
        "macos" | "ios" => "Darwin",
        "windows" => "Windows_NT",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        "netbsd" => "NetBSD",
        other => other,
    }
}

fn user_agent_for(os_name: &str, os_release: &str) -> String {
    format!("{CLIENT_NAME} ({os_name} {os_release})")
}

pub fn parse_feed_response(status_code: u16, body: &[u8]) -> Result<Vec<FeedItem>, FeedError> {
    if !(200..=299).contains(&status_code) {
        let message = StatusCode::from_u16(status_code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| format!("HTTP {status_code}"));
        return Err(FeedError::Http {
            status: status_code,
            message,
        });
    }

    let channel = Channel::read_from(body).map_err(FeedError::InvalidFeed)?;
    Ok(channel
        .items()
        .iter()
        .take(FEED_ITEM_LIMIT)
        .map(FeedItem::from_rss)
        .collect())
}

/// Plain-text rendition of an item description: tags dropped, common
/// entities decoded, whitespace collapsed.
pub fn html_to_snippet(html: &str) -> Option<String> {
    let stripped = TAG_PATTERN.replace_all(html, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&");
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.is_empty() {
        None
    } else {
        Some(compact)
    }
}

fn owned(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("hnrss request failed: {source}")]
    Transport {
        #[source]
        source: reqwest::Error,
    },
    #[error("hnrss error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("invalid hnrss feed: {0}")]
    InvalidFeed(#[source] rss::Error),
}
