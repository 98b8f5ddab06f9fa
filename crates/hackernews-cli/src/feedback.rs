use chrono::DateTime;
use flow_core::{JsonRpcAction, Method, Response, ResultEntry};

use crate::hnrss_api::FeedItem;
use crate::snippet::{extract_comments, extract_points, points_score};
use crate::topics::Topic;

pub const NO_RESULTS_TITLE: &str = "No results found";
pub const GENERIC_ERROR_TITLE: &str = "Something went wrong";
const UNTITLED_STORY: &str = "No title";
const UNKNOWN_CREATOR: &str = "unknown";
const COMMENTS_PAGE_TITLE: &str = "Go to Hacker News page";

pub fn stories_to_feedback(icon_path: &str, items: &[FeedItem]) -> Response {
    let entries: Vec<ResultEntry> = items
        .iter()
        .filter_map(|item| story_to_entry(icon_path, item))
        .collect();

    if entries.is_empty() {
        return error_feedback(icon_path, NO_RESULTS_TITLE);
    }

    Response::new(entries)
}

pub fn suggestions_to_feedback(icon_path: &str, topics: &[Topic]) -> Response {
    let entries = topics
        .iter()
        .map(|topic| {
            ResultEntry::new(topic.display_name())
                .with_subtitle(format!("Filter topic: {topic}"))
                .with_icon(icon_path)
                .with_action(
                    JsonRpcAction::new(Method::Topic)
                        .with_parameter(topic.as_str())
                        .keep_open(),
                )
        })
        .collect();

    Response::new(entries)
}

/// Single entry carrying `message` as its title; blank messages fall back to
/// a generic title.
pub fn error_feedback(icon_path: &str, message: &str) -> Response {
    let title = single_line(message);
    let title = if title.is_empty() {
        GENERIC_ERROR_TITLE.to_string()
    } else {
        title
    };

    Response::new(vec![ResultEntry::new(title).with_icon(icon_path)])
}

pub fn comments_page_feedback(icon_path: &str, url: &str) -> Response {
    Response::new(vec![
        ResultEntry::new(COMMENTS_PAGE_TITLE)
            .with_subtitle(url)
            .with_icon(icon_path)
            .with_action(JsonRpcAction::new(Method::Open).with_parameter(url)),
    ])
}

fn story_to_entry(icon_path: &str, item: &FeedItem) -> Option<ResultEntry> {
    let target = item.link.as_deref().or(item.comments.as_deref())?;
    let snippet = item.content_snippet.as_deref();

    let mut entry = ResultEntry::new(item.title.as_deref().unwrap_or(UNTITLED_STORY))
        .with_subtitle(story_subtitle(item))
        .with_icon(icon_path)
        .with_score(points_score(snippet))
        .with_action(JsonRpcAction::new(Method::Open).with_parameter(target));

    if let Some(comments) = item.comments.as_deref() {
        entry = entry.with_context(comments);
    }

    Some(entry)
}

fn story_subtitle(item: &FeedItem) -> String {
    let snippet = item.content_snippet.as_deref();
    let points = extract_points(snippet).unwrap_or_else(|| "0".to_string());
    let comments = extract_comments(snippet).unwrap_or_else(|| "0".to_string());
    let creator = item.creator.as_deref().unwrap_or(UNKNOWN_CREATOR);

    let mut subtitle = format!("{points} points | {comments} comments | by: {creator}");
    if let Some(date) = item.pub_date.as_deref().and_then(format_pub_date) {
        subtitle.push_str(" | ");
        subtitle.push_str(&date);
    }
    subtitle
}

/// RFC 2822 feed date rendered as `October 19, 2026`.
pub fn format_pub_date(raw: &str) -> Option<String> {
    let parsed = DateTime::parse_from_rfc2822(raw.trim()).ok()?;
    Some(parsed.format("%B %-d, %Y").to_string())
}

fn single_line(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}
