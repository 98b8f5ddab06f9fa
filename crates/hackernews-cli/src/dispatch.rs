//! Routes one host request to its handler.
//!
//! `query` decides between fetching a topic feed and suggesting topics;
//! `context_menu`, `topic`, `open` and `copy` answer a previous selection.

use flow_core::{HostCommand, Method, Request, Response};
use thiserror::Error;
use tracing::warn;

use crate::config::RuntimeConfig;
use crate::desktop::Desktop;
use crate::feedback;
use crate::hnrss_api::{FeedError, FeedItem};
use crate::suggest;
use crate::topics::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    ExactTopic(Topic),
    Suggest,
}

/// Exact (case-insensitive) registry hit fetches the feed, anything else
/// suggests topics.
pub fn classify(query: &str) -> QueryMode {
    match Topic::lookup(query) {
        Some(topic) => QueryMode::ExactTopic(topic),
        None => QueryMode::Suggest,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Results(Response),
    ChangeQuery(HostCommand),
    Silent,
}

impl Reply {
    /// JSON line for stdout, `None` when the host expects no answer.
    pub fn render(&self) -> serde_json::Result<Option<String>> {
        match self {
            Self::Results(response) => response.to_json().map(Some),
            Self::ChangeQuery(command) => command.to_json().map(Some),
            Self::Silent => Ok(None),
        }
    }
}

pub struct Context<'a> {
    pub config: &'a RuntimeConfig,
    pub fetch_stories:
        &'a dyn Fn(&RuntimeConfig, Option<Topic>) -> Result<Vec<FeedItem>, FeedError>,
    pub desktop: &'a dyn Desktop,
}

pub type Handler = fn(&Context<'_>, &Request) -> Result<Reply, DispatchError>;

/// Handler table. The match is exhaustive, so every `Method` the host can
/// send, and every action an entry can carry, has a handler.
pub fn handler_for(method: Method) -> Handler {
    match method {
        Method::Query => handle_query,
        Method::ContextMenu => handle_context_menu,
        Method::Topic => handle_topic,
        Method::Open => handle_open,
        Method::Copy => handle_copy,
    }
}

pub fn dispatch(context: &Context<'_>, request: &Request) -> Result<Reply, DispatchError> {
    handler_for(request.method)(context, request)
}

fn handle_query(context: &Context<'_>, request: &Request) -> Result<Reply, DispatchError> {
    let query = request.first_parameter().unwrap_or_default();
    let icon_path = context.config.icon_path.as_str();

    let response = match classify(query) {
        QueryMode::ExactTopic(topic) => {
            match (context.fetch_stories)(context.config, Some(topic)) {
                Ok(items) => feedback::stories_to_feedback(icon_path, &items),
                Err(error) => {
                    warn!(%topic, %error, "feed fetch failed");
                    feedback::error_feedback(icon_path, &error.to_string())
                }
            }
        }
        QueryMode::Suggest => {
            feedback::suggestions_to_feedback(icon_path, &suggest::rank_topics(query))
        }
    };

    Ok(Reply::Results(response))
}

fn handle_context_menu(
    context: &Context<'_>,
    request: &Request,
) -> Result<Reply, DispatchError> {
    let url = required(request)?;
    Ok(Reply::Results(feedback::comments_page_feedback(
        &context.config.icon_path,
        url,
    )))
}

fn handle_topic(context: &Context<'_>, request: &Request) -> Result<Reply, DispatchError> {
    let raw = required(request)?;
    let topic = Topic::lookup(raw).ok_or_else(|| DispatchError::UnknownTopic(raw.to_string()))?;

    let query = format!("{} {}", context.config.keyword, topic);
    Ok(Reply::ChangeQuery(HostCommand::change_query(query, false)))
}

fn handle_open(context: &Context<'_>, request: &Request) -> Result<Reply, DispatchError> {
    let url = required(request)?;
    context.desktop.open_url(url);
    Ok(Reply::Silent)
}

fn handle_copy(context: &Context<'_>, request: &Request) -> Result<Reply, DispatchError> {
    let url = required(request)?;
    context.desktop.copy_text(url);
    Ok(Reply::Silent)
}

fn required(request: &Request) -> Result<&str, DispatchError> {
    request
        .first_parameter()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(DispatchError::MissingParameter(request.method))
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0} requires a non-empty first parameter")]
    MissingParameter(Method),
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use flow_core::ResultEntry;

    use crate::feedback::{GENERIC_ERROR_TITLE, NO_RESULTS_TITLE};
    use crate::topics::TOPICS;

    use super::*;

    #[derive(Default)]
    struct RecordingDesktop {
        opened: RefCell<Vec<String>>,
        copied: RefCell<Vec<String>>,
    }

    impl Desktop for RecordingDesktop {
        fn open_url(&self, url: &str) {
            self.opened.borrow_mut().push(url.to_string());
        }

        fn copy_text(&self, text: &str) {
            self.copied.borrow_mut().push(text.to_string());
        }
    }

    fn story(title: &str, points: u32) -> FeedItem {
        FeedItem {
            title: Some(title.to_string()),
            link: Some(format!("https://example.com/{points}")),
            content_snippet: Some(format!("Points: {points} # Comments: 1")),
            ..FeedItem::default()
        }
    }

    type FetchResult = Result<Vec<FeedItem>, FeedError>;

    fn no_fetch(_: &RuntimeConfig, topic: Option<Topic>) -> FetchResult {
        panic!("unexpected fetch for {topic:?}")
    }

    fn run(
        method: Method,
        parameters: &[&str],
        fetch_stories: &dyn Fn(&RuntimeConfig, Option<Topic>) -> FetchResult,
        desktop: &RecordingDesktop,
    ) -> Result<Reply, DispatchError> {
        let config = RuntimeConfig::default();
        let context = Context {
            config: &config,
            fetch_stories,
            desktop,
        };
        let request = Request::new(
            method,
            parameters.iter().map(|value| value.to_string()).collect(),
        );
        dispatch(&context, &request)
    }

    fn action_method(entry: &ResultEntry) -> Option<Method> {
        entry.action.as_ref().map(|action| action.method)
    }

    fn results(reply: Reply) -> Response {
        match reply {
            Reply::Results(response) => response,
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn classify_enters_exact_topic_for_registry_keywords() {
        for topic in TOPICS {
            assert!(matches!(classify(topic), QueryMode::ExactTopic(t) if t.as_str() == topic));
            assert!(matches!(
                classify(&topic.to_uppercase()),
                QueryMode::ExactTopic(_)
            ));
        }
    }

    #[test]
    fn classify_suggests_for_everything_else() {
        for query in ["", "jo", "jobs!", "hn jobs", " ask"] {
            assert_eq!(classify(query), QueryMode::Suggest, "query {query:?}");
        }
    }

    #[test]
    fn exact_topic_query_fetches_feed_and_scores_by_points() {
        let requested = RefCell::new(Vec::new());
        let fetch = |_: &RuntimeConfig, topic: Option<Topic>| -> FetchResult {
            requested.borrow_mut().push(topic.map(Topic::as_str));
            Ok(vec![story("first", 10), FeedItem {
                content_snippet: None,
                ..story("second", 0)
            }])
        };

        let response = results(
            run(Method::Query, &["Jobs"], &fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );

        assert_eq!(requested.borrow().as_slice(), &[Some("jobs")]);
        assert_eq!(response.result.len(), 2);
        assert_eq!(response.result[0].score, 10);
        assert_eq!(response.result[1].score, 0);
        assert!(
            response
                .result
                .iter()
                .all(|entry| action_method(entry) == Some(Method::Open))
        );
    }

    #[test]
    fn exact_topic_with_empty_feed_returns_single_error_entry() {
        let fetch = |_: &RuntimeConfig, _: Option<Topic>| -> FetchResult { Ok(Vec::new()) };

        let response = results(
            run(Method::Query, &["ask"], &fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );

        assert_eq!(response.result.len(), 1);
        assert_eq!(response.result[0].title, NO_RESULTS_TITLE);
    }

    #[test]
    fn exact_topic_fetch_failure_returns_single_entry_with_message() {
        let fetch = |_: &RuntimeConfig, _: Option<Topic>| -> FetchResult {
            Err(FeedError::Http {
                status: 502,
                message: "Bad Gateway".to_string(),
            })
        };

        let response = results(
            run(Method::Query, &["best"], &fetch, &RecordingDesktop::default())
                .expect("fetch failures must not escape the query handler"),
        );

        assert_eq!(response.result.len(), 1);
        assert_eq!(response.result[0].title, "hnrss error (502): Bad Gateway");
        assert_ne!(response.result[0].title, GENERIC_ERROR_TITLE);
    }

    #[test]
    fn empty_query_suggests_every_topic_capitalized() {
        let response = results(
            run(Method::Query, &[""], &no_fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );

        assert_eq!(response.result.len(), TOPICS.len());
        assert_eq!(response.result[0].title, "Active");
        assert_eq!(response.result[14].title, "Whoishiring");
        for entry in &response.result {
            let action = entry.action.as_ref().expect("topic action");
            assert_eq!(action.method, Method::Topic);
            assert!(action.dont_hide_after_action);
        }
    }

    #[test]
    fn missing_query_parameter_behaves_like_empty_query() {
        let response = results(
            run(Method::Query, &[], &no_fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );
        assert_eq!(response.result.len(), TOPICS.len());
    }

    #[test]
    fn whitespace_only_query_suggests_nothing() {
        let response = results(
            run(Method::Query, &["   "], &no_fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );
        assert!(response.result.is_empty());
    }

    #[test]
    fn every_method_routes_to_its_handler() {
        let fetch = |_: &RuntimeConfig, _: Option<Topic>| -> FetchResult { Ok(Vec::new()) };
        let desktop = RecordingDesktop::default();

        for method in Method::ALL {
            let reply = run(method, &["ask"], &fetch, &desktop)
                .unwrap_or_else(|err| panic!("{method} should be handled: {err}"));
            match method {
                Method::Query | Method::ContextMenu => {
                    assert!(matches!(reply, Reply::Results(_)), "{method}")
                }
                Method::Topic => assert!(matches!(reply, Reply::ChangeQuery(_))),
                Method::Open | Method::Copy => assert_eq!(reply, Reply::Silent),
            }
        }
        assert_eq!(desktop.opened.borrow().as_slice(), &["ask"]);
        assert_eq!(desktop.copied.borrow().as_slice(), &["ask"]);
    }

    #[test]
    fn partial_query_suggests_registry_members_only() {
        let response = results(
            run(Method::Query, &["sho"], &no_fetch, &RecordingDesktop::default())
                .expect("query should succeed"),
        );

        assert!(!response.result.is_empty());
        assert!(response.result.len() <= TOPICS.len());
        assert_eq!(response.result[0].title, "Show");
    }

    #[test]
    fn produced_entries_only_point_at_selection_methods() {
        let fetch =
            |_: &RuntimeConfig, _: Option<Topic>| -> FetchResult { Ok(vec![story("s", 3)]) };
        let desktop = RecordingDesktop::default();

        for (method, parameters) in [
            (Method::Query, vec!["frontpage"]),
            (Method::Query, vec!["fr"]),
            (Method::ContextMenu, vec!["https://news.ycombinator.com/item?id=1"]),
        ] {
            let response = results(run(method, &parameters, &fetch, &desktop).expect("ok"));
            for entry in &response.result {
                if let Some(target) = action_method(entry) {
                    assert!(
                        matches!(target, Method::Open | Method::Topic),
                        "entries must not point back at {target}"
                    );
                }
            }
        }
    }

    #[test]
    fn topic_selection_changes_query_to_keyword_and_topic() {
        let reply = run(Method::Topic, &["ask"], &no_fetch, &RecordingDesktop::default())
            .expect("topic should succeed");

        match reply {
            Reply::ChangeQuery(command) => {
                assert_eq!(command.parameters[0], serde_json::Value::from("hn ask"));
                assert_eq!(command.parameters[1], serde_json::Value::Bool(false));
            }
            other => panic!("expected change query, got {other:?}"),
        }
    }

    #[test]
    fn topic_selection_rejects_unknown_topic() {
        let err = run(Method::Topic, &["weather"], &no_fetch, &RecordingDesktop::default())
            .expect_err("unknown topic should fail");
        assert_eq!(err, DispatchError::UnknownTopic("weather".to_string()));
    }

    #[test]
    fn context_menu_offers_comments_page() {
        let url = "https://news.ycombinator.com/item?id=99";
        let response = results(
            run(Method::ContextMenu, &[url], &no_fetch, &RecordingDesktop::default())
                .expect("context menu should succeed"),
        );

        assert_eq!(response.result.len(), 1);
        let action = response.result[0].action.as_ref().expect("open action");
        assert_eq!(action.method, Method::Open);
        assert_eq!(action.parameters, vec![url.to_string()]);
    }

    #[test]
    fn open_and_copy_hand_off_to_desktop_silently() {
        let desktop = RecordingDesktop::default();

        let opened = run(Method::Open, &["https://example.com"], &no_fetch, &desktop)
            .expect("open should succeed");
        let copied = run(Method::Copy, &["https://example.com/c"], &no_fetch, &desktop)
            .expect("copy should succeed");

        assert_eq!(opened, Reply::Silent);
        assert_eq!(copied, Reply::Silent);
        assert_eq!(desktop.opened.borrow().as_slice(), &["https://example.com"]);
        assert_eq!(desktop.copied.borrow().as_slice(), &["https://example.com/c"]);
    }

    #[test]
    fn selection_handlers_require_a_parameter() {
        let desktop = RecordingDesktop::default();
        for method in [Method::Open, Method::Copy, Method::Topic, Method::ContextMenu] {
            let err = run(method, &["  "], &no_fetch, &desktop).expect_err("blank should fail");
            assert_eq!(err, DispatchError::MissingParameter(method));
        }
        assert!(desktop.opened.borrow().is_empty());
        assert!(desktop.copied.borrow().is_empty());
    }

    #[test]
    fn silent_reply_renders_nothing() {
        assert_eq!(Reply::Silent.render().expect("render"), None);
        let rendered = Reply::ChangeQuery(HostCommand::change_query("hn jobs", false))
            .render()
            .expect("render")
            .expect("change query output");
        assert!(rendered.contains("Flow.Launcher.ChangeQuery"));
    }
}
