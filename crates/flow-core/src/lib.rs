//! Wire types for Flow Launcher's JSON-RPC executable plugin protocol.
//!
//! The host starts the plugin once per event, passes a single JSON request as
//! the first argument, and reads one JSON document back from stdout.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const CHANGE_QUERY_METHOD: &str = "Flow.Launcher.ChangeQuery";

/// Methods the plugin registers with the host. Result entries can only point
/// back at one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    Query,
    ContextMenu,
    Topic,
    Open,
    Copy,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Query,
        Method::ContextMenu,
        Method::Topic,
        Method::Open,
        Method::Copy,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::ContextMenu => "context_menu",
            Self::Topic => "topic",
            Self::Open => "open",
            Self::Copy => "copy",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == raw.trim())
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub parameters: Vec<String>,
}

impl Request {
    pub fn new(method: Method, parameters: Vec<String>) -> Self {
        Self { method, parameters }
    }

    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let payload: RawRequest = serde_json::from_str(raw).map_err(RequestError::Malformed)?;
        let method = Method::parse(&payload.method)
            .ok_or_else(|| RequestError::UnknownMethod(payload.method.clone()))?;
        let parameters = payload.parameters.iter().map(stringify_parameter).collect();

        Ok(Self { method, parameters })
    }

    pub fn first_parameter(&self) -> Option<&str> {
        self.parameters.first().map(String::as_str)
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("malformed request: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("unsupported method: {0}")]
    UnknownMethod(String),
}

#[derive(Debug, Deserialize)]
struct RawRequest {
    method: String,
    #[serde(default)]
    parameters: Vec<Value>,
}

fn stringify_parameter(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Response {
    pub result: Vec<ResultEntry>,
}

impl Response {
    pub fn new(result: Vec<ResultEntry>) -> Self {
        Self { result }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultEntry {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "SubTitle", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "IcoPath", skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(rename = "Score", default)]
    pub score: i64,
    #[serde(rename = "JsonRPCAction", skip_serializing_if = "Option::is_none")]
    pub action: Option<JsonRpcAction>,
    #[serde(
        rename = "ContextData",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub context_data: Vec<String>,
}

impl ResultEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            icon_path: None,
            score: 0,
            action: None,
            context_data: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_icon(mut self, path: impl Into<String>) -> Self {
        self.icon_path = Some(path.into());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = score;
        self
    }

    pub fn with_action(mut self, action: JsonRpcAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_context(mut self, value: impl Into<String>) -> Self {
        self.context_data.push(value.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonRpcAction {
    pub method: Method,
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(rename = "dontHideAfterAction", default)]
    pub dont_hide_after_action: bool,
}

impl JsonRpcAction {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            parameters: Vec::new(),
            dont_hide_after_action: false,
        }
    }

    pub fn with_parameter(mut self, value: impl Into<String>) -> Self {
        self.parameters.push(value.into());
        self
    }

    pub fn keep_open(mut self) -> Self {
        self.dont_hide_after_action = true;
        self
    }
}

/// Instruction written back to the host instead of a result list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostCommand {
    pub method: String,
    pub parameters: Vec<Value>,
}

impl HostCommand {
    pub fn change_query(query: impl Into<String>, requery: bool) -> Self {
        Self {
            method: CHANGE_QUERY_METHOD.to_string(),
            parameters: vec![Value::String(query.into()), Value::Bool(requery)],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
