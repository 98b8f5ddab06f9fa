use clap::Parser;
use flow_core::{Method, Request, RequestError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use hackernews_cli::{
    config::{ConfigError, DEFAULT_ICON_PATH, RuntimeConfig},
    desktop::{Desktop, SystemDesktop},
    dispatch::{self, Context, DispatchError, Reply},
    feedback,
    hnrss_api::{self, FeedError, FeedItem},
    topics::Topic,
};

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Parser)]
#[command(author, version, about = "Hacker News plugin for Flow Launcher")]
struct Cli {
    /// JSON-RPC request sent by Flow Launcher, e.g. {"method":"query","parameters":["jobs"]}.
    request: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorKind {
    User,
    Runtime,
}

#[derive(Debug, PartialEq, Eq)]
struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    fn user(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::User,
            message: message.into(),
        }
    }

    fn runtime(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Runtime,
            message: message.into(),
        }
    }

    fn from_request(error: RequestError) -> Self {
        AppError::user(error.to_string())
    }

    fn from_config(error: ConfigError) -> Self {
        AppError::user(error.to_string())
    }

    fn from_dispatch(error: DispatchError) -> Self {
        AppError::user(error.to_string())
    }

    fn exit_code(&self) -> i32 {
        match self.kind {
            ErrorKind::User => 2,
            ErrorKind::Runtime => 1,
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(Some(output)) => {
            println!("{output}");
        }
        Ok(None) => {}
        Err(error) => {
            eprintln!("error: {}", error.message);
            std::process::exit(error.exit_code());
        }
    }
}

/// Logs go to stderr; stdout belongs to the host.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<Option<String>, AppError> {
    run_with(
        cli,
        RuntimeConfig::from_env,
        hnrss_api::fetch_stories,
        &SystemDesktop,
    )
}

fn run_with<LoadConfig, FetchStories>(
    cli: Cli,
    load_config: LoadConfig,
    fetch_stories: FetchStories,
    desktop: &dyn Desktop,
) -> Result<Option<String>, AppError>
where
    LoadConfig: Fn() -> Result<RuntimeConfig, ConfigError>,
    FetchStories: Fn(&RuntimeConfig, Option<Topic>) -> Result<Vec<FeedItem>, FeedError>,
{
    let request = Request::parse(&cli.request).map_err(AppError::from_request)?;
    debug!(method = %request.method, parameters = request.parameters.len(), "handling request");

    let config = match load_config() {
        Ok(config) => config,
        Err(error) if request.method == Method::Query => {
            // The host is waiting on a result list; surface the problem there.
            let payload = feedback::error_feedback(DEFAULT_ICON_PATH, &error.to_string());
            return render(&Reply::Results(payload));
        }
        Err(error) => return Err(AppError::from_config(error)),
    };

    let context = Context {
        config: &config,
        fetch_stories: &fetch_stories,
        desktop,
    };
    let reply = dispatch::dispatch(&context, &request).map_err(AppError::from_dispatch)?;

    render(&reply)
}

fn render(reply: &Reply) -> Result<Option<String>, AppError> {
    reply
        .render()
        .map_err(|err| AppError::runtime(format!("failed to serialize reply: {err}")))
}
