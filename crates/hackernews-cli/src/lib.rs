//! Hacker News plugin for Flow Launcher.
//!
//! - `topics`: fixed hnrss.org topic registry.
//! - `config`: environment/default parsing.
//! - `hnrss_api`: feed fetch + RSS mapping.
//! - `snippet`: points/comments extraction.
//! - `suggest`: fuzzy topic ranking.
//! - `feedback`: result entry assembly.
//! - `desktop`: open/copy side effects.
//! - `dispatch`: method routing and query classification.

pub mod config;
pub mod desktop;
pub mod dispatch;
pub mod feedback;
pub mod hnrss_api;
pub mod snippet;
pub mod suggest;
pub mod topics;
