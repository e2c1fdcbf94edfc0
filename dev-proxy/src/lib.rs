//! Development proxy for the chat frontend.
//!
//! # Overview
//! A static `ProxyTable` says which path prefixes belong to the backend.
//! By default everything under `/api` goes to `http://127.0.0.1:5000` with
//! the `Host` header rewritten to that origin. The table is read once at
//! startup and never changes while the server runs.

pub mod config;
pub mod route;
pub mod server;

pub use config::{ConfigError, DevServerConfig, ProxyRule, ProxyTable};
pub use route::Forward;
pub use server::{app, run};
