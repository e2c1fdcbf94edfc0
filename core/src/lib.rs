//! API client core for the projects / chats / messages service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `ChatApi` binds a client to
//! a caller-supplied `Transport` and exposes one method per backend
//! operation.
//!
//! # Design
//! - `ClientConfig` (base path `/api` and the JSON content-type header) is
//!   built once and shared by every request.
//! - `ChatApiClient::build_*` produce requests; `parse_*` helpers decode
//!   responses into domain types.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use api::ChatApi;
pub use client::{ChatApiClient, ClientConfig, DEFAULT_BASE_URL, DEFAULT_PAGE};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use types::{Chat, Id, Message, MessagePage, Project};
