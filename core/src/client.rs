//! Stateless request builder and response parser for the chat API.
//!
//! # Design
//! `ChatApiClient` holds only an immutable `ClientConfig` (base path plus
//! default headers) built once and cloned freely. Each operation has a
//! `build_*` method producing an `HttpRequest`; typed `parse_*` helpers turn
//! an `HttpResponse` into domain values for callers that want them. The
//! caller (or `ChatApi`) executes the round-trip in between.
//!
//! Identifiers are interpolated into paths verbatim through `Display`, with
//! no percent-encoding.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Chat, Message, MessagePage, MessagePayload, NamePayload, Project};

/// Base path every request is issued under.
pub const DEFAULT_BASE_URL: &str = "/api";

/// Page requested when `build_get_messages` is called without one.
pub const DEFAULT_PAGE: u32 = 1;

/// Process-wide client settings, created once and shared by every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    headers: Vec<(String, String)>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        }
    }

    /// Add a header sent with every request.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ChatApiClient {
    config: ClientConfig,
}

impl ChatApiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // --- projects ---

    pub fn build_get_projects(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/projects".to_string(), None)
    }

    pub fn build_create_project(&self, name: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&NamePayload { name })?;
        Ok(self.request(HttpMethod::Post, "/projects".to_string(), Some(body)))
    }

    pub fn build_rename_project(&self, id: impl Display, name: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&NamePayload { name })?;
        Ok(self.request(HttpMethod::Put, format!("/projects/{id}"), Some(body)))
    }

    pub fn build_delete_project(&self, id: impl Display) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/projects/{id}"), None)
    }

    // --- chats ---

    pub fn build_get_chats(&self, project_id: impl Display) -> HttpRequest {
        self.request(HttpMethod::Get, format!("/projects/{project_id}/chats"), None)
    }

    pub fn build_create_chat(&self, project_id: impl Display, name: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&NamePayload { name })?;
        Ok(self.request(HttpMethod::Post, format!("/projects/{project_id}/chats"), Some(body)))
    }

    pub fn build_rename_chat(&self, id: impl Display, name: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&NamePayload { name })?;
        Ok(self.request(HttpMethod::Put, format!("/chats/{id}"), Some(body)))
    }

    pub fn build_delete_chat(&self, id: impl Display) -> HttpRequest {
        self.request(HttpMethod::Delete, format!("/chats/{id}"), None)
    }

    // --- messages ---

    pub fn build_get_messages(&self, chat_id: impl Display, page: Option<u32>) -> HttpRequest {
        let page = page.unwrap_or(DEFAULT_PAGE);
        self.request(HttpMethod::Get, format!("/chats/{chat_id}/messages?page={page}"), None)
    }

    pub fn build_send_message(&self, chat_id: impl Display, message: &str) -> Result<HttpRequest, ApiError> {
        let body = to_json(&MessagePayload { message })?;
        Ok(self.request(HttpMethod::Post, format!("/chats/{chat_id}/messages"), Some(body)))
    }

    // --- typed parsing ---

    pub fn parse_projects(&self, response: HttpResponse) -> Result<Vec<Project>, ApiError> {
        parse_json(response)
    }

    pub fn parse_project(&self, response: HttpResponse) -> Result<Project, ApiError> {
        parse_json(response)
    }

    pub fn parse_chats(&self, response: HttpResponse) -> Result<Vec<Chat>, ApiError> {
        parse_json(response)
    }

    pub fn parse_chat(&self, response: HttpResponse) -> Result<Chat, ApiError> {
        parse_json(response)
    }

    pub fn parse_message_page(&self, response: HttpResponse) -> Result<MessagePage, ApiError> {
        parse_json(response)
    }

    pub fn parse_message(&self, response: HttpResponse) -> Result<Message, ApiError> {
        parse_json(response)
    }

    /// For delete calls: succeeds on any 2xx and ignores the body.
    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(response).map(|_| ())
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url),
            headers: self.config.headers.clone(),
            body,
        }
    }
}

/// Reject any non-2xx response, handing back the untouched response otherwise.
pub(crate) fn check_status(response: HttpResponse) -> Result<HttpResponse, ApiError> {
    if response.is_success() {
        return Ok(response);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body,
    })
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let response = check_status(response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}
