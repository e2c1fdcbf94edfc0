//! One function per backend operation, bound to a transport.
//!
//! Each method builds its request, issues exactly one `Transport::execute`
//! call and returns the response untouched. Non-2xx statuses and transport
//! failures come back as `Err`; nothing is retried, cached or logged.

use std::fmt::Display;

use crate::client::{check_status, ChatApiClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub struct ChatApi<T> {
    client: ChatApiClient,
    transport: T,
}

impl<T: Transport> ChatApi<T> {
    pub fn new(client: ChatApiClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &ChatApiClient {
        &self.client
    }

    pub fn get_projects(&self) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_get_projects())
    }

    pub fn create_project(&self, name: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_create_project(name)?)
    }

    pub fn rename_project(&self, id: impl Display, name: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_rename_project(id, name)?)
    }

    pub fn delete_project(&self, id: impl Display) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_delete_project(id))
    }

    pub fn get_chats(&self, project_id: impl Display) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_get_chats(project_id))
    }

    pub fn create_chat(&self, project_id: impl Display, name: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_create_chat(project_id, name)?)
    }

    pub fn rename_chat(&self, id: impl Display, name: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_rename_chat(id, name)?)
    }

    pub fn delete_chat(&self, id: impl Display) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_delete_chat(id))
    }

    /// `page` defaults to 1 when `None`.
    pub fn get_messages(&self, chat_id: impl Display, page: Option<u32>) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_get_messages(chat_id, page))
    }

    pub fn send_message(&self, chat_id: impl Display, message: &str) -> Result<HttpResponse, ApiError> {
        self.send(self.client.build_send_message(chat_id, message)?)
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let response = self.transport.execute(request)?;
        check_status(response)
    }
}
