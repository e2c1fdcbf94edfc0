//! Domain DTOs for the chat API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently so
//! the client never links against axum. Integration tests catch drift
//! between the two crates. Field names go over the wire in camelCase.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the backend.
pub type Id = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: Id,
    pub project_id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Id,
    pub chat_id: Id,
    pub message: String,
}

/// One page of a chat's messages, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

/// Body of create/rename calls for projects and chats.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NamePayload<'a> {
    pub name: &'a str,
}

/// Body of the send-message call.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessagePayload<'a> {
    pub message: &'a str,
}
