use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// Messages returned per page by the list endpoint.
pub const PER_PAGE: u32 = 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chat {
    pub id: u64,
    pub project_id: u64,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: u64,
    pub chat_id: u64,
    pub message: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
}

#[derive(Deserialize)]
pub struct NameInput {
    pub name: String,
}

#[derive(Deserialize)]
pub struct MessageInput {
    pub message: String,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Default)]
pub struct Store {
    last_id: u64,
    projects: BTreeMap<u64, Project>,
    chats: BTreeMap<u64, Chat>,
    messages: BTreeMap<u64, Message>,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

pub type Db = Arc<RwLock<Store>>;

/// Routes for the resource hierarchy, mounted under `/api` like the real backend.
pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{id}", put(rename_project).delete(delete_project))
        .route("/projects/{id}/chats", get(list_chats).post(create_chat))
        .route("/chats/{id}", put(rename_chat).delete(delete_chat))
        .route("/chats/{id}/messages", get(list_messages).post(send_message))
        .with_state(db);
    Router::new().nest("/api", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- projects ---

async fn list_projects(State(db): State<Db>) -> Json<Vec<Project>> {
    let store = db.read().await;
    Json(store.projects.values().cloned().collect())
}

async fn create_project(
    State(db): State<Db>,
    Json(input): Json<NameInput>,
) -> (StatusCode, Json<Project>) {
    let mut store = db.write().await;
    let project = Project {
        id: store.next_id(),
        name: input.name,
    };
    store.projects.insert(project.id, project.clone());
    (StatusCode::CREATED, Json(project))
}

async fn rename_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<NameInput>,
) -> Result<Json<Project>, StatusCode> {
    let mut store = db.write().await;
    let project = store.projects.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    project.name = input.name;
    Ok(Json(project.clone()))
}

async fn delete_project(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.projects.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    let orphaned: Vec<u64> = store
        .chats
        .values()
        .filter(|c| c.project_id == id)
        .map(|c| c.id)
        .collect();
    for chat_id in &orphaned {
        store.chats.remove(chat_id);
    }
    store.messages.retain(|_, m| !orphaned.contains(&m.chat_id));
    tracing::debug!(project = id, chats = orphaned.len(), "deleted project");
    Ok(StatusCode::NO_CONTENT)
}

// --- chats ---

async fn list_chats(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
) -> Result<Json<Vec<Chat>>, StatusCode> {
    let store = db.read().await;
    if !store.projects.contains_key(&project_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let chats = store
        .chats
        .values()
        .filter(|c| c.project_id == project_id)
        .cloned()
        .collect();
    Ok(Json(chats))
}

async fn create_chat(
    State(db): State<Db>,
    Path(project_id): Path<u64>,
    Json(input): Json<NameInput>,
) -> Result<(StatusCode, Json<Chat>), StatusCode> {
    let mut store = db.write().await;
    if !store.projects.contains_key(&project_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let chat = Chat {
        id: store.next_id(),
        project_id,
        name: input.name,
    };
    store.chats.insert(chat.id, chat.clone());
    Ok((StatusCode::CREATED, Json(chat)))
}

async fn rename_chat(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<NameInput>,
) -> Result<Json<Chat>, StatusCode> {
    let mut store = db.write().await;
    let chat = store.chats.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    chat.name = input.name;
    Ok(Json(chat.clone()))
}

async fn delete_chat(
    State(db): State<Db>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    store.chats.remove(&id).ok_or(StatusCode::NOT_FOUND)?;
    store.messages.retain(|_, m| m.chat_id != id);
    Ok(StatusCode::NO_CONTENT)
}

// --- messages ---

async fn list_messages(
    State(db): State<Db>,
    Path(chat_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Result<Json<MessagePage>, StatusCode> {
    let page = query.page.unwrap_or(1);
    if page == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let store = db.read().await;
    if !store.chats.contains_key(&chat_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let in_chat: Vec<&Message> = store.messages.values().filter(|m| m.chat_id == chat_id).collect();
    let skip = (page as usize - 1).saturating_mul(PER_PAGE as usize);
    let messages = in_chat
        .iter()
        .skip(skip)
        .take(PER_PAGE as usize)
        .map(|m| (*m).clone())
        .collect();
    Ok(Json(MessagePage {
        messages,
        page,
        per_page: PER_PAGE,
        total: in_chat.len() as u64,
    }))
}

async fn send_message(
    State(db): State<Db>,
    Path(chat_id): Path<u64>,
    Json(input): Json<MessageInput>,
) -> Result<(StatusCode, Json<Message>), StatusCode> {
    let mut store = db.write().await;
    if !store.chats.contains_key(&chat_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let message = Message {
        id: store.next_id(),
        chat_id,
        message: input.message,
    };
    store.messages.insert(message.id, message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}
