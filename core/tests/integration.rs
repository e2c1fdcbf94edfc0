//! End-to-end runs of every client operation over real HTTP.
//!
//! # Design
//! Starts the mock backend (and, for the proxied run, the dev proxy in front
//! of it) on random ports, then drives `ChatApi` through a ureq-backed
//! `Transport`. Catches drift between the client's request shapes and the
//! server's routes and DTOs.

use std::net::SocketAddr;

use chat_api_core::{
    ApiError, ChatApi, ChatApiClient, ClientConfig, HttpMethod, HttpRequest, HttpResponse, Transport,
    TransportError,
};
use dev_proxy::ProxyTable;

/// Executes requests with ureq, returning 4xx/5xx as data so the client
/// decides what counts as failure.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = req.path.as_str();
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(path), &req.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(path), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(path), &req.headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(path), &req.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(path), &req.headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(path), &req.headers).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse { status, headers, body })
    }
}

fn bind_random() -> (std::net::TcpListener, SocketAddr) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    listener.set_nonblocking(true).unwrap();
    (listener, addr)
}

/// Start the mock backend, optionally with the dev proxy in front of it.
/// Returns the address the client should talk to.
fn start_servers(with_proxy: bool) -> SocketAddr {
    let (backend_listener, backend_addr) = bind_random();
    let (proxy_listener, proxy_addr) = bind_random();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let backend = tokio::net::TcpListener::from_std(backend_listener).unwrap();
            let backend = tokio::spawn(mock_server::run(backend));
            if with_proxy {
                let target = url::Url::parse(&format!("http://{backend_addr}")).unwrap();
                let table = ProxyTable::api_to(target).unwrap();
                let proxy = tokio::net::TcpListener::from_std(proxy_listener).unwrap();
                dev_proxy::run(proxy, table).await
            } else {
                backend.await.unwrap()
            }
        })
        .unwrap();
    });

    if with_proxy {
        proxy_addr
    } else {
        backend_addr
    }
}

fn api_at(addr: SocketAddr) -> ChatApi<UreqTransport> {
    let client = ChatApiClient::new(ClientConfig::new(&format!("http://{addr}/api")));
    ChatApi::new(client, UreqTransport::new())
}

fn lifecycle(api: &ChatApi<UreqTransport>) {
    let client = api.client();

    // Step 1: no projects yet.
    let projects = client.parse_projects(api.get_projects().unwrap()).unwrap();
    assert!(projects.is_empty(), "expected empty list");

    // Step 2: create and rename a project.
    let project = client.parse_project(api.create_project("Research").unwrap()).unwrap();
    assert_eq!(project.name, "Research");
    let renamed = client
        .parse_project(api.rename_project(project.id, "Archive").unwrap())
        .unwrap();
    assert_eq!(renamed.id, project.id);
    assert_eq!(renamed.name, "Archive");

    // Step 3: create a chat inside it, then rename it.
    let resp = api.create_chat(project.id, "General").unwrap();
    assert_eq!(resp.status, 201);
    let chat = client.parse_chat(resp).unwrap();
    assert_eq!(chat.project_id, project.id);
    let chat = client.parse_chat(api.rename_chat(chat.id, "Random").unwrap()).unwrap();
    assert_eq!(chat.name, "Random");
    let chats = client.parse_chats(api.get_chats(project.id).unwrap()).unwrap();
    assert_eq!(chats, vec![chat.clone()]);

    // Step 4: send a message and read the first page back.
    let sent = client.parse_message(api.send_message(chat.id, "hello").unwrap()).unwrap();
    assert_eq!(sent.chat_id, chat.id);
    let page = client.parse_message_page(api.get_messages(chat.id, None).unwrap()).unwrap();
    assert_eq!(page.page, 1);
    assert_eq!(page.messages, vec![sent]);
    let page = client.parse_message_page(api.get_messages(chat.id, Some(2)).unwrap()).unwrap();
    assert!(page.messages.is_empty());

    // Step 5: delete the chat, then the project.
    client.parse_empty(api.delete_chat(chat.id).unwrap()).unwrap();
    let err = api.delete_chat(chat.id).unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 404, .. }));
    let resp = api.delete_project(project.id).unwrap();
    assert_eq!(resp.status, 204);

    // Step 6: children of a deleted project are gone.
    let err = api.get_chats(project.id).unwrap_err();
    assert_eq!(err.status(), Some(404));
    let projects = client.parse_projects(api.get_projects().unwrap()).unwrap();
    assert!(projects.is_empty(), "expected empty list after delete");
}

#[test]
fn crud_lifecycle_against_backend() {
    let api = api_at(start_servers(false));
    lifecycle(&api);
}

#[test]
fn crud_lifecycle_through_dev_proxy() {
    let api = api_at(start_servers(true));
    lifecycle(&api);
}

#[test]
fn unreachable_backend_is_a_transport_error() {
    let (listener, addr) = bind_random();
    drop(listener);
    let err = api_at(addr).get_projects().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
