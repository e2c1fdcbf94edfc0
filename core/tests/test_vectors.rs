//! Verify every operation against the JSON vectors in `test-vectors/`.
//!
//! Each case names an operation and its arguments, the request it must
//! emit, a canned response, and whether that response is handed back or
//! rejected. Bodies are compared as parsed JSON to ignore field order.

use std::cell::RefCell;

use chat_api_core::{ApiError, ChatApi, ChatApiClient, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use serde_json::Value;

/// Replays one canned response and remembers the request it was given.
struct Replay {
    response: HttpResponse,
    seen: RefCell<Option<HttpRequest>>,
}

impl Transport for Replay {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        *self.seen.borrow_mut() = Some(request);
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn invoke(api: &ChatApi<&Replay>, operation: &str, args: &Value) -> Result<HttpResponse, ApiError> {
    let id = || args["id"].as_u64().unwrap();
    let text = |key: &str| args[key].as_str().unwrap().to_string();
    match operation {
        "get_projects" => api.get_projects(),
        "create_project" => api.create_project(&text("name")),
        "rename_project" => api.rename_project(id(), &text("name")),
        "delete_project" => api.delete_project(id()),
        "get_chats" => api.get_chats(id()),
        "create_chat" => api.create_chat(id(), &text("name")),
        "rename_chat" => api.rename_chat(id(), &text("name")),
        "delete_chat" => api.delete_chat(id()),
        "get_messages" => api.get_messages(id(), args["page"].as_u64().map(|p| p as u32)),
        "send_message" => api.send_message(id(), &text("message")),
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn operation_vectors() {
    let raw = include_str!("../../test-vectors/operations.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["simulated_response"];
        let replay = Replay {
            response: HttpResponse {
                status: sim["status"].as_u64().unwrap() as u16,
                headers: Vec::new(),
                body: sim["body"].as_str().unwrap().to_string(),
            },
            seen: RefCell::new(None),
        };
        let api = ChatApi::new(ChatApiClient::default(), &replay);

        let result = invoke(&api, case["operation"].as_str().unwrap(), &case["args"]);

        // Verify the request that went out.
        let req = replay.seen.borrow_mut().take().unwrap();
        let expected = &case["expected_request"];
        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, expected["path"].as_str().unwrap(), "{name}: path");
        assert_eq!(req.header("Content-Type"), Some("application/json"), "{name}: content type");
        match &expected["body"] {
            Value::Null => assert!(req.body.is_none(), "{name}: body should be None"),
            body => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
        }

        // Verify what the caller got back.
        if let Some(status) = case.get("expected_error_status") {
            let err = result.unwrap_err();
            assert_eq!(err.status(), Some(status.as_u64().unwrap() as u16), "{name}: error status");
        } else {
            let resp = result.unwrap();
            assert_eq!(resp, replay.response, "{name}: response passed through");
            assert_eq!(u64::from(resp.status), case["expected_status"].as_u64().unwrap(), "{name}: status");
        }
    }
}
