//! HTTP validation endpoint.
//!
//! Listens on localhost and accepts:
//! - POST /api/compare - shape-check a {original, translated} pair
//!
//! No comparison is computed here; the endpoint only validates the request
//! shape and acknowledges it. It never touches editor state.

use std::io::Read;
use std::thread;

use serde_json::{json, Value};
use tiny_http::{Method, Response, Server};
use tracing::{error, info};

use super::ServiceError;

const MAX_BODY_BYTES: u64 = 2 * 1024 * 1024; // 2 MiB

/// Bind the listener and serve requests on a background thread. Returns
/// once the port is bound; serving continues for the process lifetime.
pub fn spawn(port: u16) -> Result<(), ServiceError> {
    let server =
        Server::http(("127.0.0.1", port)).map_err(|e| ServiceError::Server(e.to_string()))?;
    info!("listening on 127.0.0.1:{}", port);

    thread::spawn(move || {
        for request in server.incoming_requests() {
            handle_request(request);
        }
    });
    Ok(())
}

fn handle_request(mut request: tiny_http::Request) {
    let method = request.method().clone();
    let url = request.url().to_string();

    let (status, body) = if url == "/api/compare" {
        if method == Method::Post {
            let mut raw = String::new();
            match request
                .as_reader()
                .take(MAX_BODY_BYTES)
                .read_to_string(&mut raw)
            {
                Ok(_) => validate_compare(&raw),
                Err(e) => {
                    error!("body read failed: {}", e);
                    (400, json!({ "error": "Unreadable request body" }))
                }
            }
        } else {
            (405, json!({ "error": "Method not allowed" }))
        }
    } else {
        (404, json!({ "error": "Not found" }))
    };

    info!("{} {} -> {}", method, url, status);
    respond_json(request, status, body);
}

/// Shape validation for POST /api/compare. Pure so the matrix is testable
/// without sockets.
pub fn validate_compare(body: &str) -> (u16, Value) {
    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return (400, json!({ "error": "Invalid JSON body" })),
    };

    let original = parsed.get("original");
    let translated = parsed.get("translated");

    if field_missing(original) || field_missing(translated) {
        return (400, json!({ "error": "Missing required files" }));
    }
    if !original.map(Value::is_string).unwrap_or(false)
        || !translated.map(Value::is_string).unwrap_or(false)
    {
        return (400, json!({ "error": "Invalid file content" }));
    }

    (200, json!({ "success": true }))
}

fn field_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

fn respond_json(request: tiny_http::Request, status: u16, body: Value) {
    let mut response = Response::from_string(body.to_string()).with_status_code(status);
    if let Ok(header) =
        tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
    {
        response = response.with_header(header);
    }
    let _ = request.respond(response);
}
