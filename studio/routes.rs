use std::io::Cursor;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::handlers;
use crate::state::SharedState;

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn respond_with(status: u16, content_type: &[u8], body: Vec<u8>) -> Response<Cursor<Vec<u8>>> {
    let len = body.len();
    Response::new(
        StatusCode(status),
        vec![Header::from_bytes(b"Content-Type", content_type).unwrap()],
        Cursor::new(body),
        Some(len),
        None,
    )
}

pub fn html_response(body: String) -> Response<Cursor<Vec<u8>>> {
    respond_with(200, b"text/html; charset=utf-8", body.into_bytes())
}

pub fn json_response(body: String) -> Response<Cursor<Vec<u8>>> {
    respond_with(200, b"application/json", body.into_bytes())
}

pub fn bad_request(message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    respond_with(400, b"application/json", body.into_bytes())
}

pub fn not_found() -> Response<Cursor<Vec<u8>>> {
    respond_with(404, b"text/plain", b"404 Not Found".to_vec())
}

// ---------------------------------------------------------------------------
// Request dispatcher
// ---------------------------------------------------------------------------

/// Dispatches incoming requests to the appropriate handler.
pub fn dispatch(mut request: Request, state: SharedState) {
    let method = request.method().clone();
    let url = request.url().to_owned();
    let path = url.split('?').next().unwrap_or("").to_owned();

    let response = match (method, path.as_str()) {
        (Method::Get, "/") => handlers::draw::handle_get(&state),
        (Method::Post, "/guess") => handlers::guess::handle_points(&mut request, &state),
        (Method::Post, "/guess/image") => handlers::guess::handle_image(&mut request, &state),
        _ => not_found(),
    };

    let _ = request.respond(response);
}
