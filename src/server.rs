//! HTTP JSON surface for the assistant
//! Minimal HTTP/1.1 over a tokio listener; the dataset is shared read-only.

use crate::assistant::ChurnAssistant;
use crate::error::Result;
use crate::view::View;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, warn};

const READ_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REQUEST_BYTES: usize = 1_000_000;

#[derive(Debug, Deserialize)]
struct AskRequest {
    query: String,
}

#[derive(Debug, Serialize)]
struct AskResponse<'a> {
    view: Option<&'a View>,
}

/// Bind `addr` and serve until the process exits.
pub async fn serve(assistant: Arc<ChurnAssistant>, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on http://{}", listener.local_addr()?);
    serve_listener(listener, assistant).await
}

pub async fn serve_listener(listener: TcpListener, assistant: Arc<ChurnAssistant>) -> Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("New connection from: {}", addr);
        tokio::spawn(handle_connection(stream, Arc::clone(&assistant)));
    }
}

async fn handle_connection(mut stream: TcpStream, assistant: Arc<ChurnAssistant>) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 8192];

    let read_result = timeout(READ_TIMEOUT, async {
        loop {
            let n = stream.read(&mut chunk).await?;
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
            if request_complete(&buffer) || buffer.len() > MAX_REQUEST_BYTES {
                break;
            }
        }
        Ok::<(), std::io::Error>(())
    })
    .await;

    match read_result {
        Err(_) => {
            warn!("Request read timeout");
            return;
        }
        Ok(Err(e)) => {
            error!("Failed to read from stream: {}", e);
            return;
        }
        Ok(Ok(())) => {}
    }

    if buffer.is_empty() {
        return;
    }

    let response = match String::from_utf8(buffer) {
        Ok(request) => handle_request(&assistant, &request),
        Err(_) => create_response(400, "Bad Request", &json!({"error": "request is not UTF-8"}).to_string()),
    };

    if let Err(e) = stream.write_all(response.as_bytes()).await {
        error!("Failed to write response: {}", e);
    }
}

/// Headers received and, if a Content-Length was sent, the whole body too.
fn request_complete(buffer: &[u8]) -> bool {
    let text = String::from_utf8_lossy(buffer);
    match text.find("\r\n\r\n") {
        Some(headers_end) => match extract_content_length(&text) {
            Some(length) => buffer.len() >= headers_end + 4 + length,
            None => true,
        },
        None => false,
    }
}

fn extract_content_length(request: &str) -> Option<usize> {
    request
        .lines()
        .take_while(|line| !line.is_empty())
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            if key.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
}

/// Route one raw HTTP request to a full HTTP response.
pub fn handle_request(assistant: &ChurnAssistant, request: &str) -> String {
    let mut parts = request.lines().next().unwrap_or_default().split_whitespace();
    let (method, raw_path) = match (parts.next(), parts.next()) {
        (Some(method), Some(path)) => (method, path),
        _ => return create_response(400, "Bad Request", "{}"),
    };

    let path = raw_path.split('?').next().unwrap_or(raw_path);
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    let body = request
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or_default();

    debug!("Request: {} {}", method, path);

    match (method, path) {
        ("OPTIONS", _) => create_response(200, "OK", "{}"),
        ("GET", "/api/health") => {
            let dataset = assistant.dataset();
            let payload = json!({
                "status": "ok",
                "rows": dataset.height(),
                "columns": dataset.column_names(),
            });
            create_response(200, "OK", &payload.to_string())
        }
        ("GET", "/api/questions") => {
            let payload = json!({ "questions": ChurnAssistant::sample_questions() });
            create_response(200, "OK", &payload.to_string())
        }
        ("POST", "/api/ask") => handle_ask(assistant, body),
        _ => create_response(404, "Not Found", &json!({"error": "not found"}).to_string()),
    }
}

fn handle_ask(assistant: &ChurnAssistant, body: &str) -> String {
    let request: AskRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(e) => {
            return create_response(
                400,
                "Bad Request",
                &json!({ "error": format!("invalid request body: {}", e) }).to_string(),
            )
        }
    };

    match assistant.ask(&request.query) {
        Ok(view) => match serde_json::to_string(&AskResponse { view: view.as_ref() }) {
            Ok(payload) => create_response(200, "OK", &payload),
            Err(e) => create_response(
                500,
                "Internal Server Error",
                &json!({ "error": e.to_string() }).to_string(),
            ),
        },
        Err(e) => {
            error!("Query {:?} failed: {}", request.query, e);
            create_response(
                500,
                "Internal Server Error",
                &json!({ "error": e.to_string() }).to_string(),
            )
        }
    }
}

fn create_response(status: u16, status_text: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\n\
         Content-Type: application/json\r\n\
         Access-Control-Allow-Origin: *\r\n\
         Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n\
         Access-Control-Allow-Headers: Content-Type\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {}",
        status,
        status_text,
        body.len(),
        body
    )
}
