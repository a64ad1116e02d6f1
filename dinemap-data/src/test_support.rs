//! A loopback HTTP server answering with canned JSON.
//!
//! Provider tests point the real reqwest clients at [`CannedServer`] so the
//! full request path (URL building, status handling, decoding) runs without
//! touching the network.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

const MAX_REQUEST_BYTES: usize = 16 * 1024;

/// One canned answer, matched by request path prefix.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    path_prefix: String,
    status: u16,
    body: String,
}

impl CannedResponse {
    /// Answer requests whose path starts with `path_prefix` with `200 OK`.
    #[must_use]
    pub fn json(path_prefix: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
            status: 200,
            body: body.into(),
        }
    }

    /// Answer with `status` instead of `200 OK`.
    #[must_use]
    pub const fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }
}

type Shared<T> = Arc<Mutex<T>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loopback server bound to an ephemeral port.
///
/// Unmatched paths receive `404` with an empty JSON object. The accept loop
/// runs on the runtime that started the server and stops when the server is
/// dropped.
#[derive(Debug)]
pub struct CannedServer {
    addr: SocketAddr,
    requests: Shared<Vec<String>>,
    accept_loop: JoinHandle<()>,
}

impl CannedServer {
    /// Bind to `127.0.0.1:0` and start answering with `responses`.
    ///
    /// # Errors
    ///
    /// Returns an error when the listener cannot be bound.
    pub async fn start(responses: Vec<CannedResponse>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let requests: Shared<Vec<String>> = Arc::default();
        let recorded = Arc::clone(&requests);
        let routes = Arc::new(responses);
        let accept_loop = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded_for_conn = Arc::clone(&recorded);
                let routes_for_conn = Arc::clone(&routes);
                tokio::spawn(async move {
                    if let Err(err) = serve(stream, &routes_for_conn, &recorded_for_conn).await {
                        log::debug!("canned connection failed: {err}");
                    }
                });
            }
        });
        Ok(Self {
            addr,
            requests,
            accept_loop,
        })
    }

    /// Base URL of the server, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request targets (path and query) received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        self.accept_loop.abort();
    }
}

async fn serve(
    mut stream: TcpStream,
    responses: &[CannedResponse],
    requests: &Mutex<Vec<String>>,
) -> std::io::Result<()> {
    let head = read_head(&mut stream).await?;
    let target = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_owned();
    lock(requests).push(target.clone());

    let path = target.split('?').next().unwrap_or_default();
    let (status, body) = responses
        .iter()
        .find(|response| path.starts_with(&response.path_prefix))
        .map_or((404, "{}"), |response| {
            (response.status, response.body.as_str())
        });
    let reply = format!(
        "HTTP/1.1 {status} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
        reason(status),
        body.len()
    );
    stream.write_all(reply.as_bytes()).await?;
    stream.shutdown().await
}

async fn read_head(stream: &mut TcpStream) -> std::io::Result<String> {
    let mut head = Vec::new();
    let mut chunk = [0_u8; 1024];
    while !head.windows(4).any(|window| window == b"\r\n\r\n") && head.len() < MAX_REQUEST_BYTES {
        let read = stream.read(&mut chunk).await?;
        let Some(bytes) = chunk.get(..read) else {
            break;
        };
        if bytes.is_empty() {
            break;
        }
        head.extend_from_slice(bytes);
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
