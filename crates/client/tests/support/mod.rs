//! Shared fixtures: a scripted transport, a counting decryptor and an
//! in-process server speaking the file-drop HTTP API
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use parking_lot::Mutex;
use serde_json::json;
use url::Url;

use common::crypto::{seal, BlobDecryptor, CryptoError, SymmetricKey};
use common::listing::{format_size, FileRecord, EVERYONE};
use drop_client::api::{ApiClient, ApiError};
use drop_client::transfer::{
    DirectorySink, HttpTransport, ProgressReporter, RawResponse, TransferClient, Transport,
    TransportError, UploadForm,
};

/// Ciphertext of "top secret" under `[0x11; 32]` with an all-zero IV.
/// Decrypting it with the built-in key does not yield valid padding.
pub const FOREIGN_CIPHERTEXT_HEX: &str = "6c02ab6c83f4b719111375844c7b7dea";

pub fn foreign_blob() -> Vec<u8> {
    let mut blob = vec![0u8; 16];
    blob.extend(hex::decode(FOREIGN_CIPHERTEXT_HEX).unwrap());
    blob
}

pub fn response(status: u16, body: impl Into<Bytes>) -> RawResponse {
    RawResponse {
        status: reqwest::StatusCode::from_u16(status).unwrap(),
        body: body.into(),
    }
}

/// A transport that replays canned responses and records what it was asked
pub struct MockTransport {
    pub uploads: Mutex<Vec<UploadForm>>,
    pub downloads: Mutex<Vec<String>>,
    upload_reply: Mutex<Option<Result<RawResponse, String>>>,
    download_reply: Mutex<Option<RawResponse>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(vec![]),
            downloads: Mutex::new(vec![]),
            upload_reply: Mutex::new(None),
            download_reply: Mutex::new(None),
            delay: None,
        }
    }

    pub fn upload_reply(self, reply: RawResponse) -> Self {
        *self.upload_reply.lock() = Some(Ok(reply));
        self
    }

    pub fn upload_error(self, message: &str) -> Self {
        *self.upload_reply.lock() = Some(Err(message.to_string()));
        self
    }

    pub fn download_reply(self, reply: RawResponse) -> Self {
        *self.download_reply.lock() = Some(reply);
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.lock().len()
    }

    pub fn download_calls(&self) -> usize {
        self.downloads.lock().len()
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn upload(
        &self,
        form: UploadForm,
        progress: ProgressReporter,
    ) -> Result<RawResponse, TransportError> {
        let total = form.data.len();
        self.uploads.lock().push(form);

        // report in a handful of uneven steps, like a real socket would
        let steps = [total / 7, total / 3, total / 5, total];
        let mut sent = 0;
        for step in steps {
            let next = step.min(total - sent);
            progress.advance(next as u64);
            sent += next;
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .upload_reply
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(response(200, r#"{"message": "ok"}"#)));
        reply.map_err(|e| TransportError::Api(ApiError::Server(e)))
    }

    async fn download(&self, server_file_id: &str) -> Result<RawResponse, TransportError> {
        self.downloads.lock().push(server_file_id.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self
            .download_reply
            .lock()
            .clone()
            .unwrap_or_else(|| response(404, r#"{"error": "File not found"}"#)))
    }
}

/// Wraps a key and counts how often the engine is invoked
pub struct CountingDecryptor {
    key: SymmetricKey,
    calls: AtomicUsize,
}

impl CountingDecryptor {
    pub fn new(key: SymmetricKey) -> Self {
        Self {
            key,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlobDecryptor for CountingDecryptor {
    fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.key.decrypt(blob)
    }
}

/// Build a transfer client over a mock transport saving into `dir`
pub fn mock_client(
    transport: Arc<MockTransport>,
    decryptor: Arc<CountingDecryptor>,
    dir: &std::path::Path,
) -> TransferClient {
    TransferClient::new(transport, decryptor, Arc::new(DirectorySink::new(dir)))
        .with_idle_grace(Duration::ZERO)
}

pub fn dir_entries(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}

// -- in-process file-drop server ------------------------------------------

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub id: String,
    pub original_name: String,
    pub recipient: String,
    pub blob: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub file_name: String,
    pub recipient: Option<String>,
    pub size: usize,
}

#[derive(Default)]
struct Inner {
    files: Vec<StoredFile>,
    ips: Vec<String>,
    uploads: Vec<ReceivedUpload>,
    listing_queries: Vec<HashMap<String, String>>,
    reject_uploads: Option<String>,
    fail_listing: bool,
}

#[derive(Clone)]
pub struct ServerState {
    key: SymmetricKey,
    inner: Arc<Mutex<Inner>>,
}

impl ServerState {
    pub fn set_ips(&self, ips: &[&str]) {
        self.inner.lock().ips = ips.iter().map(|s| s.to_string()).collect();
    }

    pub fn reject_uploads(&self, reason: &str) {
        self.inner.lock().reject_uploads = Some(reason.to_string());
    }

    pub fn fail_listing(&self) {
        self.inner.lock().fail_listing = true;
    }

    /// Store a blob as-is, bypassing encryption
    pub fn insert_blob(&self, id: &str, original_name: &str, blob: Vec<u8>) {
        self.inner.lock().files.push(StoredFile {
            id: id.to_string(),
            original_name: original_name.to_string(),
            recipient: EVERYONE.to_string(),
            blob,
        });
    }

    pub fn files(&self) -> Vec<StoredFile> {
        self.inner.lock().files.clone()
    }

    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.inner.lock().uploads.clone()
    }

    pub fn listing_queries(&self) -> Vec<HashMap<String, String>> {
        self.inner.lock().listing_queries.clone()
    }
}

fn record(file: &StoredFile) -> FileRecord {
    FileRecord {
        name: file.id.clone(),
        original_name: file.original_name.clone(),
        size: file.blob.len() as u64,
        created: 1_700_000_000.0,
        modified: 1_700_000_000.0,
        accessed: 1_700_000_000.0,
        size_fmt: format_size(file.blob.len() as u64),
        created_fmt: "2023-11-14 22:13:20".to_string(),
        modified_fmt: "2023-11-14 22:13:20".to_string(),
    }
}

async fn upload(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut file: Option<(String, Bytes)> = None;
    let mut recipient = None;

    while let Some(field) = multipart.next_field().await.unwrap() {
        match field.name().map(str::to_string).as_deref() {
            Some("file") => {
                let name = field.file_name().unwrap_or("").to_string();
                file = Some((name, field.bytes().await.unwrap()));
            }
            Some("recipient") => recipient = Some(field.text().await.unwrap()),
            _ => {}
        }
    }

    let Some((name, data)) = file else {
        return (StatusCode::BAD_REQUEST, "No file part").into_response();
    };
    if name.is_empty() {
        return (StatusCode::BAD_REQUEST, "No selected file").into_response();
    }

    let mut inner = state.inner.lock();
    inner.uploads.push(ReceivedUpload {
        file_name: name.clone(),
        recipient: recipient.clone(),
        size: data.len(),
    });
    if let Some(reason) = &inner.reject_uploads {
        return Json(json!({ "error": reason })).into_response();
    }

    let stored = StoredFile {
        id: format!("{}_{:08x}.enc", name, inner.files.len() + 1),
        original_name: name,
        recipient: recipient.unwrap_or_else(|| EVERYONE.to_string()),
        blob: seal(&data, &state.key).unwrap(),
    };
    let file_info = record(&stored);
    inner.files.push(stored);

    Json(json!({
        "message": "File uploaded and encrypted successfully!",
        "file": file_info,
    }))
    .into_response()
}

async fn download(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    let inner = state.inner.lock();
    match inner.files.iter().find(|f| f.id == id) {
        Some(file) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/octet-stream")],
            file.blob.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "File not found" })),
        )
            .into_response(),
    }
}

async fn get_files(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut inner = state.inner.lock();
    inner.listing_queries.push(params.clone());
    if inner.fail_listing {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "listing exploded" })),
        )
            .into_response();
    }

    let mut records: Vec<FileRecord> = inner.files.iter().map(record).collect();
    match params.get("sort").map(String::as_str) {
        Some("size") => records.sort_by_key(|r| r.size),
        _ => records.sort_by(|a, b| a.name.cmp(&b.name)),
    }
    if params.get("order").map(String::as_str) == Some("desc") {
        records.reverse();
    }
    Json(records).into_response()
}

async fn get_ips(State(state): State<ServerState>) -> Response {
    Json(state.inner.lock().ips.clone()).into_response()
}

pub struct TestServer {
    pub url: Url,
    pub state: ServerState,
}

impl TestServer {
    pub async fn spawn(key: SymmetricKey) -> Self {
        let state = ServerState {
            key,
            inner: Arc::new(Mutex::new(Inner::default())),
        };
        let app = Router::new()
            .route("/upload", post(upload))
            .route("/download/:id", get(download))
            .route("/get_files", get(get_files))
            .route("/get_ips", get(get_ips))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            state,
        }
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::new(&self.url, Some(Duration::from_secs(10))).unwrap()
    }

    /// A transfer client over real HTTP, decrypting with `key`
    pub fn transfer_client(&self, key: SymmetricKey, dir: &std::path::Path) -> TransferClient {
        TransferClient::new(
            Arc::new(HttpTransport::new(self.api_client())),
            Arc::new(key),
            Arc::new(DirectorySink::new(dir)),
        )
        .with_idle_grace(Duration::ZERO)
    }
}
