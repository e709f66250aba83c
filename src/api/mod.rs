// API client module: a small blocking HTTP client for the ValtStorage
// public API. In demo mode the same calls are answered locally by
// `demo::DemoBackend` and nothing touches the network.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use reqwest::blocking::{multipart, Client, Response};
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::{CliError, CliResult, Operation};
use crate::share::ShareRef;

pub mod demo;

use demo::DemoBackend;

/// Metadata for one stored file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

/// Response of `POST /upload`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub share_url: String,
    pub expires_at: Option<String>,
    #[serde(default)]
    pub files: Vec<FileMeta>,
    pub optimization_level: Option<String>,
}

/// Response of `GET /get/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileInfo {
    pub share_url: Option<String>,
    pub expires_at: Option<String>,
    #[serde(default)]
    pub files: Vec<FileMeta>,
}

/// One entry in a blockchain record.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Transaction {
    pub id: String,
    pub transaction_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub confirmed: bool,
}

/// Response of `GET /blockchain/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlockchainRecord {
    pub record_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
    pub file_type: Option<String>,
    pub upload_date: Option<String>,
    pub expiry_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub transaction_count: u64,
    #[serde(default)]
    pub is_verified: bool,
    pub expires_in: Option<String>,
    #[serde(default)]
    pub processed_streaming: bool,
    pub optimization_level: Option<String>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A download in progress: the body is read by the caller.
pub struct Download {
    /// Filename suggested by the server, already reduced to a bare name.
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub body: Box<dyn Read + Send>,
}

/// Mime type guessed from the file extension.
pub fn mime_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("txt") => "text/plain",
        Some("doc") | Some("docx") => "application/msword",
        _ => "application/octet-stream",
    }
}

fn disposition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"filename[^;=\n]*=\s*(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#)
            .expect("Invalid Content-Disposition pattern")
    })
}

/// Pull the filename out of a `Content-Disposition` header value.
///
/// Only the last path component is kept so a hostile header cannot
/// point the download outside the target directory.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let caps = disposition_pattern().captures(header)?;
    let raw = caps.get(1).or(caps.get(2)).or(caps.get(3))?.as_str();
    let raw = raw.replace('\\', "/");
    let name = raw.trim().rsplit('/').next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_string())
    }
}

#[derive(Clone)]
enum Backend {
    Live { client: Client, base_url: String },
    Demo(DemoBackend),
}

/// Client for the four remote operations. Each call is attempted once.
#[derive(Clone)]
pub struct ApiClient {
    backend: Backend,
}

impl ApiClient {
    /// Create a client for the effective settings: demo when the
    /// environment is `demo`, otherwise HTTP against `api_base_url()`.
    pub fn from_settings(settings: &Settings) -> CliResult<Self> {
        if settings.is_demo() {
            return Ok(Self::demo(DemoBackend::new()));
        }
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| CliError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            backend: Backend::Live {
                client,
                base_url: settings.api_base_url().trim_end_matches('/').to_string(),
            },
        })
    }

    pub fn demo(backend: DemoBackend) -> Self {
        Self {
            backend: Backend::Demo(backend),
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self.backend, Backend::Demo(_))
    }

    /// Upload a file using multipart/form-data.
    pub fn upload_file(&self, path: &Path) -> CliResult<UploadResponse> {
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.to_path_buf()));
        }
        let (client, base_url) = match &self.backend {
            Backend::Demo(demo) => return demo.upload(path),
            Backend::Live { client, base_url } => (client, base_url),
        };

        let op = Operation::Upload;
        let url = format!("{}/upload", base_url);
        debug!(%url, path = %path.display(), "uploading");

        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let file_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        let part = multipart::Part::reader_with_length(file, len)
            .file_name(file_name)
            .mime_str(mime_type_for(path))
            .map_err(|e| CliError::transport(op, e))?;
        let form = multipart::Form::new().part("file", part);

        let res = client
            .post(&url)
            .multipart(form)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| CliError::transport(op, e))?;
        res.json().map_err(|e| CliError::transport(op, e))
    }

    /// Start downloading the archive behind a share.
    pub fn download_file(&self, share: &ShareRef) -> CliResult<Download> {
        let (client, base_url) = match &self.backend {
            Backend::Demo(demo) => return Ok(demo.download(share)),
            Backend::Live { client, base_url } => (client, base_url),
        };

        let op = Operation::Download;
        let url = format!("{}/download-zip/{}", base_url, share.id());
        debug!(%url, "downloading");

        let res = client
            .get(&url)
            .send()
            .and_then(Response::error_for_status)
            .map_err(|e| CliError::transport(op, e))?;
        let header = |name: HeaderName| {
            res.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let filename = header(CONTENT_DISPOSITION).and_then(|d| filename_from_disposition(&d));
        let content_type = header(CONTENT_TYPE);
        Ok(Download {
            filename,
            content_type,
            body: Box::new(res),
        })
    }

    /// Fetch metadata for a share.
    pub fn file_info(&self, share: &ShareRef) -> CliResult<FileInfo> {
        match &self.backend {
            Backend::Demo(demo) => Ok(demo.file_info(share)),
            Backend::Live { client, base_url } => {
                let url = format!("{}/get/{}", base_url, share.id());
                get_json(client, &url, Operation::FileInfo)
            }
        }
    }

    /// Fetch the blockchain record for a share.
    pub fn blockchain_record(&self, share: &ShareRef) -> CliResult<BlockchainRecord> {
        match &self.backend {
            Backend::Demo(demo) => Ok(demo.blockchain_record(share)),
            Backend::Live { client, base_url } => {
                let url = format!("{}/blockchain/{}", base_url, share.id());
                get_json(client, &url, Operation::BlockchainRecord)
            }
        }
    }
}

fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str, op: Operation) -> CliResult<T> {
    debug!(%url, %op, "requesting");
    client
        .get(url)
        .send()
        .and_then(Response::error_for_status)
        .and_then(Response::json::<T>)
        .map_err(|e| CliError::transport(op, e))
}
