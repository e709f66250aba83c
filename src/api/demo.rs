//! Offline backend used when the environment is `demo`.
//!
//! Responses have the same shape as the live API and are built from the
//! local file (for uploads) or the share identifier. A short sleep stands
//! in for network latency unless the backend is created with
//! [`DemoBackend::instant`].

use std::io::Cursor;
use std::path::Path;
use std::thread;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::json;

use super::{
    filename_from_disposition, mime_type_for, BlockchainRecord, Download, FileInfo, FileMeta,
    Transaction, UploadResponse,
};
use crate::error::{CliError, CliResult};
use crate::share::ShareRef;

/// Share URLs issued in demo mode start with this.
pub const DEMO_SHARE_PREFIX: &str = "https://valtstorage.cloud/share/V";

const SAMPLE_NAME: &str = "README.md";
const SAMPLE: &str = include_str!("../../README.md");
const EXPIRY_HOURS: i64 = 2;
const DEMO_FILE_SIZE: u64 = 2 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct DemoBackend {
    simulate_latency: bool,
}

impl Default for DemoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoBackend {
    /// Demo backend that pauses like a real request would.
    pub fn new() -> Self {
        Self {
            simulate_latency: true,
        }
    }

    /// Demo backend that answers immediately.
    pub fn instant() -> Self {
        Self {
            simulate_latency: false,
        }
    }

    fn pause(&self, millis: u64) {
        if self.simulate_latency {
            thread::sleep(Duration::from_millis(millis));
        }
    }

    pub fn upload(&self, path: &Path) -> CliResult<UploadResponse> {
        let meta = std::fs::metadata(path).map_err(|_| CliError::FileNotFound(path.to_path_buf()))?;
        self.pause(2000);

        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(UploadResponse {
            success: true,
            share_url: format!("{}{}", DEMO_SHARE_PREFIX, suffix),
            expires_at: Some(expiry()),
            files: vec![FileMeta {
                name,
                size: meta.len(),
                mime_type: mime_type_for(path).to_string(),
            }],
            optimization_level: Some("Lightning Fast".to_string()),
        })
    }

    pub fn download(&self, share: &ShareRef) -> Download {
        self.pause(1500);
        let disposition = format!(
            "attachment; filename=\"valtstorage-{}-{}\"",
            share.id(),
            SAMPLE_NAME
        );
        Download {
            filename: filename_from_disposition(&disposition),
            content_type: Some("application/octet-stream".to_string()),
            body: Box::new(Cursor::new(SAMPLE.as_bytes())),
        }
    }

    pub fn file_info(&self, share: &ShareRef) -> FileInfo {
        self.pause(1000);
        FileInfo {
            share_url: Some(share.share_url()),
            expires_at: Some(expiry()),
            files: vec![FileMeta {
                name: format!("document-{}.pdf", share.id()),
                size: DEMO_FILE_SIZE,
                mime_type: "application/pdf".to_string(),
            }],
        }
    }

    pub fn blockchain_record(&self, share: &ShareRef) -> BlockchainRecord {
        self.pause(1200);
        let now = Utc::now();
        let accessed = now + chrono::Duration::minutes(1);
        let stamp = |t: chrono::DateTime<Utc>| t.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut rng = rand::thread_rng();

        BlockchainRecord {
            record_id: share.id().to_string(),
            file_name: Some("Block data".to_string()),
            file_size: Some(DEMO_FILE_SIZE),
            file_type: Some("application/pdf".to_string()),
            upload_date: Some(stamp(now)),
            expiry_date: Some(expiry()),
            status: Some("active".to_string()),
            download_count: rng.gen_range(0..5),
            transaction_count: rng.gen_range(1..=10),
            is_verified: true,
            expires_in: Some(format!("{} hours", EXPIRY_HOURS)),
            processed_streaming: false,
            optimization_level: Some("Lightning Fast".to_string()),
            transactions: vec![
                Transaction {
                    id: format!("tx_upload_{}", now.timestamp()),
                    transaction_type: "FileUpload".to_string(),
                    timestamp: stamp(now),
                    details: json!({
                        "file_id": share.id(),
                        "file_name": "Block data",
                        "file_size": DEMO_FILE_SIZE,
                        "file_type": "application/pdf",
                        "processed_streaming": false,
                    }),
                    confirmed: true,
                },
                Transaction {
                    id: format!("tx_access_{}", accessed.timestamp()),
                    transaction_type: "AccessAttempt".to_string(),
                    timestamp: stamp(accessed),
                    details: json!({
                        "timestamp": stamp(accessed),
                        "action": "view_info",
                        "client_info": "Access from file info page",
                    }),
                    confirmed: true,
                },
            ],
        }
    }
}

fn expiry() -> String {
    (Utc::now() + chrono::Duration::hours(EXPIRY_HOURS)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_upload_fabricates_share() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Report.PDF");
        std::fs::write(&path, vec![0u8; 1234]).unwrap();

        let res = DemoBackend::instant().upload(&path).unwrap();
        assert!(res.success);
        assert!(res.share_url.starts_with(DEMO_SHARE_PREFIX));
        let id = res.share_url.trim_start_matches(DEMO_SHARE_PREFIX);
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        assert_eq!(
            res.files,
            vec![FileMeta {
                name: "Report.PDF".to_string(),
                size: 1234,
                mime_type: "application/pdf".to_string(),
            }]
        );
        // the share URL must survive our own extraction
        assert!(ShareRef::parse(&res.share_url).is_ok());
    }

    #[test]
    fn test_download_serves_sample() {
        let share = ShareRef::parse("V1A2B3C4D").unwrap();
        let mut download = DemoBackend::instant().download(&share);
        assert_eq!(
            download.filename.as_deref(),
            Some("valtstorage-V1A2B3C4D-README.md")
        );
        let mut body = String::new();
        download.body.read_to_string(&mut body).unwrap();
        assert_eq!(body, SAMPLE);
    }

    #[test]
    fn test_record_mentions_share() {
        let share = ShareRef::parse("V1A2B3C4D").unwrap();
        let record = DemoBackend::instant().blockchain_record(&share);
        assert_eq!(record.record_id, "V1A2B3C4D");
        assert_eq!(record.transactions.len(), 2);
        assert_eq!(record.transactions[0].details["file_id"], "V1A2B3C4D");
        assert!((1..=10).contains(&record.transaction_count));
    }

    #[test]
    fn test_info_names_document() {
        let share = ShareRef::parse("V1A2B3C4D").unwrap();
        let info = DemoBackend::instant().file_info(&share);
        assert_eq!(info.files[0].name, "document-V1A2B3C4D.pdf");
        assert_eq!(info.share_url.as_deref(), Some("https://valtstorage.cloud/share/V1A2B3C4D"));
    }
}
