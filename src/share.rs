// Share references
// ----------------
// A share can be given either as the full URL printed after an upload
// (`https://valtstorage.cloud/share/V1A2B3C4D`) or as the bare identifier.
// Everything past this module works with the bare identifier only.

use std::fmt;
use std::str::FromStr;

use crate::error::{CliError, CliResult};

/// Leading character of every identifier issued by the service.
pub const ID_PREFIX: char = 'V';

/// Identifiers are strictly longer than this.
pub const ID_MIN_LEN: usize = 8;

const SHARE_BASE_URL: &str = "https://valtstorage.cloud/share";
const SCAN_BASE_URL: &str = "https://valtstorage.cloud/valt.scan";

/// Reduce a share URL or identifier to the bare identifier.
///
/// Input already in identifier shape is returned as is, so applying this
/// to its own output is a no-op. Returns `None` when nothing usable is left.
pub fn extract_id(input: &str) -> Option<&str> {
    let input = input.trim();
    if is_identifier(input) {
        return Some(input);
    }
    let trimmed = input.strip_suffix('/').unwrap_or(input);
    match trimmed.rsplit('/').next() {
        Some(last) if !last.is_empty() => Some(last),
        _ => None,
    }
}

fn is_identifier(s: &str) -> bool {
    s.starts_with(ID_PREFIX) && s.len() > ID_MIN_LEN && !s.contains('/')
}

/// A validated share identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareRef(String);

impl ShareRef {
    /// Parse a share URL or bare identifier.
    pub fn parse(input: &str) -> CliResult<Self> {
        extract_id(input)
            .map(|id| ShareRef(id.to_string()))
            .ok_or(CliError::InvalidShareRef)
    }

    pub fn id(&self) -> &str {
        &self.0
    }

    /// Public share page for this identifier.
    pub fn share_url(&self) -> String {
        format!("{}/{}", SHARE_BASE_URL, self.0)
    }

    /// Blockchain explorer page for this identifier.
    pub fn scan_url(&self) -> String {
        format!("{}?address={}", SCAN_BASE_URL, self.0)
    }
}

impl FromStr for ShareRef {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ShareRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
