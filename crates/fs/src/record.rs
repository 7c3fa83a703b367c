use std::{
    fs::Metadata,
    time::{SystemTime, UNIX_EPOCH},
};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Observed state of one filesystem entry at stat time.
///
/// Built fresh by every stat and never cached. Whatever the OS reports is
/// passed through, so `size` of a directory is platform-defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub exists: bool,
    /// Size in bytes
    pub size: u64,
    /// Platform permission word (`st_mode` on Unix)
    pub mode: u32,
    pub last_modified: DateTime<Utc>,
    pub is_dir: bool,
    /// Base name only, never a full path
    pub name: String,
    /// Immediate children, filled only by `Gmsfs::stat_with_contents`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contents: Vec<FileInfo>,
}

impl FileInfo {
    pub(crate) fn from_metadata(name: String, metadata: &Metadata) -> Self {
        FileInfo {
            exists: true,
            size: metadata.len(),
            mode: mode_of(metadata),
            last_modified: to_utc(metadata.modified().ok()),
            is_dir: metadata.is_dir(),
            name,
            contents: Vec::new(),
        }
    }

    /// Permission bits only, without the file-type bits.
    #[inline]
    pub fn permissions(&self) -> u32 {
        self.mode & 0o7777
    }
}

#[cfg(unix)]
pub(crate) fn mode_of(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;

    metadata.permissions().mode()
}

#[cfg(not(unix))]
pub(crate) fn mode_of(metadata: &Metadata) -> u32 {
    if metadata.permissions().readonly() {
        0o444
    } else {
        0o666
    }
}

// Platforms without an mtime report the epoch.
fn to_utc(t: Option<SystemTime>) -> DateTime<Utc> {
    DateTime::<Utc>::from(t.unwrap_or(UNIX_EPOCH))
}
