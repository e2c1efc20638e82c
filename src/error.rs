//! Error types for the release installer
//!
//! Every failure that aborts an install run is one of these variants. The only
//! failure that never surfaces here is translation-layer detection, which
//! degrades to `false` inside [`crate::download::translation`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InstallError {
    /// No release asset exists for the host; raised before any I/O.
    #[error("Unsupported platform: {os} {arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// Non-success status after all redirects were followed.
    #[error("HTTP {status}: {url}")]
    Network { status: u16, url: String },

    #[error("Too many redirects (limit {limit}) while fetching {url}")]
    TooManyRedirects { url: String, limit: usize },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid redirect location {location:?} from {url}")]
    InvalidRedirect { url: String, location: String },

    #[error("Failed to decompress release archive: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("Failed to read zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Executable {name} not found in release archive")]
    ExecutableNotFound { name: String },

    #[error("Failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read package metadata {}: {reason}", .path.display())]
    Metadata { path: PathBuf, reason: String },

    #[error("Failed to load config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}
