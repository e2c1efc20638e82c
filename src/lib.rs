//! new-dockerfile release installer
//!
//! Downloads the `new-dockerfile` release archive for the host platform,
//! pulls the executable out of it and writes it to `bin/` with the
//! executable bit set.

pub mod config;
pub mod download;
pub mod error;
pub mod installer;
pub mod metadata;

pub use config::ReleaseConfig;
pub use download::{HttpFetcher, InstallRequest, install};
pub use error::InstallError;
