//! GitHub release download and executable extraction
//!
//! ## Module Organization
//!
//! - `platform` - Host platform to release asset resolution
//! - `translation` - macOS x86-to-ARM translation detection
//! - `transport` - HTTP GET with manual redirect following
//! - `decompress` - gzip/zlib inflation
//! - `extract` - Tar scanning and zip lookup for the executable
//! - `core` - Install orchestration

pub mod platform;
pub mod translation;
pub mod transport;
pub mod decompress;
pub mod extract;
mod core;

// Re-export public API
pub use self::core::{InstallRequest, install};
pub use platform::{Arch, ArchiveFormat, Os, ReleaseAsset, resolve};
pub use transport::{Fetch, HttpFetcher, RawResponse};
