//! Install orchestration: resolve, download, extract, place

use std::path::PathBuf;

use log::info;

use super::extract::extract_executable;
use super::platform::resolve;
use super::transport::{Fetch, download, release_url};
use crate::config::ReleaseConfig;
use crate::error::InstallError;
use crate::installer::install_executable;

/// Inputs for one install run
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Release version, with or without a leading `v`
    pub version: String,
    pub os: String,
    pub arch: String,
    /// Result of translation detection; only consulted for darwin/x64
    pub translated: bool,
    /// Directory the asset's destination path is relative to
    pub install_root: PathBuf,
}

/// Download the release for the requested platform and install its
/// executable. Returns the path written.
pub async fn install<F: Fetch>(
    fetcher: &F,
    config: &ReleaseConfig,
    request: &InstallRequest,
) -> Result<PathBuf, InstallError> {
    // Must fail before any network access
    let asset = resolve(&request.os, &request.arch, request.translated)?;
    info!("Selected release asset {} for {} {}", asset.asset_base_name, asset.os, asset.arch);

    let url = release_url(config, &request.version, asset);
    info!("Downloading {}", url);
    let archive = download(fetcher, &url, config.max_redirects).await?;

    info!("Extracting {}", asset.executable_name());
    let executable = extract_executable(&archive, asset)?;

    let destination = request.install_root.join(asset.destination);
    install_executable(&destination, &executable)?;
    info!("Installed {} ({} bytes)", destination.display(), executable.len());

    Ok(destination)
}
