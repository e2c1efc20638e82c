//! Release version lookup from the npm package manifest

use std::path::Path;

use serde::Deserialize;

use crate::error::InstallError;

#[derive(Deserialize)]
struct PackageJson {
    config: Option<PackageConfig>,
}

#[derive(Deserialize)]
struct PackageConfig {
    bin_version: Option<String>,
}

/// Read `config.bin_version` from a `package.json`.
pub fn read_bin_version(path: &Path) -> Result<String, InstallError> {
    let metadata_error = |reason: String| InstallError::Metadata {
        path: path.to_path_buf(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| metadata_error(e.to_string()))?;
    let package: PackageJson = serde_json::from_str(&raw).map_err(|e| metadata_error(e.to_string()))?;

    package
        .config
        .and_then(|c| c.bin_version)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| metadata_error("missing config.bin_version".to_string()))
}
