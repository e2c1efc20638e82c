//! Platform resolution against the static release asset table

use log::debug;
use std::fmt;

use crate::error::InstallError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    Darwin,
    Linux,
    Windows,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X64,
    Arm64,
}

/// Container format of a release asset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    TarGz,
    Zip,
}

impl Os {
    /// Accepts both `std::env::consts::OS` values and Node-style names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "macos" | "darwin" => Some(Os::Darwin),
            "linux" => Some(Os::Linux),
            "windows" | "win32" => Some(Os::Windows),
            _ => None,
        }
    }
}

impl Arch {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "x86_64" | "x64" | "amd64" => Some(Arch::X64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Os::Darwin => "darwin",
            Os::Linux => "linux",
            Os::Windows => "windows",
        })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arch::X64 => "x64",
            Arch::Arm64 => "arm64",
        })
    }
}

/// One downloadable release archive and where its executable is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub os: Os,
    pub arch: Arch,
    pub asset_base_name: &'static str,
    /// Relative to the install root.
    pub destination: &'static str,
}

impl ReleaseAsset {
    pub fn archive_format(&self) -> ArchiveFormat {
        match self.os {
            Os::Windows => ArchiveFormat::Zip,
            Os::Darwin | Os::Linux => ArchiveFormat::TarGz,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self.archive_format() {
            ArchiveFormat::Zip => ".zip",
            ArchiveFormat::TarGz => ".tar.gz",
        }
    }

    /// File name of the installed executable, also the entry name looked up
    /// inside the archive.
    pub fn executable_name(&self) -> &'static str {
        self.destination
            .rsplit('/')
            .next()
            .unwrap_or(self.destination)
    }
}

/// Every platform a release is published for. Supporting a new platform
/// means adding a row here.
pub static RELEASE_ASSETS: &[ReleaseAsset] = &[
    ReleaseAsset {
        os: Os::Darwin,
        arch: Arch::X64,
        asset_base_name: "new-dockerfile-darwin-x86_64",
        destination: "bin/new-dockerfile",
    },
    ReleaseAsset {
        os: Os::Darwin,
        arch: Arch::Arm64,
        asset_base_name: "new-dockerfile-darwin-arm64",
        destination: "bin/new-dockerfile",
    },
    ReleaseAsset {
        os: Os::Linux,
        arch: Arch::X64,
        asset_base_name: "new-dockerfile-linux-x86_64",
        destination: "bin/new-dockerfile",
    },
    ReleaseAsset {
        os: Os::Linux,
        arch: Arch::Arm64,
        asset_base_name: "new-dockerfile-linux-arm64",
        destination: "bin/new-dockerfile",
    },
    ReleaseAsset {
        os: Os::Windows,
        arch: Arch::X64,
        asset_base_name: "new-dockerfile-windows-x86_64",
        destination: "bin/new-dockerfile.exe",
    },
    ReleaseAsset {
        os: Os::Windows,
        arch: Arch::Arm64,
        asset_base_name: "new-dockerfile-windows-arm64",
        destination: "bin/new-dockerfile.exe",
    },
];

/// Resolve the release asset for the given host identifiers.
///
/// `translated` only matters for darwin/x64: a process running under the
/// x86-to-ARM translation layer gets the native arm64 build instead.
pub fn resolve(os: &str, arch: &str, translated: bool) -> Result<&'static ReleaseAsset, InstallError> {
    let unsupported = || InstallError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    };

    let parsed_os = Os::parse(os).ok_or_else(unsupported)?;
    let mut parsed_arch = Arch::parse(arch).ok_or_else(unsupported)?;

    if parsed_os == Os::Darwin && parsed_arch == Arch::X64 && translated {
        debug!("Running under translation, selecting arm64 build");
        parsed_arch = Arch::Arm64;
    }

    RELEASE_ASSETS
        .iter()
        .find(|asset| asset.os == parsed_os && asset.arch == parsed_arch)
        .ok_or_else(unsupported)
}

/// The translation query is only meaningful for x64 processes on macOS.
pub fn needs_translation_check(os: &str, arch: &str) -> bool {
    Os::parse(os) == Some(Os::Darwin) && Arch::parse(arch) == Some(Arch::X64)
}
