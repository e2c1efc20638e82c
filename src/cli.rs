use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Download and install the new-dockerfile binary")]
pub struct Args {
    /// Release version to install (defaults to config.bin_version in package.json)
    #[arg(long = "version-tag", value_name = "VERSION")]
    pub version_tag: Option<String>,

    /// Package manifest holding the release version
    #[arg(long, default_value = "package.json")]
    pub package_json: PathBuf,

    /// Path to a TOML file overriding release host/org/repo
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory the executable is installed under (as bin/<name>)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Target OS instead of the host (darwin, linux, windows)
    #[arg(long)]
    pub os: Option<String>,

    /// Target architecture instead of the host (x64, arm64)
    #[arg(long)]
    pub arch: Option<String>,

    /// Skip the macOS translation check and install the requested architecture
    #[arg(long)]
    pub no_translation_check: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::parse_from(["new-dockerfile-install"]);
        assert_eq!(args.package_json, PathBuf::from("package.json"));
        assert_eq!(args.root, PathBuf::from("."));
        assert!(args.version_tag.is_none());
        assert!(!args.no_translation_check);
    }

    #[test]
    fn explicit_target() {
        let args = Args::parse_from([
            "new-dockerfile-install",
            "--version-tag",
            "0.6.2",
            "--os",
            "windows",
            "--arch",
            "arm64",
            "-c",
            "release.toml",
        ]);
        assert_eq!(args.version_tag.as_deref(), Some("0.6.2"));
        assert_eq!(args.os.as_deref(), Some("windows"));
        assert_eq!(args.arch.as_deref(), Some("arm64"));
        assert_eq!(args.config, Some(PathBuf::from("release.toml")));
    }
}
