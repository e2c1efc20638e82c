mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use new_dockerfile_install::download::platform::needs_translation_check;
use new_dockerfile_install::download::translation;
use new_dockerfile_install::{HttpFetcher, InstallRequest, ReleaseConfig, install, metadata};

fn main() {
    env_logger::Builder::new()
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                buf.timestamp_millis(),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(real_main()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

async fn real_main() -> Result<()> {
    let args = cli::Args::parse();

    let config = match &args.config {
        Some(path) => ReleaseConfig::load(path)?,
        None => ReleaseConfig::default(),
    };

    let version = match args.version_tag {
        Some(v) => v,
        None => metadata::read_bin_version(&args.package_json)?,
    };

    let os = args.os.unwrap_or_else(|| std::env::consts::OS.to_string());
    let arch = args.arch.unwrap_or_else(|| std::env::consts::ARCH.to_string());
    let translated = !args.no_translation_check
        && needs_translation_check(&os, &arch)
        && translation::is_translated();

    let request = InstallRequest {
        version,
        os,
        arch,
        translated,
        install_root: args.root,
    };

    let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
    let path = install(&fetcher, &config, &request)
        .await
        .with_context(|| format!("Failed to install new-dockerfile v{}", request.version))?;

    info!("new-dockerfile installed at {}", path.display());
    Ok(())
}
