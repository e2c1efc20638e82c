//! Release download over HTTP with manual redirect following
//!
//! The HTTP client is configured to never follow redirects itself so the hop
//! limit and the status classification stay in one place.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use reqwest::header::LOCATION;
use url::Url;

use super::platform::ReleaseAsset;
use crate::config::ReleaseConfig;
use crate::error::InstallError;

/// One HTTP response, redirects not followed
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub status: u16,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

/// A single GET request. Implementations must not follow redirects.
pub trait Fetch {
    fn get(&self, url: &str) -> impl Future<Output = Result<RawResponse, InstallError>> + Send;
}

/// `reqwest`-backed fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &ReleaseConfig) -> Result<Self, InstallError> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> Result<RawResponse, InstallError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Redirect bodies are never used
        let body = if is_redirect(status) && location.is_some() {
            Vec::new()
        } else {
            response.bytes().await?.to_vec()
        };

        Ok(RawResponse { status, location, body })
    }
}

/// `<host>/<org>/<repo>/releases/download/v<version>/<asset><ext>`
pub fn release_url(config: &ReleaseConfig, version: &str, asset: &ReleaseAsset) -> String {
    let version = version.strip_prefix('v').unwrap_or(version);
    format!(
        "{}/{}/{}/releases/download/v{}/{}{}",
        config.host.trim_end_matches('/'),
        config.org,
        config.repo,
        version,
        asset.asset_base_name,
        asset.extension()
    )
}

pub fn is_ok(status: u16) -> bool {
    (200..=204).contains(&status)
}

pub fn is_redirect(status: u16) -> bool {
    matches!(status, 301 | 302 | 303 | 307 | 308)
}

/// GET `url`, following at most `max_redirects` redirects, and return the body.
pub async fn download<F: Fetch>(
    fetcher: &F,
    url: &str,
    max_redirects: usize,
) -> Result<Vec<u8>, InstallError> {
    let mut current = url.to_string();
    let mut hops = 0;

    loop {
        debug!("GET {}", current);
        let response = fetcher.get(&current).await?;

        if is_redirect(response.status) {
            if let Some(location) = response.location.as_deref() {
                if hops == max_redirects {
                    return Err(InstallError::TooManyRedirects {
                        url: url.to_string(),
                        limit: max_redirects,
                    });
                }
                hops += 1;
                let next = resolve_location(&current, location)?;
                debug!("{} redirected to {}", response.status, next);
                current = next;
                continue;
            }
        }

        if !is_ok(response.status) {
            if !response.body.is_empty() {
                debug!(
                    "Error body from {}: {}",
                    current,
                    String::from_utf8_lossy(&response.body)
                );
            }
            return Err(InstallError::Network {
                status: response.status,
                url: current,
            });
        }

        info!("Downloaded {} bytes from {}", response.body.len(), current);
        return Ok(response.body);
    }
}

/// Locations may be relative to the URL that issued them.
fn resolve_location(base: &str, location: &str) -> Result<String, InstallError> {
    let invalid = || InstallError::InvalidRedirect {
        url: base.to_string(),
        location: location.to_string(),
    };
    match Url::parse(location) {
        Ok(absolute) => Ok(absolute.into()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base)
            .and_then(|b| b.join(location))
            .map(Into::into)
            .map_err(|_| invalid()),
        Err(_) => Err(invalid()),
    }
}
