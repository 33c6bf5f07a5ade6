//! Server discovery: candidate derivation and best-server selection.

use crate::client::JellyfinClient;
use crate::error::{JellyfinError, Result};
use crate::types::{ClientInfo, PublicSystemInfo};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Find the best reachable Jellyfin server for a URL and return a
/// client bound to it.
///
/// A bare host expands to `https://host`, `http://host:8096`, and
/// `http://host` candidates; an explicit `http(s)://` URL stands alone.
/// Each candidate is probed with `GET /System/Info/Public`; among the
/// reachable ones HTTPS wins, then candidate order. Fails with
/// [`JellyfinError::NoServersFound`] when nothing answers.
pub async fn resolve(url: &str) -> Result<JellyfinClient> {
    resolve_with_info(url, ClientInfo::default()).await
}

/// Like [`resolve`], with an explicit client identity.
pub async fn resolve_with_info(url: &str, info: ClientInfo) -> Result<JellyfinClient> {
    let candidates = address_candidates(url)?;

    let probe = Client::builder()
        .timeout(Duration::from_secs(10))
        .connect_timeout(Duration::from_secs(5))
        .user_agent(format!("{}/{}", info.name, info.version))
        .build()
        .map_err(JellyfinError::Request)?;

    // Candidates are already preference-ordered within each scheme, so
    // the winner is the first reachable HTTPS candidate, falling back to
    // the first reachable one of any scheme.
    let mut best: Option<&str> = None;
    let mut best_secure = false;

    for address in &candidates {
        match probe_candidate(&probe, address).await {
            Some(system) => {
                debug!(
                    address = %address,
                    server_name = system.server_name.as_deref().unwrap_or("unknown"),
                    version = system.version.as_deref().unwrap_or("unknown"),
                    "Candidate reachable"
                );

                let secure = address.starts_with("https://");
                if best.is_none() || (secure && !best_secure) {
                    best = Some(address);
                    best_secure = secure;
                }
            }
            None => debug!(address = %address, "Candidate unreachable"),
        }
    }

    match best {
        Some(address) => {
            info!(address = %address, "Selected server");
            JellyfinClient::new(address, info)
        }
        None => Err(JellyfinError::NoServersFound),
    }
}

/// Derive the candidate addresses for an input URL, best-guess first.
fn address_candidates(url: &str) -> Result<Vec<String>> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(JellyfinError::InvalidUrl("URL cannot be empty".into()));
    }

    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        return Ok(vec![trimmed.to_string()]);
    }

    Ok(vec![
        format!("https://{}", trimmed),
        format!("http://{}:8096", trimmed),
        format!("http://{}", trimmed),
    ])
}

/// Probe one candidate. `None` means unreachable or not a Jellyfin server.
async fn probe_candidate(probe: &Client, address: &str) -> Option<PublicSystemInfo> {
    let url = format!("{}/System/Info/Public", address);

    let response = probe.get(&url).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }

    response.json().await.ok()
}
