//! Host public IP discovery
//!
//! Asks an external echo service which address this host is seen from.
//! Used once at startup when no public IP is configured.

use anyhow::Context;
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default echo service; replies with the caller's address as plain text.
pub const DEFAULT_PUBLIC_IP_URL: &str = "https://checkip.amazonaws.com/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch the host's public IPv4 address from `url`.
pub async fn discover_public_ip(url: &str) -> anyhow::Result<Ipv4Addr> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let text = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("failed to reach public IP service {}", url))?
        .error_for_status()
        .with_context(|| format!("public IP service {} returned an error", url))?
        .text()
        .await?;

    let ip = text
        .trim()
        .parse::<Ipv4Addr>()
        .with_context(|| format!("public IP service returned {:?}, not an IPv4 address", text.trim()))?;

    tracing::debug!("public IP detected: {}", ip);
    Ok(ip)
}
