use crate::config::ProbeConfig;
use anyhow::Result;
use futures::future::BoxFuture;
use regex::Regex;
use std::time::Duration;

/// Outcome of one request-and-classify pass against the gate endpoint.
/// Consumed immediately by the gate driver, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success,
    WrongContent,
    HttpError(u16),
    TransportError(String),
}

/// A single connectivity probe. The returned future is run on a background
/// task so the gate driver never blocks on network I/O.
pub trait Probe: Send + Sync + 'static {
    fn check(&self) -> BoxFuture<'static, ProbeResult>;
}

/// Probe backed by a real HTTP client.
pub struct HttpProbe {
    client: reqwest::Client,
    url: String,
    marker: Regex,
}

impl HttpProbe {
    pub fn new(cfg: &ProbeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .timeout(Duration::from_millis(cfg.read_timeout_ms))
            .build()?;

        // Deliberately loose content check: case-insensitive title match,
        // tolerant of surrounding whitespace. No HTML parsing.
        let marker = Regex::new(&format!(
            r"(?i)<title>\s*{}\s*</title>",
            regex::escape(&cfg.marker_title)
        ))?;

        Ok(HttpProbe {
            client,
            url: cfg.url.clone(),
            marker,
        })
    }
}

impl Probe for HttpProbe {
    fn check(&self) -> BoxFuture<'static, ProbeResult> {
        let client = self.client.clone();
        let url = self.url.clone();
        let marker = self.marker.clone();

        Box::pin(async move {
            let response = match client.get(&url).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::error!("probe transport error for {}: {:#}", url, e);
                    return ProbeResult::TransportError(e.to_string());
                }
            };

            let status = response.status().as_u16();
            if status != 200 {
                return ProbeResult::HttpError(status);
            }

            let body = match response.text().await {
                Ok(b) => b,
                Err(e) => {
                    tracing::error!("probe read error for {}: {:#}", url, e);
                    return ProbeResult::TransportError(e.to_string());
                }
            };

            if marker.is_match(&body) {
                ProbeResult::Success
            } else {
                ProbeResult::WrongContent
            }
        })
    }
}
