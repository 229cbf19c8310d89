use crate::{Error, Result};
use meshview_core::{Grid, MeshViewConfig, RequestMode, parse_grid};
use std::fmt;
use std::time::Duration;
use url::Url;

/// What went wrong on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    Connect,
    Status(u16),
    Body,
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timed out"),
            FailureKind::Connect => f.write_str("unable to connect"),
            FailureKind::Status(code) => write!(f, "HTTP status {code}"),
            FailureKind::Body => f.write_str("failed to read body"),
            FailureKind::Other => f.write_str("request failed"),
        }
    }
}

/// Issues the single GET for the grid document.
#[derive(Debug, Clone)]
pub struct GridFetcher {
    client: reqwest::Client,
    url: Url,
    mode: RequestMode,
}

impl GridFetcher {
    pub fn new(config: &MeshViewConfig) -> Result<Self> {
        let url = config.endpoint_url()?;
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| Error::network(&url, FailureKind::Other, error_chain(&e)))?;
        Ok(Self {
            client,
            url,
            mode: config.request_mode,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn request_mode(&self) -> RequestMode {
        self.mode
    }

    /// Fetches the raw response body. Any non-2xx status is a failure.
    pub async fn fetch_text(&self) -> Result<String> {
        if self.mode == RequestMode::NoCors {
            tracing::warn!(
                url = %self.url,
                "request mode is no-cors: a browser would hand back an opaque body; reading it anyway"
            );
        }
        tracing::debug!(url = %self.url, mode = ?self.mode, "GET grid");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() {
                    FailureKind::Timeout
                } else if e.is_connect() {
                    FailureKind::Connect
                } else {
                    FailureKind::Other
                };
                Error::network(&self.url, kind, error_chain(&e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::network(
                &self.url,
                FailureKind::Status(status.as_u16()),
                status.to_string(),
            ));
        }

        response.text().await.map_err(|e| {
            let kind = if e.is_timeout() {
                FailureKind::Timeout
            } else {
                FailureKind::Body
            };
            Error::network(&self.url, kind, error_chain(&e))
        })
    }

    /// Fetches and validates the grid document.
    pub async fn fetch_grid(&self) -> Result<Grid> {
        let body = self.fetch_text().await?;
        tracing::trace!(bytes = body.len(), "grid body received");
        let grid = parse_grid(&body)?;
        tracing::debug!(
            nx = grid.nx,
            ny = grid.ny,
            segments = grid.segments().len(),
            "grid fetched"
        );
        Ok(grid)
    }
}

/// One-shot fetch with a fetcher built from `config`.
pub async fn fetch_grid(config: &MeshViewConfig) -> Result<Grid> {
    GridFetcher::new(config)?.fetch_grid().await
}

/// `reqwest` errors keep the interesting part (e.g. "Connection refused") in their sources.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(s) = source {
        let text = s.to_string();
        if !out.contains(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = s.source();
    }
    out
}
