use std::net::SocketAddr;

use serde::Deserialize;
use visitlens_core::error::{Result, VisitLensError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            telemetry: TelemetrySection::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VisitLensError::UnsupportedVersion);
        }
        self.server.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            VisitLensError::BadRequest(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }
}

/// Where finished request spans are written, besides the `/traces` ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanExporterKind {
    /// `[OTEL]` lines on stdout.
    #[default]
    Console,
    /// Structured `tracing` events.
    Tracing,
    None,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetrySection {
    #[serde(default)]
    pub span_exporter: SpanExporterKind,

    /// Capacity of the recent-spans ring served by `/traces`.
    #[serde(default = "default_recent_spans")]
    pub recent_spans: usize,
}

impl Default for TelemetrySection {
    fn default() -> Self {
        Self {
            span_exporter: SpanExporterKind::default(),
            recent_spans: default_recent_spans(),
        }
    }
}

impl TelemetrySection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=10_000).contains(&self.recent_spans) {
            return Err(VisitLensError::BadRequest(
                "telemetry.recent_spans must be between 1 and 10000".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_recent_spans() -> usize {
    64
}
