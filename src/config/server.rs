//! Server configuration.

use std::net::{IpAddr, Ipv4Addr};

use serde::Deserialize;

/// Which route sets the server mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceMode {
    /// Exercise tracker and URL shortener side by side.
    #[default]
    All,
    /// Exercise tracker only.
    Tracker,
    /// URL shortener only.
    Shortener,
}

impl ServiceMode {
    /// Whether the exercise tracker routes are mounted.
    #[must_use]
    pub const fn serves_tracker(self) -> bool {
        matches!(self, Self::All | Self::Tracker)
    }

    /// Whether the URL shortener routes are mounted.
    #[must_use]
    pub const fn serves_shortener(self) -> bool {
        matches!(self, Self::All | Self::Shortener)
    }
}

impl std::fmt::Display for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Tracker => write!(f, "tracker"),
            Self::Shortener => write!(f, "shortener"),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Services to expose.
    #[serde(default)]
    pub mode: ServiceMode,
}

const fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

const fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            mode: ServiceMode::default(),
        }
    }
}
