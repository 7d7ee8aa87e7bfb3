//! Server configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Environment variable holding the bind address
pub const HOST_VAR: &str = "BTC_WALLET_API_HOST";
/// Environment variable holding the listen port
pub const PORT_VAR: &str = "BTC_WALLET_API_PORT";
/// Environment variable holding a comma separated list of allowed CORS origins
pub const CORS_ORIGINS_VAR: &str = "BTC_WALLET_API_CORS_ORIGINS";

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Allowed origins, `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl ApiConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, keeping defaults for missing or unparsable values
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup(HOST_VAR)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(defaults.host);

        let port = lookup(PORT_VAR)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(defaults.port);

        let cors_origins = lookup(CORS_ORIGINS_VAR)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or(defaults.cors_origins);

        Self {
            host,
            port,
            cors_origins,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|origin| origin == "*")
    }
}
