/// Server listen configuration, read from the environment.

/// Environment-derived HTTP/WebSocket listen settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to bind.
    pub port: u16,
    /// Value for the Access-Control-Allow-Origin handshake header.
    pub allowed_origin: String,
}

impl ServerConfig {
    /// Build a config from `HOST`, `PORT`, and `ALLOWED_ORIGIN`,
    /// falling back to defaults when unset or unparsable.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);
        let allowed_origin = std::env::var("ALLOWED_ORIGIN").unwrap_or_else(|_| "*".to_string());
        Self {
            host,
            port,
            allowed_origin,
        }
    }
}
