//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) front_end_base: Option<Url>,
    pub(crate) allowed_origins: Vec<String>,
    pub(crate) dev_mode: bool,
}

impl ServerConfig {
    /// Construct a server configuration from explicit values.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            bind_addr,
            front_end_base: None,
            allowed_origins: Vec::new(),
            dev_mode: false,
        }
    }

    /// Load the configuration from the environment.
    ///
    /// Recognised variables:
    /// - `BIND_ADDR` — socket address to listen on (default `0.0.0.0:8080`);
    /// - `SESSION_KEY_FILE` — path to the session signing key material;
    /// - `SESSION_ALLOW_EPHEMERAL=1` — permit a generated key when the file
    ///   is unreadable (always permitted in debug builds);
    /// - `SESSION_COOKIE_SECURE=0` — disable the `Secure` cookie flag;
    /// - `FRONT_END_URL` — absolute base of the front-end deployment;
    /// - `ALLOWED_ORIGINS` — comma-separated origins accepted by the origin
    ///   check in addition to the serving origin;
    /// - `DEV_MODE=1` — unlock the diagnostics endpoints.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when an address or URL fails to parse, or
    /// when the session key is unreadable outside dev settings.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.into())
            .parse()
            .map_err(|e| std::io::Error::other(format!("invalid BIND_ADDR: {e}")))?;

        let key_path =
            env::var("SESSION_KEY_FILE").unwrap_or_else(|_| DEFAULT_SESSION_KEY_FILE.into());
        let key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(e) => {
                let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                    Key::generate()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read session key at {key_path}: {e}"
                    )));
                }
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let front_end_base = match env::var("FRONT_END_URL") {
            Ok(raw) => Some(
                Url::parse(&raw)
                    .map_err(|e| std::io::Error::other(format!("invalid FRONT_END_URL: {e}")))?,
            ),
            Err(_) => None,
        };

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let dev_mode = env::var("DEV_MODE").ok().as_deref() == Some("1");

        Ok(Self {
            key,
            cookie_secure,
            bind_addr,
            front_end_base,
            allowed_origins,
            dev_mode,
        })
    }

    /// Attach the front-end base URL used for absolute join links.
    #[must_use]
    pub fn with_front_end_base(mut self, base: Url) -> Self {
        self.front_end_base = Some(base);
        self
    }

    /// Attach extra origins accepted by the origin check.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    /// Toggle dev mode, unlocking the diagnostics endpoints.
    #[must_use]
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config() -> ServerConfig {
        ServerConfig::new(
            Key::generate(),
            false,
            "127.0.0.1:0".parse().expect("valid address"),
        )
    }

    #[test]
    fn builders_accumulate_settings() {
        let base = Url::parse("https://app.example.org").expect("valid base");
        let config = fixture_config()
            .with_front_end_base(base.clone())
            .with_allowed_origins(vec!["https://app.example.org".to_owned()])
            .with_dev_mode(true);
        assert_eq!(config.front_end_base, Some(base));
        assert_eq!(config.allowed_origins, ["https://app.example.org"]);
        assert!(config.dev_mode);
    }

    #[test]
    fn defaults_leave_optional_settings_empty() {
        let config = fixture_config();
        assert!(config.front_end_base.is_none());
        assert!(config.allowed_origins.is_empty());
        assert!(!config.dev_mode);
    }
}
