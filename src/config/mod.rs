// Configuration module entry point
// Loads layered configuration and holds the per-process application state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StorageConfig,
    DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT,
};

/// Environment variable prefix, e.g. `GALLERY_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "GALLERY";

impl Config {
    /// Load configuration from the specified file path (without extension)
    ///
    /// Precedence, lowest first: built-in defaults, the config file,
    /// `GALLERY_*` environment variables, then `port_override` from the
    /// command line.
    pub fn load_from(
        config_path: &str,
        port_override: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        Self::load_layers(config_path, environment(), port_override)
    }

    fn load_layers(
        config_path: &str,
        env: config::Environment,
        port_override: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        let mut builder = config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port)?
            .set_default("storage.image_dir", defaults.storage.image_dir)?
            .set_default("storage.template", defaults.storage.template)?
            .set_default("http.server_name", defaults.http.server_name)?
            .set_default("http.max_body_size", defaults.http.max_body_size)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.access_log", defaults.logging.access_log)?
            .set_default("logging.access_log_format", defaults.logging.access_log_format)?
            .set_default("performance.keep_alive_timeout", defaults.performance.keep_alive_timeout)?
            .set_default("performance.read_timeout", defaults.performance.read_timeout)?
            .set_default("performance.write_timeout", defaults.performance.write_timeout)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(env);

        if let Some(port) = port_override {
            builder = builder.set_override("server.port", port)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let port: u16 = self
            .server
            .port
            .parse()
            .map_err(|e| format!("Invalid port '{}': {e}", self.server.port))?;

        format!("{}:{port}", self.server.host)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    pub fn image_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.image_dir)
    }

    pub fn template_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.template)
    }
}

/// `GALLERY_<SECTION>__<KEY>`: one underscore after the prefix, two between
/// section and key so keys like `image_dir` keep theirs
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
