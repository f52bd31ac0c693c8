use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Server configuration, loaded from environment variables (with a `config`-file
/// override available for local dev) via [`ServerConfig::load`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_body_size_kb")]
    pub max_body_size_kb: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default = "default_embed_mode")]
    pub embed_mode: String,
    #[serde(default = "default_embed_model")]
    pub embed_model: String,

    #[serde(default = "default_lowconf_topsim")]
    pub lowconf_topsim: f32,
    #[serde(default = "default_lowconf_softmax")]
    pub lowconf_softmax: f32,

    #[serde(default)]
    pub enable_translation: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_reindex_timeout_secs")]
    pub reindex_timeout_secs: u64,

    /// Shared secret required on admin endpoints via `x-admin-token` or `?token=`.
    /// When unset, admin endpoints are open — intended for local development only.
    #[serde(default)]
    pub admin_token: Option<String>,

    #[serde(default = "default_rate_limit_search")]
    pub rate_limit_search_per_minute: u32,
    #[serde(default = "default_rate_limit_admin")]
    pub rate_limit_admin_per_minute: u32,

    #[serde(default = "default_audit_dir")]
    pub audit_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: default_bind_addr(),
            port: default_port(),
            request_timeout_secs: default_timeout_secs(),
            max_body_size_kb: default_max_body_size_kb(),
            log_level: default_log_level(),
            catalog_path: default_catalog_path(),
            embed_mode: default_embed_mode(),
            embed_model: default_embed_model(),
            lowconf_topsim: default_lowconf_topsim(),
            lowconf_softmax: default_lowconf_softmax(),
            enable_translation: false,
            cors_origins: Vec::new(),
            reindex_timeout_secs: default_reindex_timeout_secs(),
            admin_token: None,
            rate_limit_search_per_minute: default_rate_limit_search(),
            rate_limit_admin_per_minute: default_rate_limit_admin(),
            audit_dir: default_audit_dir(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a `server.toml`/`server.yaml` file if present, then
    /// environment variables prefixed `OCCUSEARCH__` (double underscore as the nested
    /// separator), mirroring the teacher's `config` crate usage.
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();
        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(config::Environment::with_prefix("OCCUSEARCH").separator("__"));

        let cfg: ServerConfig = builder.build()?.try_deserialize()?;
        Ok(cfg)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.bind_addr, self.port).parse()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reindex_timeout(&self) -> Duration {
        Duration::from_secs(self.reindex_timeout_secs)
    }

    pub fn max_body_size_bytes(&self) -> usize {
        self.max_body_size_kb * 1024
    }

    pub fn embed_config(&self) -> embed::EmbedConfig {
        embed::EmbedConfig {
            mode: self.embed_mode.clone(),
            model_name: self.embed_model.clone(),
            ..embed::EmbedConfig::default()
        }
    }

    pub fn rescue_config(&self) -> rescue::RescueConfig {
        rescue::RescueConfig {
            lowconf_topsim: self.lowconf_topsim,
            lowconf_softmax: self.lowconf_softmax,
            ..rescue::RescueConfig::default()
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_body_size_kb() -> usize {
    10
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_catalog_path() -> String {
    "./data/nco_data.json".to_string()
}
fn default_embed_mode() -> String {
    "onnx".to_string()
}
fn default_embed_model() -> String {
    "intfloat/multilingual-e5-small".to_string()
}
fn default_lowconf_topsim() -> f32 {
    0.48
}
fn default_lowconf_softmax() -> f32 {
    0.55
}
fn default_reindex_timeout_secs() -> u64 {
    300
}
fn default_rate_limit_search() -> u32 {
    60
}
fn default_rate_limit_admin() -> u32 {
    20
}
fn default_audit_dir() -> String {
    "./logs".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_thresholds() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.lowconf_topsim, 0.48);
        assert_eq!(cfg.lowconf_softmax, 0.55);
        assert_eq!(cfg.reindex_timeout_secs, 300);
        assert_eq!(cfg.rate_limit_search_per_minute, 60);
        assert_eq!(cfg.rate_limit_admin_per_minute, 20);
        assert!(cfg.admin_token.is_none());
    }

    #[test]
    fn socket_addr_parses_from_bind_and_port() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }
}
