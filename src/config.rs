use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;
use url::Url;

use crate::error::PestError;
use crate::inference::preprocess::InputScaling;
use crate::service::password::PasswordScheme;

/// Runtime config file merged over the built-in defaults when present.
pub const CONFIG_FILE: &str = "config.toml";

/// Prefix for environment overrides, e.g. `PEST_BASIC__LISTEN_ADDR`.
pub const ENV_PREFIX: &str = "PEST_";

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::load().unwrap_or_else(|e| panic!("FATAL: invalid configuration: {e}"))
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub basic: BasicConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Master secret for the encrypted session cookie; at least 32 bytes.
    pub cookie_secret: Option<String>,
    /// Drop the `Secure` attribute so sessions work over plain HTTP.
    pub insecure_cookie: bool,
    pub max_upload_bytes: usize,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            database_url: "sqlite:users.db".to_string(),
            loglevel: "info".to_string(),
            cookie_secret: None,
            insecure_cookie: false,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountsConfig {
    pub password_scheme: PasswordScheme,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            password_scheme: PasswordScheme::Sha256,
        }
    }
}

/// What the final layer of the network emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelOutput {
    #[default]
    Probabilities,
    Logits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Fetched once when `path` does not exist yet.
    pub download_url: Option<Url>,
    pub download_timeout_secs: u64,
    pub input_size: u32,
    pub input_scaling: InputScaling,
    pub output: ModelOutput,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.onnx"),
            download_url: None,
            download_timeout_secs: 300,
            input_size: 380,
            input_scaling: InputScaling::Raw,
            output: ModelOutput::Probabilities,
        }
    }
}

impl Config {
    /// Defaults, then `config.toml`, then `PEST_*` environment variables.
    pub fn load() -> Result<Self, PestError> {
        Self::figment().extract().map_err(PestError::from)
    }

    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn cookie_secret_redacted(&self) -> &'static str {
        if self.basic.cookie_secret.is_some() {
            "<set>"
        } else {
            "<generated>"
        }
    }
}
