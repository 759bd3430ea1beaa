use serde::Deserialize;
use std::{env, fs, path::PathBuf, time::Duration};

pub const DEFAULT_BIND: &str = "127.0.0.1:5000";
pub const DEFAULT_UNAVAILABLE_DELAY_MS: u64 = 2000;
pub const DEFAULT_LOG_FILTER: &str = "user_registry=info,tower_http=info";

/// Runtime settings for the HTTP service.
///
/// The token allow-list is compiled in and deliberately absent here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address, e.g. `0.0.0.0:5000`
    pub bind: String,
    /// How long `/servicio_no_disponible` stalls before answering
    pub unavailable_delay_ms: u64,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            unavailable_delay_ms: DEFAULT_UNAVAILABLE_DELAY_MS,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServiceConfig {
    pub fn unavailable_delay(&self) -> Duration {
        Duration::from_millis(self.unavailable_delay_ms)
    }

    /// Parse a JSON config document, expanding `${VAR}` references.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let cfg: ServiceConfig = serde_json::from_str(raw)?;
        Ok(cfg.expanded())
    }

    fn expanded(mut self) -> Self {
        self.bind = expand_env_vars(&self.bind);
        self.log_filter = expand_env_vars(&self.log_filter);
        self
    }
}

/// Locate the config file, if any.
///
/// Checked in order: `USER_REGISTRY_CONFIG`, then
/// `$XDG_CONFIG_HOME/user-registry/config.json`, then `./user-registry.json`.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("USER_REGISTRY_CONFIG") {
        return Some(PathBuf::from(p));
    }

    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let candidate = PathBuf::from(xdg).join("user-registry").join("config.json");
        if candidate.exists() {
            return Some(candidate);
        }
    }

    let candidate = PathBuf::from("user-registry.json");
    if candidate.exists() {
        return Some(candidate);
    }

    None
}

/// Load the service config from `path`, or from the resolved location.
///
/// No file at all means defaults; a file that exists but cannot be read or
/// parsed is an error.
pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<ServiceConfig> {
    let Some(path) = path.or_else(resolve_config_path) else {
        return Ok(ServiceConfig::default());
    };

    let raw = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("Could not read config `{}`: {}", path.display(), e))?;
    ServiceConfig::from_json(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid config `{}`: {}", path.display(), e))
}

fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next(); // consume '{'
            let mut name = String::new();
            for c in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
            if let Ok(val) = env::var(&name) {
                out.push_str(&val);
            } else {
                out.push_str("${");
                out.push_str(&name);
                out.push('}');
            }
        } else {
            out.push(ch);
        }
    }

    out
}
