use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub limits: LimitsConfig,
    pub notify: NotifyConfig,
    pub pricing: PricingSourceConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Per-IP submission limits for the public endpoints.
#[derive(Clone, Debug)]
pub struct LimitsConfig {
    pub window_secs: u64,
    pub max_requests: u32,
    pub max_tracked_ips: usize,
}

/// Outbound email settings. Disabled by default so a fresh checkout quotes
/// without any credentials.
#[derive(Clone, Debug)]
pub struct NotifyConfig {
    pub enabled: bool,
    pub api_base_url: Option<String>,
    pub api_token: Option<SecretString>,
    pub from_address: String,
    pub business_address: String,
    pub send_customer_confirmation: bool,
    pub timeout_secs: u64,
}

/// Where the pricing ruleset comes from. `None` means the built-in defaults.
#[derive(Clone, Debug)]
pub struct PricingSourceConfig {
    pub config_path: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub pricing_config_path: Option<PathBuf>,
    pub notify_enabled: Option<bool>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8080,
                graceful_shutdown_secs: 20,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
            limits: LimitsConfig { window_secs: 60, max_requests: 5, max_tracked_ips: 4096 },
            notify: NotifyConfig {
                enabled: false,
                api_base_url: None,
                api_token: None,
                from_address: String::new(),
                business_address: String::new(),
                send_customer_confirmation: true,
                timeout_secs: 10,
            },
            pricing: PricingSourceConfig { config_path: None },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("salonbook.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        if let Some(limits) = patch.limits {
            if let Some(window_secs) = limits.window_secs {
                self.limits.window_secs = window_secs;
            }
            if let Some(max_requests) = limits.max_requests {
                self.limits.max_requests = max_requests;
            }
            if let Some(max_tracked_ips) = limits.max_tracked_ips {
                self.limits.max_tracked_ips = max_tracked_ips;
            }
        }

        if let Some(notify) = patch.notify {
            if let Some(enabled) = notify.enabled {
                self.notify.enabled = enabled;
            }
            if let Some(api_base_url) = notify.api_base_url {
                self.notify.api_base_url = Some(api_base_url);
            }
            if let Some(api_token_value) = notify.api_token {
                self.notify.api_token = Some(secret_value(api_token_value));
            }
            if let Some(from_address) = notify.from_address {
                self.notify.from_address = from_address;
            }
            if let Some(business_address) = notify.business_address {
                self.notify.business_address = business_address;
            }
            if let Some(send_customer_confirmation) = notify.send_customer_confirmation {
                self.notify.send_customer_confirmation = send_customer_confirmation;
            }
            if let Some(timeout_secs) = notify.timeout_secs {
                self.notify.timeout_secs = timeout_secs;
            }
        }

        if let Some(pricing) = patch.pricing {
            if let Some(config_path) = pricing.config_path {
                self.pricing.config_path = Some(config_path);
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SALONBOOK_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SALONBOOK_SERVER_PORT") {
            self.server.port = parse_u16("SALONBOOK_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SALONBOOK_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SALONBOOK_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("SALONBOOK_LIMITS_WINDOW_SECS") {
            self.limits.window_secs = parse_u64("SALONBOOK_LIMITS_WINDOW_SECS", &value)?;
        }
        if let Some(value) = read_env("SALONBOOK_LIMITS_MAX_REQUESTS") {
            self.limits.max_requests = parse_u32("SALONBOOK_LIMITS_MAX_REQUESTS", &value)?;
        }
        if let Some(value) = read_env("SALONBOOK_LIMITS_MAX_TRACKED_IPS") {
            self.limits.max_tracked_ips = parse_usize("SALONBOOK_LIMITS_MAX_TRACKED_IPS", &value)?;
        }

        if let Some(value) = read_env("SALONBOOK_NOTIFY_ENABLED") {
            self.notify.enabled = parse_bool("SALONBOOK_NOTIFY_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_API_BASE_URL") {
            self.notify.api_base_url = Some(value);
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_API_TOKEN") {
            self.notify.api_token = Some(secret_value(value));
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_FROM_ADDRESS") {
            self.notify.from_address = value;
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_BUSINESS_ADDRESS") {
            self.notify.business_address = value;
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_SEND_CUSTOMER_CONFIRMATION") {
            self.notify.send_customer_confirmation =
                parse_bool("SALONBOOK_NOTIFY_SEND_CUSTOMER_CONFIRMATION", &value)?;
        }
        if let Some(value) = read_env("SALONBOOK_NOTIFY_TIMEOUT_SECS") {
            self.notify.timeout_secs = parse_u64("SALONBOOK_NOTIFY_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("SALONBOOK_PRICING_CONFIG_PATH") {
            self.pricing.config_path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("SALONBOOK_LOGGING_LEVEL").or_else(|| read_env("SALONBOOK_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SALONBOOK_LOGGING_FORMAT").or_else(|| read_env("SALONBOOK_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(bind_address) = overrides.bind_address {
            self.server.bind_address = bind_address;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(pricing_config_path) = overrides.pricing_config_path {
            self.pricing.config_path = Some(pricing_config_path);
        }
        if let Some(notify_enabled) = overrides.notify_enabled {
            self.notify.enabled = notify_enabled;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        validate_limits(&self.limits)?;
        validate_notify(&self.notify)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("salonbook.toml"), PathBuf::from("config/salonbook.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }

    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn validate_limits(limits: &LimitsConfig) -> Result<(), ConfigError> {
    if limits.window_secs == 0 || limits.window_secs > 3600 {
        return Err(ConfigError::Validation(
            "limits.window_secs must be in range 1..=3600".to_string(),
        ));
    }

    if limits.max_requests == 0 {
        return Err(ConfigError::Validation(
            "limits.max_requests must be greater than zero".to_string(),
        ));
    }

    if limits.max_tracked_ips == 0 {
        return Err(ConfigError::Validation(
            "limits.max_tracked_ips must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_notify(notify: &NotifyConfig) -> Result<(), ConfigError> {
    if let Some(base_url) = &notify.api_base_url {
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::Validation(
                "notify.api_base_url must start with http:// or https://".to_string(),
            ));
        }
    }

    if notify.timeout_secs == 0 || notify.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "notify.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    if !notify.enabled {
        return Ok(());
    }

    if notify.api_base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true) {
        return Err(ConfigError::Validation(
            "notify.api_base_url is required when notify.enabled is true".to_string(),
        ));
    }

    let token_missing = notify
        .api_token
        .as_ref()
        .map(|value| value.expose_secret().trim().is_empty())
        .unwrap_or(true);
    if token_missing {
        return Err(ConfigError::Validation(
            "notify.api_token is required when notify.enabled is true".to_string(),
        ));
    }

    if !notify.from_address.contains('@') {
        return Err(ConfigError::Validation(
            "notify.from_address must be an email address".to_string(),
        ));
    }

    if !notify.business_address.contains('@') {
        return Err(ConfigError::Validation(
            "notify.business_address must be an email address".to_string(),
        ));
    }

    Ok(())
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
    limits: Option<LimitsPatch>,
    notify: Option<NotifyPatch>,
    pricing: Option<PricingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[derive(Debug, Default, Deserialize)]
struct LimitsPatch {
    window_secs: Option<u64>,
    max_requests: Option<u32>,
    max_tracked_ips: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct NotifyPatch {
    enabled: Option<bool>,
    api_base_url: Option<String>,
    api_token: Option<String>,
    from_address: Option<String>,
    business_address: Option<String>,
    send_customer_confirmation: Option<bool>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PricingPatch {
    config_path: Option<PathBuf>,
}
