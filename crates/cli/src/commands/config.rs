use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use salonbook_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["SALONBOOK_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["SALONBOOK_SERVER_PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["SALONBOOK_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["SALONBOOK_LOGGING_LEVEL", "SALONBOOK_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["SALONBOOK_LOGGING_FORMAT", "SALONBOOK_LOG_FORMAT"]),
    ));

    lines.push(render_line(
        "limits.window_secs",
        &config.limits.window_secs.to_string(),
        source("limits.window_secs", &["SALONBOOK_LIMITS_WINDOW_SECS"]),
    ));
    lines.push(render_line(
        "limits.max_requests",
        &config.limits.max_requests.to_string(),
        source("limits.max_requests", &["SALONBOOK_LIMITS_MAX_REQUESTS"]),
    ));
    lines.push(render_line(
        "limits.max_tracked_ips",
        &config.limits.max_tracked_ips.to_string(),
        source("limits.max_tracked_ips", &["SALONBOOK_LIMITS_MAX_TRACKED_IPS"]),
    ));

    lines.push(render_line(
        "notify.enabled",
        &config.notify.enabled.to_string(),
        source("notify.enabled", &["SALONBOOK_NOTIFY_ENABLED"]),
    ));
    lines.push(render_line(
        "notify.api_base_url",
        config.notify.api_base_url.as_deref().unwrap_or("<unset>"),
        source("notify.api_base_url", &["SALONBOOK_NOTIFY_API_BASE_URL"]),
    ));

    let api_token = if config.notify.api_token.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "notify.api_token",
        api_token,
        source("notify.api_token", &["SALONBOOK_NOTIFY_API_TOKEN"]),
    ));

    lines.push(render_line(
        "notify.from_address",
        present_or_unset(&config.notify.from_address),
        source("notify.from_address", &["SALONBOOK_NOTIFY_FROM_ADDRESS"]),
    ));
    lines.push(render_line(
        "notify.business_address",
        present_or_unset(&config.notify.business_address),
        source("notify.business_address", &["SALONBOOK_NOTIFY_BUSINESS_ADDRESS"]),
    ));
    lines.push(render_line(
        "notify.send_customer_confirmation",
        &config.notify.send_customer_confirmation.to_string(),
        source(
            "notify.send_customer_confirmation",
            &["SALONBOOK_NOTIFY_SEND_CUSTOMER_CONFIRMATION"],
        ),
    ));
    lines.push(render_line(
        "notify.timeout_secs",
        &config.notify.timeout_secs.to_string(),
        source("notify.timeout_secs", &["SALONBOOK_NOTIFY_TIMEOUT_SECS"]),
    ));

    let pricing_path = config
        .pricing
        .config_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in>".to_string());
    lines.push(render_line(
        "pricing.config_path",
        &pricing_path,
        source("pricing.config_path", &["SALONBOOK_PRICING_CONFIG_PATH"]),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("salonbook.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/salonbook.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    for env_key in env_keys {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

fn present_or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "<unset>"
    } else {
        value
    }
}
