use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use salonbook_core::catalogue::ServiceCatalogue;
use salonbook_core::quote::config::{PricingConfig, PricingConfigError};
use salonbook_core::{AppConfig, ConfigError, LoadOptions};
use salonbook_notify::{HttpEmailTransport, Notifier, NotifySettings};

use crate::rate_limit::RateLimiter;

/// Everything a request handler needs, cheap to clone per connection.
#[derive(Clone)]
pub struct AppState {
    pub catalogue: Arc<ServiceCatalogue>,
    pub pricing: Arc<PricingConfig>,
    pub rate_limiter: RateLimiter,
    pub notifier: Arc<Notifier>,
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pricing(#[from] PricingConfigError),
    #[error("service catalogue is inconsistent: {0}")]
    Catalogue(String),
    #[error("notify configuration is incomplete: {0}")]
    Notify(String),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let pricing = match &config.pricing.config_path {
        Some(path) => {
            let loaded = PricingConfig::from_path(path)?;
            info!(
                event_name = "system.bootstrap.pricing_loaded",
                correlation_id = "bootstrap",
                path = %path.display(),
                version = %loaded.version,
                "pricing rules loaded from file"
            );
            loaded
        }
        None => PricingConfig::default(),
    };

    let catalogue = ServiceCatalogue::standard();
    let issues = catalogue.integrity_issues();
    if !issues.is_empty() {
        return Err(BootstrapError::Catalogue(issues.join("; ")));
    }

    let notifier = build_notifier(&config)?;

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        notify_transport = notifier.transport_name(),
        pricing_version = %pricing.version,
        rate_limit_max = config.limits.max_requests,
        rate_limit_window_secs = config.limits.window_secs,
        "application bootstrap complete"
    );

    let state = AppState {
        catalogue: Arc::new(catalogue),
        pricing: Arc::new(pricing),
        rate_limiter: RateLimiter::new(&config.limits),
        notifier: Arc::new(notifier),
    };

    Ok(Application { config, state })
}

fn build_notifier(config: &AppConfig) -> Result<Notifier, BootstrapError> {
    let settings = NotifySettings::from(&config.notify);
    if !config.notify.enabled {
        return Ok(Notifier::disabled(settings));
    }

    let (Some(base_url), Some(token)) = (&config.notify.api_base_url, &config.notify.api_token)
    else {
        return Err(BootstrapError::Notify(
            "notify.enabled is set but notify.api_base_url or notify.api_token is missing"
                .to_string(),
        ));
    };

    let transport = HttpEmailTransport::new(
        base_url.clone(),
        token.clone(),
        config.notify.from_address.clone(),
    );
    Ok(Notifier::new(Arc::new(transport), settings))
}
