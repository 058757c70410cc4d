use std::sync::Arc;

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::rate_limit::RequestLimiter;
use crate::services::ConverterClient;

/// Shared, read-only state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub converter: ConverterClient,
    pub limiter: Arc<RequestLimiter>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let converter = ConverterClient::new(&config.converter_url, config.converter_timeout())?;
        let limiter = Arc::new(RequestLimiter::new(config.max_concurrent_requests));

        Ok(Self {
            config: Arc::new(config),
            converter,
            limiter,
        })
    }
}
