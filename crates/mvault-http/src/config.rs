//! Gateway configuration.

use std::time::Duration;

use mvault_core::BaseUrl;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for the HTTP transport underneath a gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Timeout applied to every request, including token refreshes.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Skip TLS certificate verification.
    ///
    /// Only meant for services on the loopback interface, which usually run
    /// with self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl GatewayConfig {
    /// Defaults for a service, trusting self-signed certificates on loopback.
    pub fn for_base_url(base_url: &BaseUrl) -> Self {
        Self {
            accept_invalid_certs: base_url.is_loopback(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("mvault/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_invalid_certs: false,
        }
    }
}
