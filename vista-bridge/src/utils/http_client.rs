use std::time::Duration;

use tracing::warn;

const USER_AGENT: &str = concat!("vista-bridge/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client used for annotation and CI calls.
pub fn build_client(request_timeout: Duration, pool_max_idle_per_host: usize) -> reqwest::Client {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);

    if request_timeout > Duration::ZERO {
        builder = builder.timeout(request_timeout);
    }

    if pool_max_idle_per_host > 0 {
        builder = builder.pool_max_idle_per_host(pool_max_idle_per_host);
    }

    builder.build().unwrap_or_else(|error| {
        warn!(
            error = %error,
            "Failed to create configured HTTP client; falling back to reqwest defaults"
        );
        reqwest::Client::new()
    })
}
