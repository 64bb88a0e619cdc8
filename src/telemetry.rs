use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Install the global subscriber. `RUST_LOG` wins over the per-environment
/// default filter.
pub fn init_tracing(environment: Environment) {
    let default_filter = match environment {
        Environment::Dev => "info,shopping_cart_api=debug",
        Environment::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let (pretty, json) = match environment {
        Environment::Dev => (Some(fmt::layer()), None),
        Environment::Prod => (None, Some(fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .init();
}
