//! Tracing setup for the report binary.
//!
//! Stdout carries the dashboard JSON, so every log line goes to stderr.

use crate::config::{Environment, LogFormat, Settings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub fn default_filter(env: &Environment) -> &'static str {
    match env {
        Environment::Dev => "survey_admin=debug,warn",
        Environment::Staging => "survey_admin=info,warn",
        Environment::Prod => "survey_admin=info,error",
    }
}

pub fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&settings.env)));

    let verbose = settings.env.is_dev();
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose);

    let registry = tracing_subscriber::registry().with(filter);
    match settings.log_format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).init(),
    }

    tracing::debug!(format = ?settings.log_format, "Survey admin logging ready");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filters_parse() {
        for env in [Environment::Dev, Environment::Staging, Environment::Prod] {
            let directives = default_filter(&env);
            assert!(directives.starts_with("survey_admin="));
            assert!(EnvFilter::try_new(directives).is_ok());
        }
    }
}
