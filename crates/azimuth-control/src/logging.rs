//! Log pipeline initialisation.
//!
//! Call [`init_tracing`] once at process startup to wire up the `tracing`
//! subscriber for the robot program.
//!
//! # Environment variables
//!
//! | Variable | Effect |
//! |---|---|
//! | `RUST_LOG` | Log filter (default `"info"`). |
//! | `AZIMUTH_LOG_FORMAT=json` | Emit newline-delimited JSON logs. |

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialise the global `tracing` subscriber.
///
/// Logs are line-oriented for driver-station consoles by default;
/// `AZIMUTH_LOG_FORMAT=json` switches to newline-delimited JSON for the pit
/// laptop's log tooling.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    if wants_json() {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

fn wants_json() -> bool {
    std::env::var("AZIMUTH_LOG_FORMAT").as_deref() == Ok("json")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that JSON output stays off unless asked for.
    #[test]
    fn json_format_is_opt_in() {
        // SAFETY: no other test reads this env-var.
        unsafe { std::env::remove_var("AZIMUTH_LOG_FORMAT") };
        assert!(!wants_json());

        unsafe { std::env::set_var("AZIMUTH_LOG_FORMAT", "json") };
        assert!(wants_json());

        unsafe { std::env::remove_var("AZIMUTH_LOG_FORMAT") };
    }
}
