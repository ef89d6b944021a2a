//! Helpers for reading server configuration from the environment.

use std::env;

/// Read a port number from the environment variable `key`, falling back to
/// `default` if the variable is unset or cannot be parsed as a port.
pub fn parse_port_or_default(key: &str, default: u16) -> u16 {
    match env::var(key) {
        Ok(value) => match value.parse() {
            Ok(port) => port,
            Err(error) => {
                tracing::warn!(
                    "Could not parse {key}=\"{value}\" as a port number ({error}), \
                    using default port {default}."
                );
                default
            }
        },
        Err(_) => default,
    }
}
