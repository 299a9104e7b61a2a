//! Credential lookup for the Gemini API

use std::env;

/// Read the API key from the named environment variable
///
/// Unset and empty values both count as missing. A missing key is not an
/// error here; the client reports it per turn instead.
pub fn get_api_key(env_name: &str) -> Option<String> {
    match env::var(env_name) {
        Ok(key) if !key.trim().is_empty() => {
            tracing::info!("Using API key from {}", env_name);
            Some(key)
        }
        _ => {
            tracing::warn!("{} is not set; questions will not be sent", env_name);
            None
        }
    }
}
