//! HTTP Client Factory
//!
//! Builds the reqwest client shared by all providers.

use std::time::Duration;

use crate::types::LlmError;

/// Build a `reqwest::Client` with the whole-request timeout and optional proxy.
///
/// - `Some(url)` -> route every request through the proxy
/// - `None` -> explicitly disable proxy (`no_proxy`), ignoring env vars
pub fn build_http_client(
    proxy: Option<&str>,
    timeout_secs: u64,
) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(timeout_secs));
    match proxy {
        Some(url) => {
            let p = reqwest::Proxy::all(url).map_err(|e| LlmError::InvalidRequest {
                message: format!("invalid proxy URL '{}': {}", url, e),
            })?;
            builder = builder.proxy(p);
        }
        None => {
            builder = builder.no_proxy();
        }
    }
    builder.build().map_err(|e| LlmError::NetworkError {
        message: format!("failed to build HTTP client: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client_no_proxy() {
        assert!(build_http_client(None, 30).is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        assert!(build_http_client(Some("http://127.0.0.1:8080"), 30).is_ok());
    }

}
