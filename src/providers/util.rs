use crate::core::error::FetchError;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "xrate/1.0";

fn request_error(provider: &'static str, url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            provider,
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            provider,
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

/// Builds a client whose requests fail after `timeout`.
pub fn http_client(provider: &'static str, timeout: Duration) -> Result<reqwest::Client, FetchError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Client {
            provider,
            message: e.to_string(),
        })
}

/// Issues a single GET and returns the body of a 2xx response.
///
/// No retries: the first failure is returned as is.
pub async fn fetch_body(
    client: &reqwest::Client,
    provider: &'static str,
    url: &str,
) -> Result<Vec<u8>, FetchError> {
    debug!("Requesting {} rates from {}", provider, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| request_error(provider, url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            provider,
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| request_error(provider, url, e))?;
    Ok(body.to_vec())
}

/// Parses a textual rate, accepting `,` as the decimal separator.
pub fn parse_rate(provider: &'static str, code: &str, raw: &str) -> Result<f64, FetchError> {
    let normalized = raw.trim().replace(',', ".");
    let value = normalized
        .parse::<f64>()
        .map_err(|_| FetchError::InvalidRate {
            provider,
            code: code.to_string(),
            value: raw.to_string(),
        })?;
    ensure_positive(provider, code, value)
}

/// Rejects non-finite and non-positive rates.
pub fn ensure_positive(provider: &'static str, code: &str, value: f64) -> Result<f64, FetchError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FetchError::InvalidRate {
            provider,
            code: code.to_string(),
            value: value.to_string(),
        })
    }
}
