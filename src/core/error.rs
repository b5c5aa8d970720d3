//! Rate resolution error types.

use thiserror::Error;

use super::currency::CurrencyCode;

/// Errors raised while fetching a single upstream feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Request did not complete within the configured timeout.
    #[error("{provider}: request to {url} timed out")]
    Timeout { provider: &'static str, url: String },

    /// HTTP client could not be constructed.
    #[error("{provider}: could not build HTTP client: {message}")]
    Client {
        provider: &'static str,
        message: String,
    },

    /// Connection or body read failure.
    #[error("{provider}: request to {url} failed: {message}")]
    Transport {
        provider: &'static str,
        url: String,
        message: String,
    },

    /// Upstream answered with a non-2xx status.
    #[error("{provider}: HTTP {status} from {url}")]
    Status {
        provider: &'static str,
        url: String,
        status: u16,
    },

    /// Payload could not be decoded.
    #[error("{provider}: malformed payload: {message}")]
    Malformed {
        provider: &'static str,
        message: String,
    },

    /// Expected currency or symbol record is absent.
    #[error("{provider}: currency not found: {code}")]
    MissingRate { provider: &'static str, code: String },

    /// Rate value is unparseable, non-positive or non-finite.
    #[error("{provider}: invalid rate for {code}: {value}")]
    InvalidRate {
        provider: &'static str,
        code: String,
        value: String,
    },
}

impl FetchError {
    pub fn provider(&self) -> &'static str {
        match self {
            FetchError::Timeout { provider, .. }
            | FetchError::Client { provider, .. }
            | FetchError::Transport { provider, .. }
            | FetchError::Status { provider, .. }
            | FetchError::Malformed { provider, .. }
            | FetchError::MissingRate { provider, .. }
            | FetchError::InvalidRate { provider, .. } => provider,
        }
    }
}

/// Errors surfaced by rate resolution.
#[derive(Debug, Error)]
pub enum RateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Graph has no route between the requested currencies.
    #[error("No conversion path from {from} to {to}")]
    NoPath { from: CurrencyCode, to: CurrencyCode },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unsupported currency: {0}")]
pub struct UnknownCurrency(pub String);
