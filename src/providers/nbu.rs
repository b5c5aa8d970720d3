use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use super::util::{ensure_positive, fetch_body, http_client};
use crate::core::error::FetchError;
use crate::core::{CurrencyCode, RateFact, RateFeed, Snapshot};

pub const SOURCE: &str = "NBU";

/// Official National Bank of Ukraine rates, UAH per 1 unit.
#[derive(Debug, Clone, PartialEq)]
pub struct NbuSnapshot {
    pub eur_uah: f64,
    pub usd_uah: f64,
    pub as_of: DateTime<Utc>,
}

impl Snapshot for NbuSnapshot {
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn facts(&self) -> Vec<RateFact> {
        vec![
            RateFact::new(CurrencyCode::Eur, CurrencyCode::Uah, self.eur_uah),
            RateFact::new(CurrencyCode::Usd, CurrencyCode::Uah, self.usd_uah),
        ]
    }

    fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }
}

pub struct NbuProvider {
    base_url: String,
    timeout: Duration,
}

impl NbuProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        NbuProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NbuRecord {
    #[serde(default)]
    cc: Option<String>,
    #[serde(default)]
    rate: Option<f64>,
}

fn find_rate(records: &[NbuRecord], code: &str) -> Result<f64, FetchError> {
    let record = records
        .iter()
        .find(|r| {
            r.cc
                .as_deref()
                .is_some_and(|cc| cc.trim().eq_ignore_ascii_case(code))
        })
        .ok_or_else(|| FetchError::MissingRate {
            provider: SOURCE,
            code: code.to_string(),
        })?;

    match record.rate {
        Some(rate) => ensure_positive(SOURCE, code, rate),
        None => Err(FetchError::InvalidRate {
            provider: SOURCE,
            code: code.to_string(),
            value: "null".to_string(),
        }),
    }
}

#[async_trait]
impl RateFeed for NbuProvider {
    type Output = NbuSnapshot;

    #[instrument(name = "NbuFetch", skip(self))]
    async fn fetch(&self) -> Result<NbuSnapshot, FetchError> {
        let url = format!(
            "{}/NBUStatService/v1/statdirectory/exchange?json",
            self.base_url
        );
        let client = http_client(SOURCE, self.timeout)?;
        let body = fetch_body(&client, SOURCE, &url).await?;

        let records: Vec<NbuRecord> =
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed {
                provider: SOURCE,
                message: e.to_string(),
            })?;

        let snapshot = NbuSnapshot {
            eur_uah: find_rate(&records, "EUR")?,
            usd_uah: find_rate(&records, "USD")?,
            as_of: Utc::now(),
        };
        debug!(?snapshot, "Parsed NBU snapshot");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::testing::NBU_JSON;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_nbu_mock_server(mock_response: &str, status_code: u16) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/NBUStatService/v1/statdirectory/exchange"))
            .respond_with(ResponseTemplate::new(status_code).set_body_string(mock_response))
            .mount(&mock_server)
            .await;
        mock_server
    }

    fn provider(mock_server: &MockServer) -> NbuProvider {
        NbuProvider::new(&mock_server.uri(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_successful_nbu_fetch() {
        let mock_server = create_nbu_mock_server(NBU_JSON, 200).await;
        let snapshot = provider(&mock_server).fetch().await.unwrap();

        assert_eq!(snapshot.eur_uah, 45.0);
        assert_eq!(snapshot.usd_uah, 40.0);
        assert_eq!(snapshot.source(), "NBU");
    }

    #[tokio::test]
    async fn test_currency_code_match_ignores_case() {
        let body = r#"[{"cc": "eur", "rate": 44.5}, {"cc": "Usd", "rate": 41.25}]"#;
        let mock_server = create_nbu_mock_server(body, 200).await;
        let snapshot = provider(&mock_server).fetch().await.unwrap();

        assert_eq!(snapshot.eur_uah, 44.5);
        assert_eq!(snapshot.usd_uah, 41.25);
    }

    #[tokio::test]
    async fn test_missing_currency() {
        let body = r#"[{"r030": 978, "cc": "EUR", "rate": 45.0}]"#;
        let mock_server = create_nbu_mock_server(body, 200).await;
        let err = provider(&mock_server).fetch().await.unwrap_err();

        assert_eq!(err.to_string(), "NBU: currency not found: USD");
    }

    #[tokio::test]
    async fn test_non_positive_rate() {
        let body = r#"[{"cc": "EUR", "rate": 0.0}, {"cc": "USD", "rate": 40.0}]"#;
        let mock_server = create_nbu_mock_server(body, 200).await;
        let err = provider(&mock_server).fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::InvalidRate { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_nbu_malformed_response() {
        let mock_server = create_nbu_mock_server(r#"{"rates": []}"#, 200).await;
        let err = provider(&mock_server).fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Malformed { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn test_nbu_api_error_response() {
        let mock_server = create_nbu_mock_server("", 500).await;
        let err = provider(&mock_server).fetch().await.unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }
}
