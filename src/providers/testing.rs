//! Fixtures shared by provider, graph and service tests.

use chrono::{DateTime, TimeZone, Utc};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{BinanceSnapshot, CbrSnapshot, NbuSnapshot};
use crate::core::{RateFact, Snapshot};

pub const CBR_XML: &str = r#"<?xml version="1.0" encoding="windows-1251"?>
<ValCurs Date="17.10.2026" name="Foreign Currency Market">
  <Valute ID="R01235">
    <NumCode>840</NumCode>
    <CharCode>USD</CharCode>
    <Nominal>1</Nominal>
    <Name>US Dollar</Name>
    <Value>90,0000</Value>
    <VunitRate>90</VunitRate>
  </Valute>
  <Valute ID="R01239">
    <NumCode>978</NumCode>
    <CharCode>EUR</CharCode>
    <Nominal>1</Nominal>
    <Name>Euro</Name>
    <Value>100,0000</Value>
    <VunitRate>100</VunitRate>
  </Valute>
  <Valute ID="R01720">
    <NumCode>980</NumCode>
    <CharCode>UAH</CharCode>
    <Nominal>10</Nominal>
    <Name>Hryvnia</Name>
    <Value>22,2222</Value>
    <VunitRate>2,22222</VunitRate>
  </Valute>
</ValCurs>"#;

pub const NBU_JSON: &str = r#"[
    {"r030": 36, "txt": "Australian Dollar", "rate": 26.1, "cc": "AUD", "exchangedate": "17.10.2026"},
    {"r030": 840, "txt": "US Dollar", "rate": 40.0, "cc": "USD", "exchangedate": "17.10.2026"},
    {"r030": 978, "txt": "Euro", "rate": 45.0, "cc": "EUR", "exchangedate": "17.10.2026"}
]"#;

pub fn fixed_time(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, hour, 0, 0).unwrap()
}

/// CBR {EUR: 100, USD: 90}, NBU {EUR: 45, USD: 40},
/// Binance {EURUSDT: 1.1, USDTUAH: 41, USDTUSD: 1}.
pub fn scenario_snapshots() -> (CbrSnapshot, NbuSnapshot, BinanceSnapshot) {
    (
        CbrSnapshot {
            eur_rub: 100.0,
            usd_rub: 90.0,
            as_of: fixed_time(9),
        },
        NbuSnapshot {
            eur_uah: 45.0,
            usd_uah: 40.0,
            as_of: fixed_time(10),
        },
        BinanceSnapshot {
            eur_usdt: 1.1,
            usdt_uah: 41.0,
            usdt_usd: 1.0,
            as_of: fixed_time(11),
        },
    )
}

/// Free-form snapshot for graph tests.
pub struct StaticSnapshot {
    source: &'static str,
    facts: Vec<RateFact>,
}

impl StaticSnapshot {
    pub fn new(source: &'static str, facts: Vec<RateFact>) -> Self {
        Self { source, facts }
    }
}

impl Snapshot for StaticSnapshot {
    fn source(&self) -> &'static str {
        self.source
    }

    fn facts(&self) -> Vec<RateFact> {
        self.facts.clone()
    }

    fn as_of(&self) -> DateTime<Utc> {
        fixed_time(0)
    }
}

pub async fn mount_binance_ticker(mock_server: &MockServer, symbol: &str, price: &str) {
    let body = format!(r#"{{"symbol":"{symbol}","price":"{price}"}}"#);
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", symbol))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(mock_server)
        .await;
}

/// Serves all three feeds with the scenario rates from one server.
pub async fn mount_scenario_feeds(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/scripts/XML_daily.asp"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CBR_XML))
        .mount(mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/NBUStatService/v1/statdirectory/exchange"))
        .respond_with(ResponseTemplate::new(200).set_body_string(NBU_JSON))
        .mount(mock_server)
        .await;
    mount_binance_ticker(mock_server, "EURUSDT", "1.10000000").await;
    mount_binance_ticker(mock_server, "USDTUAH", "41.00000000").await;
    mount_binance_ticker(mock_server, "USDTUSD", "1.00000000").await;
}
