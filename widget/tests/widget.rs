//! Widget and client against a running rates server backed by a stub provider.

use std::sync::Arc;

use chrono::Duration;
use oc_rates_common::Currency;
use oc_rates_fx::{ExpiringCache, RatesService, StubProvider};
use oc_rates_widget::{ClientError, ConvertParams, ConverterWidget, RatesServiceClient};

struct TestServer {
    stub: StubProvider,
    url: String,
    server: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn spawn_server() -> TestServer {
    let stub = StubProvider::spawn().await.unwrap();
    stub.set_rates("EUR", &[("USD", 2.0), ("GBP", 0.85)]);
    stub.set_rates("GBP", &[("EUR", 1.17), ("USD", 1.27)]);

    let service = RatesService::new(
        stub.client("test_api_key"),
        ExpiringCache::new(Duration::minutes(10)),
    );
    let app = oc_rates_server::router(Arc::new(service));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestServer { stub, url, server }
}

#[tokio::test]
async fn test_client_get_rates() {
    let server = spawn_server().await;
    let client = RatesServiceClient::new(&server.url);

    let rates = client.get_rates(&Currency::eur()).await.unwrap();

    assert!(rates.success);
    assert_eq!(rates.rate_for(&Currency::usd()), Some(2.0));
}

#[tokio::test]
async fn test_client_convert() {
    let server = spawn_server().await;
    let client = RatesServiceClient::new(&server.url);

    let params = ConvertParams::new(Currency::eur(), Currency::usd(), 50.0);
    let result = client.convert_currency(&params).await.unwrap();

    assert_eq!(result.from, Currency::eur());
    assert_eq!(result.to, Currency::usd());
    assert_eq!(result.amount, 50.0);
    assert_eq!(result.converted_amount, 100.0);
}

#[tokio::test]
async fn test_client_error_status() {
    let server = spawn_server().await;
    let client = RatesServiceClient::new(&server.url);

    let params = ConvertParams::new(Currency::eur(), Currency::new("XYZ"), 1.0);
    let err = client.convert_currency(&params).await.unwrap_err();
    assert!(matches!(err, ClientError::ConversionFailed { status } if status.as_u16() == 500));
    assert_eq!(err.to_string(), "Error converting currency");

    let err = client.get_rates(&Currency::new("ABC")).await.unwrap_err();
    assert!(matches!(err, ClientError::RatesUnavailable { .. }));
    assert_eq!(err.to_string(), "Error fetching rates");
}

#[tokio::test]
async fn test_widget_flow() {
    let server = spawn_server().await;
    let mut widget = ConverterWidget::new(RatesServiceClient::new(&server.url));

    widget.connect().await;
    assert!(!widget.has_error());
    assert_eq!(widget.supported_currencies().len(), 2);

    widget.set_amount("50");
    widget.convert().await;

    assert_eq!(widget.converted_amount(), Some(100.0));
    assert!(widget
        .to_string()
        .contains("50.00 EUR is equal to: 100.00 USD"));

    // Rates for EUR were fetched once and then served from cache
    assert_eq!(server.stub.hits(), 1);
}

#[tokio::test]
async fn test_widget_change_from_currency_reloads_list() {
    let server = spawn_server().await;
    let mut widget = ConverterWidget::new(RatesServiceClient::new(&server.url));
    widget.connect().await;

    widget.set_from_currency("GBP").await;

    assert!(widget.supported_currencies().contains_key("EUR"));
    assert!(!widget.supported_currencies().contains_key("GBP"));
    assert_eq!(server.stub.hits(), 2);
}

#[tokio::test]
async fn test_widget_failed_conversion_then_recovery() {
    let server = spawn_server().await;
    let mut widget = ConverterWidget::new(RatesServiceClient::new(&server.url));
    widget.connect().await;
    widget.set_amount("10");

    widget.set_to_currency("XYZ");
    widget.convert().await;
    assert!(widget.has_error());
    assert!(widget
        .to_string()
        .contains("Error converting currency from EUR to XYZ, please try again"));

    widget.set_to_currency("GBP");
    widget.convert().await;
    assert!(!widget.has_error());
    assert_eq!(widget.converted_amount(), Some(8.5));
}

#[tokio::test]
async fn test_widget_unknown_base_sets_error() {
    let server = spawn_server().await;
    let mut widget = ConverterWidget::new(RatesServiceClient::new(&server.url));

    widget.set_from_currency("ABC").await;

    assert!(widget.has_error());
    assert!(widget.supported_currencies().is_empty());
}
