//! Client for the rates service HTTP API.

use oc_rates_common::{ConversionResult, Currency, RatesResponse};
use reqwest::StatusCode;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Error fetching rates")]
    RatesUnavailable { status: StatusCode },
    #[error("Error converting currency")]
    ConversionFailed { status: StatusCode },
}

/// Parameters for `GET /api/convert`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertParams {
    pub from: Currency,
    pub to: Currency,
    pub amount: f64,
}

impl ConvertParams {
    pub fn new(from: Currency, to: Currency, amount: f64) -> Self {
        Self { from, to, amount }
    }
}

impl Default for ConvertParams {
    fn default() -> Self {
        Self::new(Currency::eur(), Currency::usd(), 1.0)
    }
}

#[derive(Debug, Clone)]
pub struct RatesServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl RatesServiceClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Latest rates for `base`.
    pub async fn get_rates(&self, base: &Currency) -> Result<RatesResponse, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/rates", self.base_url))
            .query(&[("base", base.code())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::RatesUnavailable { status });
        }
        Ok(response.json().await?)
    }

    /// Convert an amount between two currencies.
    pub async fn convert_currency(
        &self,
        params: &ConvertParams,
    ) -> Result<ConversionResult, ClientError> {
        let response = self
            .http
            .get(format!("{}/api/convert", self.base_url))
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::ConversionFailed { status });
        }
        Ok(response.json().await?)
    }
}
