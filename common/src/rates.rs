//! Rates payload as returned by the upstream provider.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Currency;

/// Latest rates for one base currency.
///
/// Passed through to API callers unchanged, so optional provider fields are
/// kept and omitted again when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesResponse {
    /// Whether the provider accepted the request.
    #[serde(default)]
    pub success: bool,
    /// Base currency the rates are quoted against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Currency>,
    /// Provider quote date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Provider quote time, seconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// Rate per unit of base, keyed by currency code.
    #[serde(default)]
    pub rates: BTreeMap<String, f64>,
    /// Failure details when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderErrorInfo>,
}

impl RatesResponse {
    /// Build a successful response.
    pub fn new(base: Currency, rates: BTreeMap<String, f64>) -> Self {
        Self {
            success: true,
            base: Some(base),
            date: None,
            timestamp: None,
            rates,
            error: None,
        }
    }

    /// Build a response the provider flagged as failed.
    pub fn rejected(error: ProviderErrorInfo) -> Self {
        Self {
            success: false,
            base: None,
            date: None,
            timestamp: None,
            rates: BTreeMap::new(),
            error: Some(error),
        }
    }

    /// Rate for converting one unit of base into `currency`.
    pub fn rate_for(&self, currency: &Currency) -> Option<f64> {
        self.rates.get(currency.code()).copied()
    }

    /// Human-readable failure message supplied by the provider.
    pub fn error_message(&self) -> String {
        self.error
            .as_ref()
            .map(ProviderErrorInfo::to_string)
            .unwrap_or_else(|| "unknown provider error".to_string())
    }

    /// When the provider quoted these rates.
    pub fn quoted_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// Error object attached to a rejected provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderErrorInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
}

impl ProviderErrorInfo {
    pub fn new(code: i64, kind: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            kind: Some(kind.into()),
            info: None,
        }
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }
}

impl std::fmt::Display for ProviderErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.info, &self.kind, self.code) {
            (Some(info), _, _) => write!(f, "{}", info),
            (None, Some(kind), Some(code)) => write!(f, "{} ({})", kind, code),
            (None, Some(kind), None) => write!(f, "{}", kind),
            (None, None, Some(code)) => write!(f, "provider error {}", code),
            (None, None, None) => write!(f, "unknown provider error"),
        }
    }
}
