//! Currency codes and conversion results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Get the standard decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" | "ISK" | "HUF" => 0,
            "BHD" | "KWD" | "OMR" | "JOD" | "TND" => 3,
            _ => 2,
        }
    }

    /// Default base currency for rate queries.
    pub fn eur() -> Self {
        Self::new("EUR")
    }

    /// Default conversion target.
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Result of converting an amount between two currencies.
///
/// Recomputed on every request; only the underlying rates are cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub from: Currency,
    pub to: Currency,
    pub amount: f64,
    pub converted_amount: f64,
}

impl ConversionResult {
    pub fn new(from: Currency, to: Currency, amount: f64, converted_amount: f64) -> Self {
        Self {
            from,
            to,
            amount,
            converted_amount,
        }
    }

    /// Rate implied by the conversion, zero when nothing was converted.
    pub fn effective_rate(&self) -> f64 {
        if self.amount == 0.0 {
            return 0.0;
        }
        self.converted_amount / self.amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_normalizes_code() {
        assert_eq!(Currency::new(" eur ").code(), "EUR");
        assert_eq!(Currency::from("usd"), Currency::usd());
    }

    #[test]
    fn test_currency_decimal_places() {
        assert_eq!(Currency::usd().decimal_places(), 2);
        assert_eq!(Currency::eur().decimal_places(), 2);
        assert_eq!(Currency::jpy().decimal_places(), 0);
        assert_eq!(Currency::new("KWD").decimal_places(), 3);
    }

    #[test]
    fn test_conversion_result_wire_format() {
        let result = ConversionResult::new(Currency::eur(), Currency::usd(), 50.0, 100.0);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "from": "EUR",
                "to": "USD",
                "amount": 50.0,
                "convertedAmount": 100.0
            })
        );
    }

    #[test]
    fn test_effective_rate() {
        let result = ConversionResult::new(Currency::eur(), Currency::usd(), 100.0, 120.0);
        assert!((result.effective_rate() - 1.2).abs() < f64::EPSILON);

        let zero = ConversionResult::new(Currency::eur(), Currency::usd(), 0.0, 0.0);
        assert_eq!(zero.effective_rate(), 0.0);
    }
}
