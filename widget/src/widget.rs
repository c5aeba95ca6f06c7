//! Currency converter widget state and rendering.

use std::collections::BTreeMap;
use std::fmt;

use oc_rates_common::Currency;
use tracing::{debug, warn};

use crate::client::{ConvertParams, RatesServiceClient};
use crate::currency::{currency_name, format_currency_value};

/// Conversion form backed by the rates service.
///
/// Holds the form inputs, the currencies offered for selection (the rates of
/// the current "from" currency) and the outcome of the last conversion.
/// Failures of any kind only raise the error flag.
pub struct ConverterWidget {
    client: RatesServiceClient,
    amount: f64,
    from_currency: Currency,
    to_currency: Currency,
    converted_amount: Option<f64>,
    error: bool,
    supported_currencies: BTreeMap<String, f64>,
}

impl ConverterWidget {
    pub fn new(client: RatesServiceClient) -> Self {
        Self {
            client,
            amount: 0.0,
            from_currency: Currency::eur(),
            to_currency: Currency::usd(),
            converted_amount: None,
            error: false,
            supported_currencies: BTreeMap::new(),
        }
    }

    /// Populate the currency list for the initial "from" currency.
    pub async fn connect(&mut self) {
        self.load_rates().await;
    }

    /// Update the amount from raw input; non-numeric input counts as 0.
    pub fn set_amount(&mut self, input: &str) {
        self.amount = input
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
        self.converted_amount = None;
    }

    /// Switch the source currency and reload the currency list.
    pub async fn set_from_currency(&mut self, code: &str) {
        self.from_currency = Currency::new(code);
        self.load_rates().await;
    }

    pub fn set_to_currency(&mut self, code: &str) {
        self.to_currency = Currency::new(code);
        self.converted_amount = None;
    }

    /// Ask the service to convert the current amount.
    pub async fn convert(&mut self) {
        self.error = false;

        let params = ConvertParams::new(
            self.from_currency.clone(),
            self.to_currency.clone(),
            self.amount,
        );
        let result = self.client.convert_currency(&params).await;
        match result {
            Ok(result) => {
                debug!(converted_amount = result.converted_amount, "Conversion received");
                self.converted_amount = Some(result.converted_amount);
            }
            Err(e) => {
                warn!(error = %e, "Conversion failed");
                self.error = true;
            }
        }
    }

    async fn load_rates(&mut self) {
        let result = self.client.get_rates(&self.from_currency).await;
        match result {
            Ok(rates) => {
                debug!(base = %self.from_currency, currencies = rates.rates.len(), "Rates loaded");
                self.supported_currencies = rates.rates;
            }
            Err(e) => {
                warn!(base = %self.from_currency, error = %e, "Loading rates failed");
                self.error = true;
            }
        }
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn from_currency(&self) -> &Currency {
        &self.from_currency
    }

    pub fn to_currency(&self) -> &Currency {
        &self.to_currency
    }

    pub fn converted_amount(&self) -> Option<f64> {
        self.converted_amount
    }

    pub fn has_error(&self) -> bool {
        self.error
    }

    pub fn supported_currencies(&self) -> &BTreeMap<String, f64> {
        &self.supported_currencies
    }

    fn render_selection(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        selected: &Currency,
        show_rate: bool,
    ) -> fmt::Result {
        writeln!(f, "{}:", label)?;
        for (code, rate) in &self.supported_currencies {
            let currency = Currency::new(code.as_str());
            let marker = if &currency == selected { '*' } else { ' ' };
            write!(f, "  {} {} ({})", marker, currency_name(&currency), currency)?;
            if show_rate {
                write!(f, " - Exchange rate: {}", format_currency_value(*rate, &currency))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for ConverterWidget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Amount: {}", self.amount)?;
        self.render_selection(f, "From", &self.from_currency, false)?;
        self.render_selection(f, "To", &self.to_currency, true)?;

        if self.error {
            return writeln!(
                f,
                "Error converting currency from {} to {}, please try again",
                self.from_currency, self.to_currency
            );
        }

        match self.converted_amount {
            Some(converted) if converted != 0.0 => writeln!(
                f,
                "{} is equal to: {}",
                format_currency_value(self.amount, &self.from_currency),
                format_currency_value(converted, &self.to_currency)
            ),
            _ => Ok(()),
        }
    }
}
