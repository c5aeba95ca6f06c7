//! Cache-backed rates lookup and currency conversion.

use oc_rates_common::{ConversionResult, Currency, RatesResponse};
use tracing::{debug, info, instrument, warn};

use crate::cache::ExpiringCache;
use crate::error::{ConversionError, FxError, FxResult};
use crate::provider::FixerClient;

/// Cache holding provider responses keyed by base currency.
pub type RatesCache = ExpiringCache<String, RatesResponse>;

/// Serves rates from the cache, falling back to the provider on a miss.
pub struct RatesService {
    provider: FixerClient,
    cache: RatesCache,
}

impl RatesService {
    /// Create a service over an explicitly constructed cache.
    pub fn new(provider: FixerClient, cache: RatesCache) -> Self {
        Self { provider, cache }
    }

    /// Get latest rates for `base`.
    ///
    /// A fresh cached response is returned without contacting the provider.
    /// Otherwise the provider is asked once; accepted responses are cached,
    /// rejected ones are not.
    #[instrument(skip(self), fields(base = %base))]
    pub async fn get_rates(&self, base: &Currency) -> FxResult<RatesResponse> {
        let key = Self::cache_key(base);

        if let Some(cached) = self.cache.get(key.as_str()) {
            debug!("Returning cached rates");
            return Ok(cached);
        }

        let rates = self.provider.fetch_rates(base).await?;

        if !rates.success {
            let message = rates.error_message();
            warn!(error = %message, "Provider rejected rates request");
            return Err(FxError::UpstreamRejected(message));
        }

        self.cache.set(key, rates.clone());
        info!(
            currencies = rates.rates.len(),
            quoted_at = ?rates.quoted_at(),
            "Cached fresh rates"
        );

        Ok(rates)
    }

    /// Convert `amount` of `from` into `to` at the latest rate.
    ///
    /// A target missing from the rates, or quoted at a non-positive rate, is
    /// an unknown currency. The result is not rounded.
    #[instrument(skip(self), fields(from = %from, to = %to))]
    pub async fn convert_currency(
        &self,
        from: &Currency,
        to: &Currency,
        amount: f64,
    ) -> Result<f64, ConversionError> {
        let rates = self.get_rates(from).await?;
        let rate = rates
            .rate_for(to)
            .filter(|rate| *rate > 0.0)
            .ok_or_else(|| FxError::UnknownCurrency(to.clone()))?;

        Ok(amount * rate)
    }

    /// Convert and package the result for API callers.
    pub async fn convert(
        &self,
        from: Currency,
        to: Currency,
        amount: f64,
    ) -> Result<ConversionResult, ConversionError> {
        let converted_amount = self.convert_currency(&from, &to, amount).await?;
        let result = ConversionResult::new(from, to, amount, converted_amount);

        debug!(effective_rate = result.effective_rate(), "Conversion completed");
        Ok(result)
    }

    fn cache_key(base: &Currency) -> String {
        format!("rates_{}", base.code())
    }
}
