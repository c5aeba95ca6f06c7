//! Rates service error types.

use oc_rates_common::Currency;
use thiserror::Error;

/// Errors that can occur while obtaining rates.
#[derive(Debug, Error)]
pub enum FxError {
    /// Provider could not be reached or returned an unusable response.
    #[error("Error fetching rates")]
    ProviderFetch,

    /// Provider answered but flagged the request as failed.
    #[error("Error fetching rates : {0}")]
    UpstreamRejected(String),

    /// Target currency missing from the rates mapping.
    #[error("Invalid target currency: {0}")]
    UnknownCurrency(Currency),
}

/// Result type for rate operations.
pub type FxResult<T> = Result<T, FxError>;

/// Failure of a currency conversion.
///
/// Displays a fixed message whatever went wrong; the underlying
/// [`FxError`] stays reachable through [`ConversionError::cause`] and
/// `Error::source` for logging.
#[derive(Debug, Error)]
#[error("Error converting currency")]
pub struct ConversionError {
    #[source]
    cause: FxError,
}

impl ConversionError {
    /// The failure that aborted the conversion.
    pub fn cause(&self) -> &FxError {
        &self.cause
    }
}

impl From<FxError> for ConversionError {
    fn from(cause: FxError) -> Self {
        Self { cause }
    }
}
