//! OC Rates FX
//!
//! Exchange-rate lookup for the OC Rates proxy.
//!
//! # Features
//!
//! - Expiring in-memory cache with a single TTL
//! - Fixer-compatible provider client
//! - Cache-first rates lookup and currency conversion
//!
//! # Example
//!
//! ```rust,ignore
//! use chrono::Duration;
//! use oc_rates_common::Currency;
//! use oc_rates_fx::{ExpiringCache, FixerClient, RatesService};
//!
//! let service = RatesService::new(
//!     FixerClient::new(api_key),
//!     ExpiringCache::new(Duration::minutes(10)),
//! );
//!
//! let rates = service.get_rates(&Currency::eur()).await?;
//! let usd = service.convert_currency(&Currency::eur(), &Currency::usd(), 100.0).await?;
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod service;

pub use cache::ExpiringCache;
pub use error::{ConversionError, FxError, FxResult};
pub use provider::FixerClient;
pub use service::{RatesCache, RatesService};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::StubProvider;
