//! OC Rates Widget
//!
//! Currency converter form driven by the OC Rates HTTP API: a thin client for
//! `/api/rates` and `/api/convert`, the form state, and a text rendering of it.

pub mod client;
pub mod currency;
pub mod widget;

pub use client::{ClientError, ConvertParams, RatesServiceClient};
pub use currency::{currency_name, format_currency_value};
pub use widget::ConverterWidget;
