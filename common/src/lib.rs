//! OC Rates Common Types
//!
//! Wire types shared by the rates proxy, its HTTP layer and the converter
//! widget: currency codes, the provider's rates payload and conversion results.

pub mod monetary;
pub mod rates;

pub use monetary::*;
pub use rates::*;
