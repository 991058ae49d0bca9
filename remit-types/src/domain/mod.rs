//! Domain models for the conversion engine.

pub mod conversion;
pub mod currency;

pub use conversion::{ConversionInputs, ConversionOutputs, Payer, recompute};
pub use currency::{CurrencyCode, CurrencyPair, RatePair};
