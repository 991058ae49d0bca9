//! # Remit Engine
//!
//! Session-scoped conversion engine behind the remittance quote widget.
//!
//! ## Architecture
//!
//! - `engine` - Owns the currency pair, the latest good rate and the user
//!   inputs; recomputes every displayed quantity from them
//! - `sync` - Pushes the authoritative pair to every subscribed control
//! - `format` - Amount parsing and display formatting
//! - `booking` - Booking validation predicates and payload assembly
//!
//! The engine is constructed once and shared (`Arc<ConversionEngine>`) with
//! whatever drives it; rates come from an injected `RateResolver`.

pub mod booking;
pub mod engine;
pub mod format;
pub mod sync;

#[cfg(test)]
mod engine_tests;

pub use booking::BookingChecks;
pub use engine::{ConversionEngine, EngineConfig, EngineSnapshot, RateUpdate};
pub use format::{DisplayedOutputs, format_en_in, parse_amount};
pub use sync::{CurrencyStateSync, PairMirror};
