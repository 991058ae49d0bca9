//! # Remit Types
//!
//! Domain types and port traits for the remittance conversion engine.
//! This crate has ZERO external IO dependencies - only data structures,
//! the conversion arithmetic, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Pure domain types (CurrencyCode, CurrencyPair, conversion math)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Booking payload sent to the order backend
//! - `error/` - Rate, engine and booking error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    ConversionInputs, ConversionOutputs, CurrencyCode, CurrencyPair, Payer, RatePair, recompute,
};
pub use dto::*;
pub use error::{BookingError, EngineError, RateError};
pub use ports::{Clock, CurrencySubscriber, RateProvider, SystemClock};
