//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The engine depends on these traits, not concrete implementations.

mod clock;
mod rate_provider;
mod subscriber;

pub use clock::{Clock, SystemClock};
pub use rate_provider::RateProvider;
pub use subscriber::CurrencySubscriber;
