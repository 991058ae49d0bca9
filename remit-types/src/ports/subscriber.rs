//! Currency-pair subscriber port.
//!
//! UI controls (selects, dropdown badges) implement this to receive the
//! authoritative pair. They hold read copies only.

use crate::domain::CurrencyPair;

pub trait CurrencySubscriber: Send + Sync {
    /// Called with the full pair every time it is published.
    /// Must be idempotent: the same pair may be delivered repeatedly.
    fn on_pair_changed(&self, pair: &CurrencyPair);
}
