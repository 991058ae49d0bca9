//! One-way propagation of the authoritative currency pair to UI controls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use remit_types::{CurrencyPair, CurrencySubscriber};
use tracing::debug;

/// Fans the current pair out to every subscribed control.
///
/// Publishing is synchronous and idempotent: controls receive the complete
/// pair each time, so repeating a publish with the same pair changes nothing.
#[derive(Default)]
pub struct CurrencyStateSync {
    subscribers: RwLock<Vec<Arc<dyn CurrencySubscriber>>>,
}

impl CurrencyStateSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `subscriber` and immediately hands it `current`.
    pub fn subscribe(&self, subscriber: Arc<dyn CurrencySubscriber>, current: &CurrencyPair) {
        subscriber.on_pair_changed(current);
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    pub fn publish(&self, pair: &CurrencyPair) {
        let subscribers = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(pair = %pair, subscribers = subscribers.len(), "Publishing currency pair");
        for subscriber in subscribers.iter() {
            subscriber.on_pair_changed(pair);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// A control holding a read copy of the pair, e.g. a select or a badge.
#[derive(Debug, Default)]
pub struct PairMirror {
    value: RwLock<Option<CurrencyPair>>,
    writes: AtomicUsize,
}

impl PairMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// What the control currently shows.
    pub fn value(&self) -> Option<CurrencyPair> {
        self.value
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// How many times the control was written to.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CurrencySubscriber for PairMirror {
    fn on_pair_changed(&self, pair: &CurrencyPair) {
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = Some(pair.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}
