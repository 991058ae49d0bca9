//! Conversion Engine
//!
//! Owns the session state of the quote widget: the currency pair, the last
//! successfully resolved rate and the raw user inputs. Every displayed
//! quantity is derived from one consistent snapshot of that state.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use exchange_rates::{RateResolver, ResolvedRate};
use remit_types::{
    ConversionInputs, ConversionOutputs, CurrencyCode, CurrencyPair, CurrencySubscriber,
    EngineError, Payer, RatePair, recompute,
};
use tracing::{debug, error, info, instrument};

use crate::format::{DisplayedOutputs, parse_amount, rate_label};
use crate::sync::CurrencyStateSync;

/// Rate shown before the first resolution completes.
pub const SEED_RATE: f64 = 88.0987;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Settlement currency; pinned for the whole session.
    pub base: CurrencyCode,
    pub initial_quote: CurrencyCode,
    /// Initial `latest_rate` so the UI is never blank.
    pub seed_rate: f64,
    pub fee_usd: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base: CurrencyCode::inr(),
            initial_quote: CurrencyCode::usd(),
            seed_rate: SEED_RATE,
            fee_usd: 0.0,
        }
    }
}

/// Outcome of a rate refresh that reached a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RateUpdate {
    /// The rate became the engine's `latest_rate`.
    Applied(ResolvedRate),
    /// A newer refresh was issued meanwhile; the result was dropped.
    Superseded(ResolvedRate),
}

impl RateUpdate {
    pub fn resolved(&self) -> &ResolvedRate {
        match self {
            RateUpdate::Applied(r) | RateUpdate::Superseded(r) => r,
        }
    }
}

/// A consistent view of the engine taken under a single lock.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub pair: CurrencyPair,
    pub latest_rate: f64,
    pub inputs: ConversionInputs,
    pub outputs: ConversionOutputs,
}

impl EngineSnapshot {
    pub fn displayed(&self) -> DisplayedOutputs {
        DisplayedOutputs::from(&self.outputs)
    }

    pub fn rate_label(&self) -> String {
        rate_label(&self.pair.quote, self.latest_rate, &self.pair.base)
    }
}

struct EngineState {
    pair: CurrencyPair,
    latest_rate: f64,
    inputs: ConversionInputs,
}

impl EngineState {
    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            pair: self.pair.clone(),
            latest_rate: self.latest_rate,
            inputs: self.inputs,
            outputs: recompute(&self.inputs, self.latest_rate),
        }
    }
}

/// Session-scoped conversion engine.
pub struct ConversionEngine {
    resolver: Arc<RateResolver>,
    state: RwLock<EngineState>,
    sync: CurrencyStateSync,
    /// Sequence of the most recently issued refresh; only it may write the rate.
    issued: AtomicU64,
}

impl ConversionEngine {
    pub fn new(resolver: Arc<RateResolver>, config: EngineConfig) -> Self {
        let state = EngineState {
            pair: CurrencyPair::new(config.base, config.initial_quote),
            latest_rate: config.seed_rate,
            inputs: ConversionInputs::new(0.0, config.fee_usd.max(0.0), Payer::Sender),
        };
        Self {
            resolver,
            state: RwLock::new(state),
            sync: CurrencyStateSync::new(),
            issued: AtomicU64::new(0),
        }
    }

    fn read<T>(&self, f: impl FnOnce(&EngineState) -> T) -> T {
        f(&*self.state.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write<T>(&self, f: impl FnOnce(&mut EngineState) -> T) -> T {
        f(&mut *self.state.write().unwrap_or_else(PoisonError::into_inner))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read access
    // ─────────────────────────────────────────────────────────────────────────────

    pub fn pair(&self) -> CurrencyPair {
        self.read(|s| s.pair.clone())
    }

    pub fn base_currency(&self) -> CurrencyCode {
        self.read(|s| s.pair.base.clone())
    }

    pub fn quote_currency(&self) -> CurrencyCode {
        self.read(|s| s.pair.quote.clone())
    }

    /// Last successfully resolved base-per-quote rate.
    pub fn latest_rate(&self) -> f64 {
        self.read(|s| s.latest_rate)
    }

    pub fn inputs(&self) -> ConversionInputs {
        self.read(|s| s.inputs)
    }

    /// Derived quantities for the current state.
    pub fn outputs(&self) -> ConversionOutputs {
        self.read(|s| recompute(&s.inputs, s.latest_rate))
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        self.read(EngineState::snapshot)
    }

    /// `1 {quote} = {rate} {base}`
    pub fn exchange_rate_text(&self) -> String {
        self.snapshot().rate_label()
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Inputs
    // ─────────────────────────────────────────────────────────────────────────────

    /// Sets the amount to send from raw text; unparsable input counts as zero.
    pub fn set_amount_to_send(&self, raw: &str) -> EngineSnapshot {
        let amount = parse_amount(raw);
        self.write(|s| {
            s.inputs.amount_to_send = amount;
            s.snapshot()
        })
    }

    /// Overrides the receiving amount, which otherwise mirrors the send amount.
    pub fn set_receiving_amount(&self, raw: &str) -> EngineSnapshot {
        let amount = parse_amount(raw);
        self.write(|s| {
            s.inputs.receiving_amount = Some(amount);
            s.snapshot()
        })
    }

    /// Goes back to mirroring the send amount.
    pub fn clear_receiving_amount(&self) -> EngineSnapshot {
        self.write(|s| {
            s.inputs.receiving_amount = None;
            s.snapshot()
        })
    }

    pub fn set_payer(&self, payer: Payer) -> EngineSnapshot {
        self.write(|s| {
            s.inputs.payer = payer;
            s.snapshot()
        })
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Currency state
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a control; it immediately receives the current pair.
    pub fn subscribe(&self, subscriber: Arc<dyn CurrencySubscriber>) {
        self.sync.subscribe(subscriber, &self.pair());
    }

    /// Re-publishes the current pair, e.g. after someone touched the locked
    /// base control.
    pub fn sync_from_state(&self) {
        self.sync.publish(&self.pair());
    }

    /// Changes the send currency and re-resolves the rate.
    ///
    /// Empty codes fail fast without touching state or the network.
    pub async fn set_quote_currency(&self, code: &str) -> Result<RateUpdate, EngineError> {
        let quote = CurrencyCode::new(code).map_err(|_| EngineError::InvalidCurrencyPair)?;
        let (pair, seq) = self.write(|s| {
            s.pair.quote = quote;
            (s.pair.clone(), self.issue())
        });
        info!(pair = %pair, "Quote currency changed");
        self.sync.publish(&pair);
        self.resolve_issued(seq, pair.rate_pair()).await
    }

    /// Dropdown entry point. The base stays pinned to the settlement
    /// currency, so only `right` is used.
    pub async fn set_currencies(&self, left: &str, right: &str) -> Result<RateUpdate, EngineError> {
        let base = self.base_currency();
        if !left.trim().eq_ignore_ascii_case(base.as_str()) {
            debug!(requested = left, base = %base, "Ignoring base change; base is pinned");
        }
        self.set_quote_currency(right).await
    }

    /// Resolves the rate for the current pair.
    ///
    /// On failure `latest_rate` is left untouched. If another refresh is
    /// issued before this one settles, this result is discarded.
    #[instrument(skip(self))]
    pub async fn refresh_rate(&self) -> Result<RateUpdate, EngineError> {
        let (seq, rate_pair) = self.write(|s| (self.issue(), s.pair.rate_pair()));
        self.resolve_issued(seq, rate_pair).await
    }

    /// Takes the next refresh sequence. Callers hold the state write lock so
    /// the sequence and the pair it resolves change together.
    fn issue(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn resolve_issued(&self, seq: u64, rate_pair: RatePair) -> Result<RateUpdate, EngineError> {
        let outcome = match self.resolver.resolve_pair(&rate_pair).await {
            Ok(resolved) => {
                let applied = self.write(|s| {
                    if self.issued.load(Ordering::SeqCst) == seq {
                        s.latest_rate = resolved.rate;
                        true
                    } else {
                        false
                    }
                });
                if applied {
                    info!(pair = %rate_pair, rate = resolved.rate, source = %resolved.source, "Rate updated");
                    Ok(RateUpdate::Applied(resolved))
                } else {
                    debug!(pair = %rate_pair, seq, "Discarding superseded rate");
                    Ok(RateUpdate::Superseded(resolved))
                }
            }
            Err(e) => {
                error!(pair = %rate_pair, error = %e, "Rate fetch failed, using last known rate");
                Err(EngineError::Rate(e))
            }
        };

        self.sync_from_state();
        outcome
    }
}
