//! ConversionEngine unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::Utc;
    use exchange_rates::cache::DEFAULT_TTL_MILLIS;
    use exchange_rates::testing::{ManualClock, MockRateProvider};
    use exchange_rates::{RateResolver, RateSource};
    use remit_types::{CurrencyCode, CurrencyPair, EngineError, Payer, RateError, RatePair};

    use crate::{ConversionEngine, EngineConfig, PairMirror, RateUpdate};

    fn pair(from: &str, to: &str) -> RatePair {
        RatePair::parse(from, to).unwrap()
    }

    struct Harness {
        primary: Arc<MockRateProvider>,
        secondary: Arc<MockRateProvider>,
        clock: Arc<ManualClock>,
        engine: ConversionEngine,
    }

    fn harness(config: EngineConfig) -> Harness {
        let primary = Arc::new(MockRateProvider::new("primary"));
        let secondary = Arc::new(MockRateProvider::new("secondary"));
        let clock = Arc::new(ManualClock::new(0));
        let resolver = RateResolver::builder()
            .provider(primary.clone())
            .provider(secondary.clone())
            .with_static_fallback()
            .clock(clock.clone())
            .build();
        Harness {
            primary,
            secondary,
            clock,
            engine: ConversionEngine::new(Arc::new(resolver), config),
        }
    }

    fn default_harness() -> Harness {
        harness(EngineConfig::default())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Recompute
    // ─────────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_seed_rate_before_first_fetch() {
        let h = default_harness();
        assert_eq!(h.engine.latest_rate(), 88.0987);
        assert_eq!(h.engine.base_currency(), CurrencyCode::inr());
        assert_eq!(h.engine.quote_currency(), CurrencyCode::usd());
        assert_eq!(h.engine.exchange_rate_text(), "1 USD = 88.099 INR");
    }

    #[test]
    fn test_scenario_without_fee() {
        let h = default_harness();
        let snap = h.engine.set_amount_to_send("100");
        let shown = snap.displayed();
        assert_eq!(shown.amount_in_base, "8810");
        assert_eq!(shown.total_payable_in_base, "8,809.87");
        assert_eq!(shown.effective_rate, "88.0987");
        assert_eq!(snap.outputs.amount_in_base, 100.0 * 88.0987);
    }

    #[test]
    fn test_scenario_with_sender_fee() {
        let h = harness(EngineConfig {
            fee_usd: 8.0,
            ..EngineConfig::default()
        });
        let snap = h.engine.set_amount_to_send("100");
        assert_eq!(snap.displayed().fee_in_base, "705");
        assert!((snap.outputs.total_payable_in_base - 9514.6596).abs() < 1e-6);
        assert!((snap.outputs.effective_rate - 95.1466).abs() < 1e-4);
    }

    #[test]
    fn test_payer_toggle_recomputes() {
        let h = harness(EngineConfig {
            fee_usd: 8.0,
            ..EngineConfig::default()
        });
        h.engine.set_amount_to_send("100");
        let snap = h.engine.set_payer(Payer::Recipient);
        assert_eq!(snap.outputs.total_payable_in_base, snap.outputs.amount_in_base);
        let snap = h.engine.set_payer(Payer::Sender);
        assert!(snap.outputs.total_payable_in_base > snap.outputs.amount_in_base);
    }

    #[test]
    fn test_zero_amount_effective_rate() {
        let h = default_harness();
        let snap = h.engine.set_amount_to_send("0");
        assert_eq!(snap.outputs.effective_rate, snap.latest_rate);
    }

    #[test]
    fn test_unparsable_amount_is_zero() {
        let h = default_harness();
        let snap = h.engine.set_amount_to_send("twelve");
        assert_eq!(snap.inputs.amount_to_send, 0.0);
        assert!(snap.outputs.amount_in_base.is_finite());
        assert!(snap.outputs.effective_rate.is_finite());

        let snap = h.engine.set_amount_to_send("1,250");
        assert_eq!(snap.inputs.amount_to_send, 1250.0);
    }

    #[test]
    fn test_outputs_are_stable_between_reads() {
        let h = default_harness();
        h.engine.set_amount_to_send("321.5");
        assert_eq!(h.engine.outputs(), h.engine.outputs());
    }

    #[test]
    fn test_receiving_amount_mirrors_until_overridden() {
        let h = default_harness();
        h.engine.set_amount_to_send("75");
        assert_eq!(h.engine.inputs().receiving_amount(), 75.0);
        h.engine.set_receiving_amount("70");
        h.engine.set_amount_to_send("80");
        assert_eq!(h.engine.inputs().receiving_amount(), 70.0);
        h.engine.clear_receiving_amount();
        assert_eq!(h.engine.inputs().receiving_amount(), 80.0);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Rate resolution
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_refresh_applies_primary_rate() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.4);

        let update = h.engine.refresh_rate().await.unwrap();
        assert!(matches!(update, RateUpdate::Applied(_)));
        assert_eq!(h.engine.latest_rate(), 88.4);
        assert_eq!(h.engine.exchange_rate_text(), "1 USD = 88.4 INR");
    }

    #[tokio::test]
    async fn test_second_refresh_within_ttl_uses_cache() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.4);
        h.engine.refresh_rate().await.unwrap();

        h.clock.advance(DEFAULT_TTL_MILLIS - 1);
        let update = h.engine.refresh_rate().await.unwrap();
        assert_eq!(update.resolved().source, RateSource::Cache);
        assert_eq!(h.primary.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_ttl_refetches() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.4);
        h.engine.refresh_rate().await.unwrap();

        h.primary.set_rate(pair("USD", "INR"), 88.6);
        h.clock.advance(DEFAULT_TTL_MILLIS);
        h.engine.refresh_rate().await.unwrap();
        assert_eq!(h.engine.latest_rate(), 88.6);
        assert_eq!(h.primary.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_primary_falls_through() {
        let h = default_harness();
        // Primary has no entry for the pair, as when `rates` is missing.
        h.secondary.set_rate(pair("USD", "INR"), 88.3);

        let update = h.engine.refresh_rate().await.unwrap();
        assert_eq!(
            update.resolved().source,
            RateSource::Provider("secondary".into())
        );
        assert_eq!(h.engine.latest_rate(), 88.3);
    }

    #[tokio::test]
    async fn test_network_down_uses_static_table() {
        let h = default_harness();
        h.primary.fail_all();
        h.secondary.fail_all();

        h.engine.refresh_rate().await.unwrap();
        assert_eq!(h.engine.latest_rate(), 88.1);
        assert_eq!(
            h.engine
                .resolver()
                .cache()
                .get(&pair("USD", "INR"))
                .map(|e| e.rate),
            Some(88.1)
        );
    }

    #[tokio::test]
    async fn test_failed_resolution_keeps_last_good_rate() {
        let h = default_harness();
        h.primary.set_rate(pair("JPY", "INR"), 0.59);
        h.engine.set_quote_currency("JPY").await.unwrap();
        assert_eq!(h.engine.latest_rate(), 0.59);

        h.primary.fail_all();
        h.secondary.fail_all();
        let before = h.engine.latest_rate();
        let err = h.engine.set_quote_currency("CHF").await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Rate(RateError::RateUnavailable(pair("CHF", "INR")))
        );
        assert_eq!(h.engine.latest_rate(), before);
        assert_eq!(h.engine.quote_currency(), CurrencyCode::new("CHF").unwrap());
    }

    #[tokio::test]
    async fn test_quote_equal_to_base_is_identity() {
        let h = default_harness();
        let update = h.engine.set_quote_currency("inr").await.unwrap();
        assert_eq!(update.resolved().source, RateSource::Identity);
        assert_eq!(h.engine.latest_rate(), 1.0);
        assert_eq!(h.primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_quote_fails_fast() {
        let h = default_harness();
        let err = h.engine.set_quote_currency("  ").await.unwrap_err();
        assert_eq!(err, EngineError::InvalidCurrencyPair);
        assert_eq!(h.engine.quote_currency(), CurrencyCode::usd());
        assert_eq!(h.primary.calls(), 0);
    }

    #[tokio::test]
    async fn test_last_issued_refresh_wins() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.4);
        h.primary.set_delay(pair("USD", "INR"), Duration::from_millis(50));
        h.primary.set_rate(pair("EUR", "INR"), 95.9);

        let (slow, fast) = tokio::join!(
            h.engine.set_quote_currency("USD"),
            h.engine.set_quote_currency("EUR"),
        );

        assert!(matches!(slow.unwrap(), RateUpdate::Superseded(_)));
        assert!(matches!(fast.unwrap(), RateUpdate::Applied(_)));
        assert_eq!(h.engine.quote_currency(), CurrencyCode::new("EUR").unwrap());
        assert_eq!(h.engine.latest_rate(), 95.9);
        // The superseded value is still cached for later use.
        assert_eq!(
            h.engine
                .resolver()
                .cache()
                .get(&pair("USD", "INR"))
                .map(|e| e.rate),
            Some(88.4)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_quote_change_discards_pending_refresh_for_old_pair() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.4);
        h.primary.set_delay(pair("USD", "INR"), Duration::from_millis(50));

        // XYZ is unknown to every source, so the new pair never resolves.
        let (pending, changed) = tokio::join!(
            h.engine.refresh_rate(),
            h.engine.set_quote_currency("XYZ"),
        );

        assert!(matches!(pending.unwrap(), RateUpdate::Superseded(_)));
        assert!(matches!(
            changed.unwrap_err(),
            EngineError::Rate(RateError::RateUnavailable(_))
        ));
        let snap = h.engine.snapshot();
        assert_eq!(snap.pair.quote, CurrencyCode::new("XYZ").unwrap());
        assert_eq!(snap.latest_rate, 88.0987);
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Currency state sync
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_controls_follow_quote_changes() {
        let h = default_harness();
        let send_select = Arc::new(PairMirror::new());
        let receive_badge = Arc::new(PairMirror::new());
        h.engine.subscribe(send_select.clone());
        h.engine.subscribe(receive_badge.clone());

        h.engine.set_quote_currency("GBP").await.unwrap();
        let expected = CurrencyPair::new(CurrencyCode::inr(), CurrencyCode::new("GBP").unwrap());
        assert_eq!(send_select.value(), Some(expected.clone()));
        assert_eq!(receive_badge.value(), Some(expected));
    }

    #[tokio::test]
    async fn test_set_currencies_pins_base() {
        let h = default_harness();
        h.engine.set_currencies("EUR", "AUD").await.unwrap();
        assert_eq!(h.engine.base_currency(), CurrencyCode::inr());
        assert_eq!(h.engine.quote_currency(), CurrencyCode::new("AUD").unwrap());
        assert_eq!(h.engine.latest_rate(), 58.0);
    }

    #[test]
    fn test_sync_from_state_is_idempotent() {
        let h = default_harness();
        let select = Arc::new(PairMirror::new());
        h.engine.subscribe(select.clone());
        let initial = select.value();

        h.engine.sync_from_state();
        h.engine.sync_from_state();
        assert_eq!(select.value(), initial);
        assert_eq!(h.engine.pair(), initial.unwrap());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Booking
    // ─────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_book_uses_resolved_rate() {
        let h = default_harness();
        h.primary.set_rate(pair("USD", "INR"), 88.0);
        h.engine.refresh_rate().await.unwrap();
        h.engine.set_amount_to_send("250");

        let payload = h.engine.book(Utc::now()).unwrap();
        assert_eq!(payload.exchange_rate.base_per_quote, 88.0);
        assert_eq!(payload.amount_in_base.value, 22000.0);
        assert_eq!(payload.totals.total_payable_in_base, 22000.0);
    }

    #[test]
    fn test_book_rejects_empty_amount() {
        let h = default_harness();
        let checks = h.engine.booking_checks();
        assert!(!checks.amount_to_send_positive);
        let err = h.engine.book(Utc::now()).unwrap_err();
        assert_eq!(err.messages().len(), 2);
    }
}
