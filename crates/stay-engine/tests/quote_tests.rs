//! End-to-end quote scenarios through the calculator and the engine
//! facade.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use stay_engine::{
    calculate_quote, BookingEngine, CouponDef, CouponKind, EngineError, PropertyConfig,
    RedemptionLedger, ViewPressureState,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

fn dec(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn config_with_save10() -> PropertyConfig {
    PropertyConfig {
        coupons: vec![CouponDef {
            code: "SAVE10".to_string(),
            kind: CouponKind::PercentPerStay,
            amount: dec("10"),
            max_redemptions: 0,
            valid_from: None,
            valid_to: None,
        }],
        ..Default::default()
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn three_nights_no_uplift_no_coupon() {
    // Base 200, 3 nights, cleaning 150, tax 12%, arrival 10 days out.
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        None,
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.nights, 3);
    assert_eq!(quote.uplift_fraction, Decimal::ZERO);
    assert_eq!(quote.nightly_subtotal, dec("600"));
    assert_eq!(quote.pre_discount_subtotal, dec("750"));
    assert_eq!(quote.discount_amount, Decimal::ZERO);
    assert_eq!(quote.tax_amount, dec("90"));
    assert_eq!(quote.total, dec("840"));
    assert_eq!(quote.deposit_fraction, dec("0.5"));
    assert_eq!(quote.deposit_amount, dec("420"));
    assert_eq!(quote.balance_amount, dec("420"));
    assert!(quote.coupon.is_none());
    assert!(quote.coupon_error.is_none());
    assert!(quote.damage_fee.is_none());
}

#[test]
fn arrival_three_days_out_pays_in_full() {
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 4),
        date(2026, 6, 7),
        2,
        None,
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.total, dec("840"));
    assert_eq!(quote.deposit_fraction, Decimal::ONE);
    assert_eq!(quote.deposit_amount, dec("840"));
    assert_eq!(quote.balance_amount, Decimal::ZERO);
}

#[test]
fn save10_discounts_the_pre_discount_subtotal() {
    let config = config_with_save10();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        Some("SAVE10"),
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.discount_amount, dec("75"));
    assert_eq!(quote.subtotal, dec("675"));
    assert_eq!(quote.tax_amount, dec("81"));
    assert_eq!(quote.total, dec("756"));
    assert_eq!(quote.coupon.as_ref().unwrap().code, "SAVE10");
    assert!(quote.coupon_error.is_none());
}

#[test]
fn uplift_applies_before_fees() {
    // 4 recent views lands in the 3-5 tier at 5%.
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState {
        views: vec![now() - Duration::hours(2); 4],
        ..Default::default()
    };
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        None,
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.uplift_fraction, dec("0.05"));
    assert_eq!(quote.uplift_amount, dec("30"));
    assert_eq!(quote.pre_discount_subtotal, dec("780"));
}

#[test]
fn damage_fee_joins_when_enabled() {
    let config = PropertyConfig {
        enable_damage_fee: true,
        damage_fee: dec("75"),
        ..Default::default()
    };
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        None,
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.damage_fee, Some(dec("75")));
    assert_eq!(quote.pre_discount_subtotal, dec("825"));
}

// ============================================================================
// Edge behavior
// ============================================================================

#[test]
fn same_day_difference_still_bills_one_night() {
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 11),
        1,
        None,
        &mut visitor,
        &ledger,
        now(),
    );
    assert_eq!(quote.nights, 1);
}

#[test]
fn invalid_coupon_is_advisory_not_fatal() {
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        Some("BOGUS"),
        &mut visitor,
        &ledger,
        now(),
    );

    assert!(quote.coupon.is_none());
    assert!(quote.coupon_error.is_some());
    // The quote computes as if no discount applied.
    assert_eq!(quote.total, dec("840"));
}

#[test]
fn blank_coupon_code_raises_no_error() {
    let config = PropertyConfig::default();
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        Some("   "),
        &mut visitor,
        &ledger,
        now(),
    );
    assert!(quote.coupon_error.is_none());
}

#[test]
fn oversized_flat_coupon_never_drives_the_total_negative() {
    let config = PropertyConfig {
        coupons: vec![CouponDef {
            code: "HUGE".to_string(),
            kind: CouponKind::FlatPerStay,
            amount: dec("10000"),
            max_redemptions: 0,
            valid_from: None,
            valid_to: None,
        }],
        ..Default::default()
    };
    let mut visitor = ViewPressureState::default();
    let ledger = RedemptionLedger::new();

    let quote = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        Some("HUGE"),
        &mut visitor,
        &ledger,
        now(),
    );

    assert_eq!(quote.discount_amount, quote.pre_discount_subtotal);
    assert_eq!(quote.subtotal, Decimal::ZERO);
    assert_eq!(quote.total, Decimal::ZERO);
    assert_eq!(quote.deposit_amount + quote.balance_amount, quote.total);
}

#[test]
fn sticky_uplift_survives_view_count_changes_between_quotes() {
    let config = PropertyConfig::default();
    let ledger = RedemptionLedger::new();
    let mut visitor = ViewPressureState {
        views: vec![now() - Duration::hours(2); 7],
        ..Default::default()
    };

    let first = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        None,
        &mut visitor,
        &ledger,
        now(),
    );
    assert_eq!(first.uplift_fraction, dec("0.08"));

    stay_engine::mark_uplift_applied(&mut visitor, false, now());
    visitor.views.extend(vec![now(); 10]);

    let second = calculate_quote(
        &config,
        date(2026, 6, 11),
        date(2026, 6, 14),
        2,
        None,
        &mut visitor,
        &ledger,
        now() + Duration::hours(12),
    );
    assert_eq!(second.uplift_fraction, first.uplift_fraction);
}

// ============================================================================
// Engine facade
// ============================================================================

#[test]
fn engine_quote_parses_dates_and_computes() {
    let engine = BookingEngine::new(config_with_save10());
    let mut visitor = ViewPressureState::default();

    let quote = engine
        .quote(
            "2026-06-11",
            "2026-06-14",
            2,
            Some("save10"),
            &mut visitor,
            false,
            now(),
        )
        .unwrap();

    assert_eq!(quote.total, dec("756"));
    // The request itself counted as a view.
    assert_eq!(visitor.views.len(), 1);
}

#[test]
fn engine_rejects_unparseable_dates() {
    let engine = BookingEngine::new(PropertyConfig::default());
    let mut visitor = ViewPressureState::default();

    let err = engine
        .quote("soon", "2026-06-14", 2, None, &mut visitor, false, now())
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));
    // Nothing was tracked for a rejected request.
    assert!(visitor.views.is_empty());
}

#[test]
fn engine_rejects_inverted_ranges() {
    let engine = BookingEngine::new(PropertyConfig::default());
    let mut visitor = ViewPressureState::default();

    let err = engine
        .quote(
            "2026-06-14",
            "2026-06-11",
            2,
            None,
            &mut visitor,
            false,
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidRange { .. }));
}

#[test]
fn engine_surfaces_unavailability_distinctly() {
    let engine = BookingEngine::new(PropertyConfig::default());
    let mut visitor = ViewPressureState::default();

    engine
        .block_direct(
            "bk-1",
            date(2026, 6, 12),
            date(2026, 6, 16),
            2,
            "Reserved",
            now(),
        )
        .unwrap();

    let err = engine
        .quote(
            "2026-06-11",
            "2026-06-14",
            2,
            None,
            &mut visitor,
            false,
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Unavailable { .. }));

    // An abutting stay is fine.
    assert!(engine
        .quote(
            "2026-06-09",
            "2026-06-12",
            2,
            None,
            &mut visitor,
            false,
            now(),
        )
        .is_ok());
}

#[test]
fn double_booking_is_refused() {
    let engine = BookingEngine::new(PropertyConfig::default());

    engine
        .block_direct(
            "bk-1",
            date(2026, 6, 12),
            date(2026, 6, 16),
            2,
            "Reserved",
            now(),
        )
        .unwrap();

    let err = engine
        .block_direct(
            "bk-2",
            date(2026, 6, 14),
            date(2026, 6, 18),
            2,
            "Reserved",
            now(),
        )
        .unwrap_err();
    assert!(matches!(err, EngineError::Unavailable { .. }));
}

#[test]
fn engine_redemption_counting_is_idempotent() {
    let engine = BookingEngine::new(config_with_save10());

    assert!(engine.record_redemption("SAVE10", "bk-1"));
    assert!(!engine.record_redemption("SAVE10", "bk-1"));
    assert!(engine.record_redemption("SAVE10", "bk-2"));
    assert_eq!(engine.redemption_count("SAVE10"), 2);
}

#[test]
fn exhausted_coupon_becomes_advisory_error_on_the_next_quote() {
    let mut config = config_with_save10();
    config.coupons[0].max_redemptions = 1;
    let engine = BookingEngine::new(config);
    let mut visitor = ViewPressureState::default();

    engine.record_redemption("SAVE10", "bk-1");

    let quote = engine
        .quote(
            "2026-06-11",
            "2026-06-14",
            2,
            Some("SAVE10"),
            &mut visitor,
            false,
            now(),
        )
        .unwrap();
    assert!(quote.coupon.is_none());
    assert!(quote.coupon_error.is_some());
}

#[test]
fn do_not_track_skips_view_recording() {
    let engine = BookingEngine::new(PropertyConfig::default());
    let mut visitor = ViewPressureState::default();

    engine
        .quote(
            "2026-06-11",
            "2026-06-14",
            2,
            None,
            &mut visitor,
            true,
            now(),
        )
        .unwrap();
    assert!(visitor.views.is_empty());
}

#[test]
fn nightly_rates_cover_the_half_open_range() {
    let engine = BookingEngine::new(PropertyConfig::default());
    let mut visitor = ViewPressureState::default();

    let rates = engine.nightly_rates(date(2026, 6, 11), date(2026, 6, 14), &mut visitor, now());
    assert_eq!(rates.len(), 3);
    assert_eq!(rates[0].date, date(2026, 6, 11));
    assert_eq!(rates[2].date, date(2026, 6, 13));
    assert!(rates.iter().all(|r| r.amount == dec("200")));

    assert!(engine
        .nightly_rates(date(2026, 6, 14), date(2026, 6, 11), &mut visitor, now())
        .is_empty());
}
