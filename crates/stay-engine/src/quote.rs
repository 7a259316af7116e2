//! Quote assembly: turns a stay request into a fully itemized quote.
//!
//! The calculation is pure over the configuration and the redemption
//! ledger, with one observable side effect: uplift resolution may refresh
//! the visitor's sticky state, and it must do so exactly once per
//! calculation -- never once per quote display refresh.
//!
//! Rounding is half-up to two decimals at exactly three points (tax,
//! total, deposit); every intermediate stays exact.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::config::PropertyConfig;
use crate::pressure::ViewPressureState;
use crate::pricing::{self, Coupon};
use crate::redemption::RedemptionLedger;

/// A fully itemized monetary quote for one stay. Immutable once computed;
/// the checkout path snapshots it onto the booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub currency: String,
    pub nights: i64,
    pub guests: u32,
    pub base_rate: Decimal,
    pub uplift_fraction: Decimal,
    pub uplift_amount: Decimal,
    pub nightly_subtotal: Decimal,
    pub cleaning_fee: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_fee: Option<Decimal>,
    pub pre_discount_subtotal: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<Coupon>,
    pub discount_amount: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub subtotal: Decimal,
    pub total: Decimal,
    pub deposit_fraction: Decimal,
    pub deposit_amount: Decimal,
    pub balance_amount: Decimal,
    /// Advisory: set when a code was supplied but did not resolve. The
    /// quote still computes without the discount; booking creation treats
    /// this as a validation failure even though quoting does not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_error: Option<String>,
}

/// A single day's advertised rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightlyRate {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// Round half-up to cents.
fn to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute an itemized quote. The caller has already validated the range;
/// a same-day pair still bills one night.
#[allow(clippy::too_many_arguments)]
pub fn calculate_quote(
    config: &PropertyConfig,
    arrival: NaiveDate,
    departure: NaiveDate,
    guests: u32,
    coupon_code: Option<&str>,
    visitor: &mut ViewPressureState,
    ledger: &RedemptionLedger,
    now: DateTime<Utc>,
) -> Quote {
    let nights = (departure - arrival).num_days().max(1);
    let nightly_subtotal = config.base_rate * Decimal::from(nights);

    // The one side effect of quoting: the sticky uplift state may be
    // refreshed here.
    let uplift_fraction =
        pricing::resolve_uplift(visitor, &config.pricing_tiers, config.uplift_cap, now);
    let uplift_amount = nightly_subtotal * uplift_fraction;
    let nightly_total = nightly_subtotal + uplift_amount;

    let damage_fee = config.enable_damage_fee.then_some(config.damage_fee);
    let pre_discount_subtotal =
        nightly_total + config.cleaning_fee + damage_fee.unwrap_or(Decimal::ZERO);

    let supplied = coupon_code.map(str::trim).filter(|code| !code.is_empty());
    let coupon =
        supplied.and_then(|code| pricing::resolve_coupon(code, arrival, &config.coupons, ledger));
    let coupon_error = match (supplied, &coupon) {
        (Some(_), None) => Some("Coupon code is invalid, expired, or fully redeemed.".to_string()),
        _ => None,
    };

    let discount_amount = coupon.as_ref().map_or(Decimal::ZERO, |c| {
        pricing::resolve_discount(c, nightly_subtotal, pre_discount_subtotal, nights)
            .amount
            .max(Decimal::ZERO)
            .min(pre_discount_subtotal)
    });

    let subtotal = (pre_discount_subtotal - discount_amount).max(Decimal::ZERO);
    let tax_amount = to_cents(subtotal * config.tax_rate);
    let total = to_cents(subtotal + tax_amount);

    let deposit_fraction = pricing::resolve_deposit_fraction(
        arrival,
        now,
        config.deposit_threshold_days,
        config.deposit_fraction,
    );
    let deposit_amount = to_cents(total * deposit_fraction);
    let balance_amount = total - deposit_amount;

    Quote {
        currency: config.currency.clone(),
        nights,
        guests,
        base_rate: config.base_rate,
        uplift_fraction,
        uplift_amount,
        nightly_subtotal,
        cleaning_fee: config.cleaning_fee,
        damage_fee,
        pre_discount_subtotal,
        coupon,
        discount_amount,
        tax_rate: config.tax_rate,
        tax_amount,
        subtotal,
        total,
        deposit_fraction,
        deposit_amount,
        balance_amount,
        coupon_error,
    }
}

/// Per-day rate calendar: the base rate with the visitor's current uplift
/// applied, one entry per night in `[from, to)`. Empty when the range is
/// inverted or empty.
///
/// Reads the uplift through the same sticky resolution path as quoting,
/// so a frozen uplift shows the same advertised rates the quote charges.
pub fn nightly_rates(
    config: &PropertyConfig,
    from: NaiveDate,
    to: NaiveDate,
    visitor: &mut ViewPressureState,
    now: DateTime<Utc>,
) -> Vec<NightlyRate> {
    if to <= from {
        return Vec::new();
    }

    let uplift = pricing::resolve_uplift(visitor, &config.pricing_tiers, config.uplift_cap, now);
    let amount = to_cents(config.base_rate * (Decimal::ONE + uplift));

    from.iter_days()
        .take_while(|day| *day < to)
        .map(|date| NightlyRate { date, amount })
        .collect()
}
