//! Rate and discount policy: uplift tiers, coupon validity, discount
//! amounts, deposit timing.
//!
//! Every resolver is a plain function over explicit inputs. The one
//! stateful wrinkle is [`resolve_uplift`], which owns the sticky-cooldown
//! rule and may refresh the visitor's frozen uplift value.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::{CouponDef, CouponKind, RateTier};
use crate::pressure::ViewPressureState;
use crate::redemption::RedemptionLedger;

/// Hours a freshly applied uplift stays frozen.
pub const UPLIFT_COOLDOWN_HOURS: i64 = 48;

/// A coupon resolved against an arrival date and the redemption ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Coupon {
    pub code: String,
    pub kind: CouponKind,
    pub amount: Decimal,
    pub max_redemptions: u32,
    pub redemption_count: u32,
}

/// A resolved discount: the monetary amount plus the percentage rate it
/// came from (zero for flat kinds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discount {
    pub amount: Decimal,
    pub rate: Decimal,
}

/// Resolve the demand uplift fraction for a visitor.
///
/// Prunes stale views, takes the first configured tier containing the
/// count (zero when none match), and clamps to the global cap. Then the
/// sticky rule: within 48 hours of an applied uplift the frozen value wins
/// and the state is left untouched; outside the window the fresh value is
/// persisted as the new frozen value and returned.
pub fn resolve_uplift(
    state: &mut ViewPressureState,
    tiers: &[RateTier],
    cap: Decimal,
    now: DateTime<Utc>,
) -> Decimal {
    let count = state.recent_views(now) as u32;

    let mut uplift = Decimal::ZERO;
    for tier in tiers {
        if count >= tier.min_views && count <= tier.max_views {
            uplift = tier.uplift;
            break;
        }
    }
    uplift = uplift.min(cap);

    if let Some(applied_at) = state.last_applied {
        if now < applied_at + Duration::hours(UPLIFT_COOLDOWN_HOURS) {
            return state.last_uplift;
        }
    }

    state.last_uplift = uplift;
    uplift
}

/// Look up a coupon code for a stay arriving on `arrival`.
///
/// Returns `None` for an empty code, an unknown code, a code whose
/// validity window excludes the arrival date, or a fully redeemed code.
/// The caller distinguishes "no code supplied" from "code supplied but
/// invalid" to decide whether an error is worth showing.
pub fn resolve_coupon(
    code: &str,
    arrival: NaiveDate,
    coupons: &[CouponDef],
    ledger: &RedemptionLedger,
) -> Option<Coupon> {
    let code = code.trim().to_uppercase();
    if code.is_empty() {
        return None;
    }

    let def = coupons.iter().find(|c| c.code == code)?;

    if let Some(from) = def.valid_from {
        if arrival < from {
            return None;
        }
    }
    if let Some(to) = def.valid_to {
        if arrival > to {
            return None;
        }
    }

    let redemption_count = ledger.count(&code);
    if def.max_redemptions > 0 && redemption_count >= def.max_redemptions {
        return None;
    }

    Some(Coupon {
        code,
        kind: def.kind,
        amount: def.amount,
        max_redemptions: def.max_redemptions,
        redemption_count,
    })
}

/// Turn a resolved coupon into a discount against the quoted amounts.
///
/// `nightly_subtotal` is the pre-uplift base rate times nights. Flooring
/// at zero and capping at the pre-discount subtotal are the caller's job.
pub fn resolve_discount(
    coupon: &Coupon,
    nightly_subtotal: Decimal,
    pre_discount_subtotal: Decimal,
    nights: i64,
) -> Discount {
    match coupon.kind {
        CouponKind::FlatPerStay => Discount {
            amount: coupon.amount,
            rate: Decimal::ZERO,
        },
        CouponKind::PercentPerStay => {
            let rate = coupon.amount / Decimal::from(100);
            Discount {
                amount: pre_discount_subtotal * rate,
                rate,
            }
        }
        CouponKind::PercentPerNight => {
            let rate = coupon.amount / Decimal::from(100);
            Discount {
                amount: nightly_subtotal * rate,
                rate,
            }
        }
        CouponKind::FlatPerNight => Discount {
            amount: (coupon.amount * Decimal::from(nights.max(1))).min(nightly_subtotal),
            rate: Decimal::ZERO,
        },
    }
}

/// Deposit fraction for a stay arriving on `arrival`, quoted at `now`.
///
/// Counts whole days between now and arrival (zero when the arrival is
/// already past); closer than the threshold the guest pays in full,
/// otherwise the configured fraction applies, clamped to `[0, 1]`.
pub fn resolve_deposit_fraction(
    arrival: NaiveDate,
    now: DateTime<Utc>,
    threshold_days: i64,
    fraction: Decimal,
) -> Decimal {
    let days_until = (arrival - now.date_naive()).num_days().max(0);
    if days_until < threshold_days {
        return Decimal::ONE;
    }
    fraction.clamp(Decimal::ZERO, Decimal::ONE)
}
