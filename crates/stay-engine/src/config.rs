//! Typed property configuration.
//!
//! Replaces the deployment's free-form settings bag with a struct of
//! enumerated, validated fields. Loading clamps fractional fields into
//! range and canonicalizes coupon codes; pricing tiers that gap or overlap
//! are warned about but accepted, since tier matching is first-match-wins
//! either way and an operator may rely on that.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigError;

/// One dynamic-uplift tier, applied when the trailing-week view count falls
/// inside `[min_views, max_views]`. The first matching tier wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_views: u32,
    pub max_views: u32,
    pub uplift: Decimal,
}

/// How a coupon's amount is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponKind {
    FlatPerStay,
    PercentPerStay,
    FlatPerNight,
    PercentPerNight,
}

/// An operator-defined coupon. Redemption counts live in the
/// [`RedemptionLedger`](crate::redemption::RedemptionLedger), not here:
/// the definition is configuration, the count is runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDef {
    /// Canonical form is uppercase; lookups are case-insensitive.
    pub code: String,
    pub kind: CouponKind,
    pub amount: Decimal,
    /// 0 means unlimited.
    #[serde(default)]
    pub max_redemptions: u32,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyConfig {
    pub currency: String,
    pub base_rate: Decimal,
    pub tax_rate: Decimal,
    pub cleaning_fee: Decimal,
    pub damage_fee: Decimal,
    pub enable_damage_fee: bool,
    pub pricing_tiers: Vec<RateTier>,
    /// Global ceiling on the resolved uplift fraction.
    pub uplift_cap: Decimal,
    pub coupons: Vec<CouponDef>,
    /// Arrivals closer than this many days pay in full.
    pub deposit_threshold_days: i64,
    pub deposit_fraction: Decimal,
}

impl Default for PropertyConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            base_rate: Decimal::from(200),
            tax_rate: Decimal::new(12, 2),
            cleaning_fee: Decimal::from(150),
            damage_fee: Decimal::ZERO,
            enable_damage_fee: false,
            pricing_tiers: vec![
                RateTier {
                    min_views: 0,
                    max_views: 2,
                    uplift: Decimal::ZERO,
                },
                RateTier {
                    min_views: 3,
                    max_views: 5,
                    uplift: Decimal::new(5, 2),
                },
                RateTier {
                    min_views: 6,
                    max_views: 8,
                    uplift: Decimal::new(8, 2),
                },
                RateTier {
                    min_views: 9,
                    max_views: 999,
                    uplift: Decimal::new(12, 2),
                },
            ],
            uplift_cap: Decimal::new(15, 2),
            coupons: Vec::new(),
            deposit_threshold_days: 7,
            deposit_fraction: Decimal::new(5, 1),
        }
    }
}

impl PropertyConfig {
    /// Load configuration from JSON, normalizing and validating it.
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` for structurally unusable values (negative
    /// money fields, empty coupon codes).
    pub fn from_json(text: &str) -> std::result::Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(text)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Clamp fractional fields into range and canonicalize coupon codes,
    /// mirroring what the admin-side sanitizer guarantees.
    fn normalize(&mut self) {
        self.tax_rate = clamp_fraction(self.tax_rate);
        self.uplift_cap = clamp_fraction(self.uplift_cap);
        self.deposit_fraction = clamp_fraction(self.deposit_fraction);
        for tier in &mut self.pricing_tiers {
            tier.uplift = clamp_fraction(tier.uplift);
        }
        for coupon in &mut self.coupons {
            coupon.code = coupon.code.trim().to_uppercase();
            coupon.amount = match coupon.kind {
                CouponKind::PercentPerStay | CouponKind::PercentPerNight => {
                    coupon.amount.clamp(Decimal::ZERO, Decimal::from(100))
                }
                CouponKind::FlatPerStay | CouponKind::FlatPerNight => {
                    coupon.amount.max(Decimal::ZERO)
                }
            };
        }
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.base_rate < Decimal::ZERO {
            return Err(ConfigError::Invalid("base_rate must not be negative".into()));
        }
        if self.cleaning_fee < Decimal::ZERO || self.damage_fee < Decimal::ZERO {
            return Err(ConfigError::Invalid("fees must not be negative".into()));
        }
        if self.deposit_threshold_days < 0 {
            return Err(ConfigError::Invalid(
                "deposit_threshold_days must not be negative".into(),
            ));
        }
        if self.coupons.iter().any(|c| c.code.is_empty()) {
            return Err(ConfigError::Invalid("coupon codes must not be empty".into()));
        }

        warn_on_tier_anomalies(&self.pricing_tiers);
        Ok(())
    }
}

fn clamp_fraction(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

/// Tier matching is first-match-wins and nothing enforces disjoint,
/// contiguous ranges. Surface the anomalies at load time so an operator
/// can see them, without rejecting a configuration that may be deliberate.
fn warn_on_tier_anomalies(tiers: &[RateTier]) {
    let mut sorted: Vec<&RateTier> = tiers.iter().collect();
    sorted.sort_by_key(|t| (t.min_views, t.max_views));

    let mut next_uncovered = 0u32;
    for tier in sorted {
        if tier.min_views > tier.max_views {
            warn!(
                min_views = tier.min_views,
                max_views = tier.max_views,
                "pricing tier matches no view count"
            );
            continue;
        }
        if tier.min_views > next_uncovered {
            warn!(
                from = next_uncovered,
                to = tier.min_views - 1,
                "view counts match no pricing tier; uplift falls back to zero"
            );
        }
        if tier.min_views < next_uncovered {
            warn!(
                min_views = tier.min_views,
                max_views = tier.max_views,
                "pricing tiers overlap; the first match wins"
            );
        }
        next_uncovered = next_uncovered.max(tier.max_views.saturating_add(1));
    }
}
