//! Fee computation for a resolved rate.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use thiserror::Error;

use crate::models::Rate;

/// Upper bound on the configurable fee precision.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Rounding policy applied to computed fees.
///
/// Fees round half to even at `decimal_places`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePolicy {
    pub decimal_places: u32,
}

impl FeePolicy {
    pub fn new(decimal_places: u32) -> Self {
        Self {
            decimal_places: decimal_places.min(MAX_DECIMAL_PLACES),
        }
    }

    pub fn round(&self, value: Decimal) -> Decimal {
        let mut rounded =
            value.round_dp_with_strategy(self.decimal_places, RoundingStrategy::MidpointNearestEven);
        rounded.rescale(self.decimal_places);
        rounded
    }
}

impl Default for FeePolicy {
    fn default() -> Self {
        Self { decimal_places: 2 }
    }
}

/// Fee charged for one transaction under one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FeeBreakdown {
    pub amount: Decimal,
    /// Commission percentage as stored on the rate.
    pub commission_rate: Decimal,
    pub commission_fee: Decimal,
    pub surcharge: Decimal,
    pub total_fee: Decimal,
}

/// Fee arithmetic left the representable `Decimal` range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fee for amount {amount} at rate {rate_id} exceeds the representable range")]
pub struct FeeOverflow {
    pub rate_id: i64,
    pub amount: Decimal,
}

/// `amount * commission / 100 + surcharge`.
///
/// The total is rounded once from the exact sum; the reported components are
/// rounded independently and may not add up to the total in the last place.
pub fn compute_fee(
    rate: &Rate,
    amount: Decimal,
    policy: FeePolicy,
) -> Result<FeeBreakdown, FeeOverflow> {
    let overflow = || FeeOverflow {
        rate_id: rate.id,
        amount,
    };
    let commission = amount
        .checked_mul(rate.commission)
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
        .ok_or_else(overflow)?;
    let total = commission.checked_add(rate.surcharge).ok_or_else(overflow)?;

    Ok(FeeBreakdown {
        amount,
        commission_rate: rate.commission,
        commission_fee: policy.round(commission),
        surcharge: policy.round(rate.surcharge),
        total_fee: policy.round(total),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn rate(commission: Decimal, surcharge: Decimal) -> Rate {
        Rate {
            id: 1,
            gateway_id: 1,
            card_type: "R".to_string(),
            card_issuer: "others".to_string(),
            category: "education".to_string(),
            commission,
            surcharge,
            min_amount: dec!(100),
            max_amount: dec!(50000),
        }
    }

    #[test]
    fn test_commission_only() {
        let fee = compute_fee(&rate(dec!(1.6), dec!(0)), dec!(50000), FeePolicy::default()).unwrap();
        assert_eq!(fee.commission_fee.to_string(), "800.00");
        assert_eq!(fee.surcharge.to_string(), "0.00");
        assert_eq!(fee.total_fee.to_string(), "800.00");
    }

    #[test]
    fn test_commission_with_surcharge() {
        let fee = compute_fee(&rate(dec!(2.9), dec!(25)), dec!(1000), FeePolicy::default()).unwrap();
        assert_eq!(fee.commission_fee, dec!(29));
        assert_eq!(fee.total_fee.to_string(), "54.00");
    }

    #[test]
    fn test_half_even_rounding() {
        let policy = FeePolicy::default();
        assert_eq!(policy.round(dec!(0.125)), dec!(0.12));
        assert_eq!(policy.round(dec!(0.135)), dec!(0.14));
        assert_eq!(policy.round(dec!(2.5)).to_string(), "2.50");
    }

    #[test]
    fn test_fractional_commission() {
        // 2.7178% of 333.33 = 9.05924274
        let fee = compute_fee(&rate(dec!(2.7178), dec!(0)), dec!(333.33), FeePolicy::default()).unwrap();
        assert_eq!(fee.commission_fee, dec!(9.06));
        assert_eq!(fee.commission_rate, dec!(2.7178));
    }

    #[test]
    fn test_zero_amount() {
        let fee = compute_fee(&rate(dec!(1.5), dec!(3)), dec!(0), FeePolicy::default()).unwrap();
        assert_eq!(fee.commission_fee, dec!(0));
        assert_eq!(fee.total_fee, dec!(3));
    }

    #[test]
    fn test_custom_precision_is_capped() {
        assert_eq!(FeePolicy::new(4).decimal_places, 4);
        assert_eq!(FeePolicy::new(20).decimal_places, MAX_DECIMAL_PLACES);

        let fee = compute_fee(&rate(dec!(2.7178), dec!(0)), dec!(333.33), FeePolicy::new(4)).unwrap();
        assert_eq!(fee.commission_fee.to_string(), "9.0592");
    }

    #[test]
    fn test_overflow_is_reported() {
        let mut wide = rate(dec!(2), dec!(0));
        wide.max_amount = Decimal::MAX;

        let err = compute_fee(&wide, Decimal::MAX, FeePolicy::default()).unwrap_err();
        assert_eq!(
            err,
            FeeOverflow {
                rate_id: 1,
                amount: Decimal::MAX,
            }
        );
    }

    #[test]
    fn test_surcharge_overflow_is_reported() {
        let fee = compute_fee(&rate(dec!(0), Decimal::MAX), dec!(100), FeePolicy::default());
        assert!(fee.is_ok());

        let fee = compute_fee(
            &rate(dec!(100), Decimal::MAX),
            Decimal::MAX / dec!(2),
            FeePolicy::default(),
        );
        assert!(fee.is_err());
    }
}
