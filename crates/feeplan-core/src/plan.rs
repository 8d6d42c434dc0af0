use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FeePlanError;
use crate::types::Money;
use crate::FeePlanResult;

/// A fixed-fee installment plan: equal monthly payments, each of which
/// carries the same flat fee on top of the principal it retires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Amount financed
    pub purchase_amount: Money,
    /// Number of monthly payments
    pub num_payments: u32,
    /// Monthly payment including the fee
    pub monthly_payment: Money,
    /// Flat fee included in every monthly payment
    pub monthly_fee: Money,
}

impl PaymentPlan {
    /// Build a plan, rejecting anything [`PaymentPlan::validate`] would.
    pub fn new(
        purchase_amount: Money,
        num_payments: u32,
        monthly_payment: Money,
        monthly_fee: Money,
    ) -> FeePlanResult<Self> {
        let plan = PaymentPlan {
            purchase_amount,
            num_payments,
            monthly_payment,
            monthly_fee,
        };
        plan.validate()?;
        Ok(plan)
    }

    /// Portion of each payment that retires principal.
    pub fn principal_payment(&self) -> Money {
        self.monthly_payment - self.monthly_fee
    }

    pub fn total_cost(&self) -> Money {
        self.monthly_payment * Decimal::from(self.num_payments)
    }

    pub fn total_fees(&self) -> Money {
        self.monthly_fee * Decimal::from(self.num_payments)
    }

    /// Checks the plan is well formed. Plans are deserialized directly from
    /// config records, so the analyzer calls this again rather than trusting
    /// construction.
    ///
    /// Net payments that fall a little short of the purchase amount (rounded
    /// retail plans) are accepted; the final payment settles the remainder.
    pub fn validate(&self) -> FeePlanResult<()> {
        if self.purchase_amount <= Decimal::ZERO {
            return Err(FeePlanError::invalid(
                "purchase_amount",
                "Purchase amount must be positive",
            ));
        }
        if self.num_payments == 0 {
            return Err(FeePlanError::invalid(
                "num_payments",
                "Number of payments must be greater than zero",
            ));
        }
        if self.monthly_payment <= Decimal::ZERO {
            return Err(FeePlanError::invalid(
                "monthly_payment",
                "Monthly payment must be positive",
            ));
        }
        if self.monthly_fee < Decimal::ZERO {
            return Err(FeePlanError::invalid(
                "monthly_fee",
                "Monthly fee cannot be negative",
            ));
        }
        if self.monthly_fee >= self.monthly_payment {
            return Err(FeePlanError::invalid(
                "monthly_fee",
                format!(
                    "Monthly fee {} must be less than the monthly payment {}",
                    self.monthly_fee, self.monthly_payment
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> PaymentPlan {
        PaymentPlan {
            purchase_amount: dec!(1196.00),
            num_payments: 18,
            monthly_payment: dec!(80.73),
            monthly_fee: dec!(14.28),
        }
    }

    fn field_of(err: FeePlanError) -> String {
        match err {
            FeePlanError::InvalidPlan { field, .. } => field,
            other => panic!("Expected InvalidPlan, got {other:?}"),
        }
    }

    #[test]
    fn test_totals() {
        let plan = sample();
        assert_eq!(plan.total_cost(), dec!(1453.14));
        assert_eq!(plan.total_fees(), dec!(257.04));
        assert_eq!(plan.principal_payment(), dec!(66.45));
    }

    #[test]
    fn test_new_accepts_valid_plan() {
        let plan = PaymentPlan::new(dec!(200.00), 18, dec!(13.51), dec!(2.39)).unwrap();
        assert_eq!(plan.num_payments, 18);
    }

    #[test]
    fn test_rejects_non_positive_purchase() {
        let mut plan = sample();
        plan.purchase_amount = Decimal::ZERO;
        let err = plan.validate().unwrap_err();
        assert_eq!(field_of(err), "purchase_amount");
    }

    #[test]
    fn test_rejects_zero_payments() {
        let mut plan = sample();
        plan.num_payments = 0;
        let err = plan.validate().unwrap_err();
        assert_eq!(field_of(err), "num_payments");
    }

    #[test]
    fn test_rejects_non_positive_payment() {
        let mut plan = sample();
        plan.monthly_payment = dec!(-1);
        let err = plan.validate().unwrap_err();
        assert_eq!(field_of(err), "monthly_payment");
    }

    #[test]
    fn test_rejects_fee_at_or_above_payment() {
        let mut plan = sample();
        plan.monthly_fee = plan.monthly_payment;
        let err = plan.validate().unwrap_err();
        assert_eq!(field_of(err), "monthly_fee");
    }

    #[test]
    fn test_rejects_negative_fee() {
        let mut plan = sample();
        plan.monthly_fee = dec!(-0.50);
        let err = plan.validate().unwrap_err();
        assert_eq!(field_of(err), "monthly_fee");
    }

    #[test]
    fn test_accepts_rounded_plan_short_of_purchase() {
        // 12 x 83.33 = 999.96 against a 1000 purchase
        let plan = PaymentPlan::new(dec!(1000), 12, dec!(83.33), Decimal::ZERO).unwrap();
        assert!(plan.principal_payment() * dec!(12) < plan.purchase_amount);

        // 18 x 66.44 = 1195.92 against 1196.00
        let mut plan = sample();
        plan.monthly_payment = dec!(80.72);
        assert!(plan.validate().is_ok());
    }
}
