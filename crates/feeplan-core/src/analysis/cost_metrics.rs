//! Back-of-envelope cost ratios that complement the solved APR.
//!
//! None of these account for the declining balance properly; they are the
//! quick figures a borrower would compute by hand, reported alongside the
//! exact rate for comparison.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::plan::PaymentPlan;
use crate::settings::{MONTHS_PER_YEAR, PERCENT};
use crate::types::Rate;

const HALF: Decimal = dec!(0.5);

/// Approximate annualized cost figures for a fixed-fee plan (all percentages).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMetrics {
    /// Total finance charge over the purchase amount, per year of term
    pub simple_interest_apr: Rate,
    /// Monthly fee as a share of the purchase amount
    pub monthly_fee_pct_of_purchase: Rate,
    /// Finance charge over the average balance (purchase / 2), per year
    pub average_balance_apr: Rate,
    /// Fees alone over the average balance, per year
    pub fee_only_apr: Rate,
}

/// Compute [`CostMetrics`] for an already validated plan.
pub fn cost_metrics(plan: &PaymentPlan) -> CostMetrics {
    let purchase = plan.purchase_amount;
    let years = Decimal::from(plan.num_payments) / MONTHS_PER_YEAR;
    let finance_charge = plan.total_cost() - purchase;
    let average_balance = purchase * HALF;

    CostMetrics {
        simple_interest_apr: finance_charge / purchase / years * PERCENT,
        monthly_fee_pct_of_purchase: plan.monthly_fee / purchase * PERCENT,
        average_balance_apr: finance_charge / average_balance / years * PERCENT,
        fee_only_apr: plan.total_fees() / average_balance / years * PERCENT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_for_reference_plan() {
        let plan = PaymentPlan {
            purchase_amount: dec!(1196.00),
            num_payments: 18,
            monthly_payment: dec!(80.73),
            monthly_fee: dec!(14.28),
        };
        let m = cost_metrics(&plan);
        // 257.14 finance charge / 1196 / 1.5 years
        assert!((m.simple_interest_apr - dec!(14.333)).abs() < dec!(0.001));
        assert!((m.monthly_fee_pct_of_purchase - dec!(1.194)).abs() < dec!(0.001));
        // Average balance doubles the simple rate
        assert!((m.average_balance_apr - dec!(28.666)).abs() < dec!(0.001));
        // 257.04 fees / 598 / 1.5
        assert!((m.fee_only_apr - dec!(28.655)).abs() < dec!(0.001));
    }

    #[test]
    fn test_interest_free_plan_has_zero_metrics() {
        let plan = PaymentPlan {
            purchase_amount: dec!(1200),
            num_payments: 12,
            monthly_payment: dec!(100),
            monthly_fee: Decimal::ZERO,
        };
        let m = cost_metrics(&plan);
        assert_eq!(m.simple_interest_apr, Decimal::ZERO);
        assert_eq!(m.fee_only_apr, Decimal::ZERO);
    }
}
