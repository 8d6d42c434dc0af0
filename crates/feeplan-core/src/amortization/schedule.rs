//! Month-by-month balance schedule of a fixed-fee plan.
//!
//! Every payment retires the same principal (payment minus fee); the fee is
//! a flat add-on rather than interest on the balance. Each row records what
//! that fee amounts to as a rate on the remaining balance and what interest
//! the reference APR would have charged on the same balance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::FeePlanError;
use crate::plan::PaymentPlan;
use crate::settings::{MONTHS_PER_YEAR, PERCENT};
use crate::types::{Money, Rate};
use crate::FeePlanResult;

/// A single row of the fixed-fee balance schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Month number (1-indexed)
    pub period: u32,
    /// Balance after this month's principal payment
    pub balance: Money,
    /// Principal retired this month
    pub principal_payment: Money,
    /// Fee charged this month
    pub fee: Money,
    /// Fee as a percentage of the remaining balance
    pub effective_monthly_rate: Rate,
    /// Interest the reference APR would charge on the remaining balance
    pub reference_interest: Money,
}

impl ScheduleEntry {
    /// Positive when the flat fee costs more than reference interest would.
    pub fn fee_minus_reference_interest(&self) -> Money {
        self.fee - self.reference_interest
    }

    /// Effective monthly rate scaled to a year (percent).
    pub fn annualized_effective_rate(&self) -> Rate {
        self.effective_monthly_rate * MONTHS_PER_YEAR
    }

    fn terminal(period: u32, principal_payment: Money, fee: Money) -> Self {
        ScheduleEntry {
            period,
            balance: Decimal::ZERO,
            principal_payment,
            fee,
            effective_monthly_rate: Decimal::ZERO,
            reference_interest: Decimal::ZERO,
        }
    }
}

/// Build the balance schedule for a fixed-fee plan.
///
/// The sequence ends with a zero-balance row, either when a payment would
/// overshoot the balance (possibly before `num_payments`) or in the final
/// month, which settles whatever residual remains.
pub fn build_schedule(
    purchase_amount: Money,
    monthly_payment: Money,
    monthly_fee: Money,
    num_payments: u32,
    reference_apr: Rate,
    balance_tolerance: Decimal,
) -> FeePlanResult<Vec<ScheduleEntry>> {
    let plan = PaymentPlan::new(purchase_amount, num_payments, monthly_payment, monthly_fee)?;
    if reference_apr < Decimal::ZERO {
        return Err(FeePlanError::invalid(
            "reference_apr",
            "Reference APR cannot be negative",
        ));
    }

    let principal_portion = plan.principal_payment();
    let reference_monthly_rate = reference_apr / PERCENT / MONTHS_PER_YEAR;

    let mut schedule = Vec::with_capacity(num_payments as usize);
    let mut balance = purchase_amount;

    for period in 1..=num_payments {
        let opening = balance;
        balance -= principal_portion;

        if balance <= Decimal::ZERO || period == num_payments {
            // Last payment retires exactly what was outstanding
            schedule.push(ScheduleEntry::terminal(period, opening, monthly_fee));
            break;
        }

        let effective_monthly_rate = if balance > balance_tolerance {
            monthly_fee / balance * PERCENT
        } else {
            Decimal::ZERO
        };

        schedule.push(ScheduleEntry {
            period,
            balance,
            principal_payment: principal_portion,
            fee: monthly_fee,
            effective_monthly_rate,
            reference_interest: balance * reference_monthly_rate,
        });
    }

    Ok(schedule)
}
