//! Declining-balance repayment at a reference APR.
//!
//! Interest accrues monthly on the outstanding balance and the fixed payment
//! covers interest first. Used to price the "just put it on the card"
//! alternative to a fixed-fee plan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::require_positive;
use crate::error::FeePlanError;
use crate::settings::{EngineSettings, MONTHS_PER_YEAR, PERCENT};
use crate::types::{Money, Rate};
use crate::FeePlanResult;

/// Outcome of a reference-APR amortization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceAmortization {
    /// Total paid minus principal. Includes any over-payment in the last month.
    pub total_interest: Money,
    /// Number of payments made
    pub period_count: u32,
}

/// Simulate repaying `principal` with a level `payment` at
/// `annual_percent_rate` (percent) compounded monthly.
///
/// Stops once the balance is within `settings.balance_tolerance` of zero.
/// Fails with `NonConvergent` rather than truncating when a payment no longer
/// covers the month's interest, or when the balance is still outstanding
/// after `settings.max_reference_periods` payments.
pub fn amortize(
    principal: Money,
    annual_percent_rate: Rate,
    payment: Money,
    settings: &EngineSettings,
) -> FeePlanResult<ReferenceAmortization> {
    require_positive("principal", principal)?;
    require_positive("payment", payment)?;
    if annual_percent_rate < Decimal::ZERO {
        return Err(FeePlanError::invalid(
            "reference_apr",
            "Reference APR cannot be negative",
        ));
    }

    let monthly_rate = annual_percent_rate / PERCENT / MONTHS_PER_YEAR;
    let mut balance = principal;
    let mut total_paid = Decimal::ZERO;
    let mut periods: u32 = 0;

    while balance > settings.balance_tolerance {
        if periods >= settings.max_reference_periods {
            tracing::warn!(
                periods,
                %balance,
                %annual_percent_rate,
                %payment,
                "reference amortization hit the period cap"
            );
            return Err(non_convergent(periods, balance));
        }

        let interest = balance * monthly_rate;
        if interest >= payment {
            // Balance can only grow from here
            tracing::warn!(
                periods,
                %balance,
                %interest,
                %payment,
                "reference payment does not cover interest"
            );
            return Err(non_convergent(periods, balance));
        }
        let principal_portion = (payment - interest).min(balance);

        balance -= principal_portion;
        total_paid += payment;
        periods += 1;
    }

    Ok(ReferenceAmortization {
        total_interest: total_paid - principal,
        period_count: periods,
    })
}

fn non_convergent(periods: u32, balance: Money) -> FeePlanError {
    FeePlanError::NonConvergent {
        function: "reference amortization".into(),
        iterations: periods,
        remaining: balance,
    }
}
