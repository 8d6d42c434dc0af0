//! Implied rate of a level amortizing payment.
//!
//! Inverts `payment = P * r(1+r)^n / ((1+r)^n - 1)` for `r` by bisection on
//! `[RATE_SEARCH_LOWER, RATE_SEARCH_UPPER]`. The implied payment rises with
//! the rate across the whole interval, which is what makes bisection valid.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use super::{require_periods, require_positive};
use crate::error::FeePlanError;
use crate::settings::{
    EngineSettings, RateSearch, DEGENERATE_DENOMINATOR, MONTHS_PER_YEAR, PERCENT,
    RATE_SEARCH_LOWER, RATE_SEARCH_UPPER,
};
use crate::types::{Money, Rate};
use crate::FeePlanResult;

const TWO: Decimal = dec!(2);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level payment that retires `principal` over `periods` at periodic `rate`.
pub fn amortized_payment(principal: Money, rate: Rate, periods: u32) -> FeePlanResult<Money> {
    require_positive("principal", principal)?;
    require_periods("periods", periods)?;
    if rate < Decimal::ZERO {
        return Err(FeePlanError::invalid("rate", "Periodic rate cannot be negative"));
    }

    // A degenerate denominator only occurs when r*n is vanishingly small,
    // where the zero-rate limit is the right answer.
    Ok(payment_at(principal, rate, periods)
        .unwrap_or_else(|| principal / Decimal::from(periods)))
}

/// Periodic (monthly) rate implied by a level payment.
pub fn solve_periodic_rate(
    principal: Money,
    payment: Money,
    periods: u32,
    search: RateSearch,
) -> FeePlanResult<Rate> {
    require_positive("principal", principal)?;
    require_positive("payment", payment)?;
    require_periods("periods", periods)?;

    let (iterations, tolerance) = match search {
        RateSearch::FixedIterations(n) => (n, None),
        RateSearch::UntilConverged {
            tolerance,
            max_iterations,
        } => (max_iterations, Some(tolerance)),
    };

    let mut low = RATE_SEARCH_LOWER;
    let mut high = RATE_SEARCH_UPPER;
    let mut last_delta = Decimal::MAX;

    for _ in 0..iterations {
        let mid = (low + high) / TWO;

        let calculated = match payment_at(principal, mid, periods) {
            Some(p) => p,
            None => {
                high = mid;
                continue;
            }
        };

        last_delta = (calculated - payment).abs();
        if let Some(tol) = tolerance {
            if last_delta <= tol {
                return Ok(mid);
            }
        }

        if calculated < payment {
            low = mid;
        } else {
            high = mid;
        }
    }

    if tolerance.is_some() {
        tracing::warn!(iterations, %last_delta, "rate search did not converge");
        return Err(FeePlanError::NonConvergent {
            function: "equivalent rate search".into(),
            iterations,
            remaining: last_delta,
        });
    }

    Ok((low + high) / TWO)
}

/// Annualized percentage rate implied by a level payment (monthly rate x 12 x 100).
pub fn equivalent_apr(
    principal: Money,
    payment: Money,
    periods: u32,
    settings: &EngineSettings,
) -> FeePlanResult<Rate> {
    let monthly = solve_periodic_rate(principal, payment, periods, settings.rate_search)?;
    Ok(monthly * MONTHS_PER_YEAR * PERCENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Forward amortization formula. `None` when `(1+r)^n - 1` is degenerate.
fn payment_at(principal: Money, rate: Rate, periods: u32) -> Option<Money> {
    if rate.is_zero() {
        return Some(principal / Decimal::from(periods));
    }

    let growth = match (Decimal::ONE + rate).checked_powi(periods as i64) {
        Some(g) => g,
        // (1+r)^n beyond Decimal range: the payment has reached its limit P*r
        None => return Some(principal * rate),
    };

    let denominator = growth - Decimal::ONE;
    if denominator.abs() < DEGENERATE_DENOMINATOR {
        return None;
    }

    // P * r * g / (g - 1), ordered so large g cannot overflow
    Some(principal * rate * (growth / denominator))
}
