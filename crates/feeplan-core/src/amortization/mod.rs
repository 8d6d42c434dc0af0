//! Numeric building blocks: rate inversion, reference-APR amortization and
//! the fixed-fee balance schedule.

pub mod rate_solver;
pub mod reference;
pub mod schedule;

use rust_decimal::Decimal;

use crate::error::FeePlanError;
use crate::FeePlanResult;

pub(crate) fn require_positive(field: &str, value: Decimal) -> FeePlanResult<()> {
    if value <= Decimal::ZERO {
        return Err(FeePlanError::invalid(
            field,
            format!("{field} must be positive (got {value})"),
        ));
    }
    Ok(())
}

pub(crate) fn require_periods(field: &str, periods: u32) -> FeePlanResult<()> {
    if periods == 0 {
        return Err(FeePlanError::invalid(
            field,
            "Number of periods must be greater than zero",
        ));
    }
    Ok(())
}
