//! Engine tunables. Every literal the numeric routines depend on lives here
//! and is passed in explicitly through [`EngineSettings`].

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Reference APR (percent) used when a config record does not supply one.
pub const DEFAULT_REFERENCE_APR: Rate = dec!(27);

/// Upper bound on simulated reference-amortization periods.
pub const MAX_REFERENCE_PERIODS: u32 = 1000;

/// Balances at or below this amount count as paid off.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

/// Halvings performed by the fixed-iteration rate search.
pub const RATE_SEARCH_ITERATIONS: u32 = 100;

/// Lower bound of the monthly rate search interval.
pub const RATE_SEARCH_LOWER: Rate = dec!(0.000001);

/// Upper bound of the monthly rate search interval (100% per month).
pub const RATE_SEARCH_UPPER: Rate = dec!(1);

/// Below this magnitude `(1+r)^n - 1` is treated as degenerate.
pub const DEGENERATE_DENOMINATOR: Decimal = dec!(0.0000000001);

pub const MONTHS_PER_YEAR: Decimal = dec!(12);
pub const PERCENT: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Stopping rule for the bisection in the rate solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSearch {
    /// Always run exactly this many halvings.
    FixedIterations(u32),
    /// Stop once the implied payment is within `tolerance` of the target.
    UntilConverged {
        tolerance: Decimal,
        max_iterations: u32,
    },
}

impl Default for RateSearch {
    fn default() -> Self {
        RateSearch::FixedIterations(RATE_SEARCH_ITERATIONS)
    }
}

/// Parameters shared by every analysis step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Reference APR as a percentage (27 = 27%)
    pub reference_apr: Rate,
    /// Safety cap on reference amortization periods
    pub max_reference_periods: u32,
    /// Payoff tolerance for remaining balances
    pub balance_tolerance: Decimal,
    /// Stopping rule for the equivalent-APR search
    pub rate_search: RateSearch,
}

impl Default for EngineSettings {
    fn default() -> Self {
        EngineSettings {
            reference_apr: DEFAULT_REFERENCE_APR,
            max_reference_periods: MAX_REFERENCE_PERIODS,
            balance_tolerance: BALANCE_TOLERANCE,
            rate_search: RateSearch::default(),
        }
    }
}

impl EngineSettings {
    /// Default settings with a different reference APR.
    pub fn with_reference_apr(reference_apr: Rate) -> Self {
        EngineSettings {
            reference_apr,
            ..Default::default()
        }
    }

    /// Reference APR as a decimal monthly rate (27% -> 0.0225).
    pub fn reference_monthly_rate(&self) -> Rate {
        self.reference_apr / PERCENT / MONTHS_PER_YEAR
    }

    /// Reference APR as a flat monthly percentage (27% -> 2.25).
    pub fn reference_monthly_pct(&self) -> Rate {
        self.reference_apr / MONTHS_PER_YEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = EngineSettings::default();
        assert_eq!(s.reference_apr, dec!(27));
        assert_eq!(s.max_reference_periods, 1000);
        assert_eq!(s.balance_tolerance, dec!(0.01));
        assert_eq!(s.rate_search, RateSearch::FixedIterations(100));
    }

    #[test]
    fn test_monthly_conversions() {
        let s = EngineSettings::default();
        assert_eq!(s.reference_monthly_rate(), dec!(0.0225));
        assert_eq!(s.reference_monthly_pct(), dec!(2.25));
    }
}
