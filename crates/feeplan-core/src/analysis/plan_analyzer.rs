//! Fixed-fee plan versus reference-APR financing.
//!
//! Solves the plan's equivalent APR, prices the same purchase repaid at the
//! reference APR, builds the balance schedule, and finds the month after
//! which the flat fee costs more than reference interest on what is left.

use std::time::Instant;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cost_metrics::{cost_metrics, CostMetrics};
use crate::amortization::rate_solver::equivalent_apr;
use crate::amortization::reference::amortize;
use crate::amortization::schedule::{build_schedule, ScheduleEntry};
use crate::error::FeePlanError;
use crate::plan::PaymentPlan;
use crate::settings::{EngineSettings, DEFAULT_REFERENCE_APR, MONTHS_PER_YEAR};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::FeePlanResult;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A config record: plans to analyze against one reference APR.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanSetInput {
    /// Reference APR in percent
    #[serde(default = "default_regular_apr")]
    pub regular_apr: Rate,
    /// Plans, analyzed in order
    pub payment_plans: Vec<PaymentPlan>,
}

fn default_regular_apr() -> Rate {
    DEFAULT_REFERENCE_APR
}

impl PlanSetInput {
    /// Engine settings for this record (defaults plus its reference APR).
    pub fn settings(&self) -> EngineSettings {
        EngineSettings::with_reference_apr(self.regular_apr)
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Full analysis of one fixed-fee plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub purchase_amount: Money,
    pub num_payments: u32,
    pub monthly_payment: Money,
    pub monthly_fee: Money,
    /// Reference APR the plan was compared against (percent)
    pub reference_apr: Rate,
    /// Sum of all scheduled payments
    pub total_cost: Money,
    /// Sum of all scheduled fees
    pub total_fees: Money,
    /// APR at which a standard loan would carry the same monthly payment
    pub equivalent_apr: Rate,
    /// Interest paid repaying the purchase at the reference APR
    pub reference_interest: Money,
    /// Purchase amount plus reference interest
    pub reference_total_cost: Money,
    /// Payments needed at the reference APR
    pub reference_payments: u32,
    /// Fixed plan cost minus reference cost; negative means the plan is cheaper
    pub difference: Money,
    /// Month-by-month balance schedule
    pub schedule: Vec<ScheduleEntry>,
    /// Months whose fee rate exceeds the reference monthly rate
    pub high_cost_periods: Vec<ScheduleEntry>,
    /// Last month worth staying on the plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimal_payoff_period: Option<u32>,
    /// Balance to pay off after the optimal month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining_balance_at_optimal: Option<Money>,
    /// Rule-of-thumb cost ratios
    pub cost_metrics: CostMetrics,
}

impl AnalysisResult {
    pub fn costs_more_than_reference(&self) -> bool {
        self.difference > Decimal::ZERO
    }

    /// True when the schedule reaches zero before the last scheduled payment.
    pub fn pays_off_early(&self) -> bool {
        (self.schedule.len() as u32) < self.num_payments
    }

    /// Schedule row for `period`, if the schedule reaches it.
    pub fn entry(&self, period: u32) -> Option<&ScheduleEntry> {
        self.schedule.iter().find(|e| e.period == period)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Analyze a plan against `settings.reference_apr`.
///
/// Pure and deterministic: identical inputs give identical results.
pub fn analyze(plan: &PaymentPlan, settings: &EngineSettings) -> FeePlanResult<AnalysisResult> {
    plan.validate()?;
    let reference_apr = settings.reference_apr;

    let total_cost = plan.total_cost();
    let total_fees = plan.total_fees();

    let equivalent_apr = equivalent_apr(
        plan.purchase_amount,
        plan.monthly_payment,
        plan.num_payments,
        settings,
    )?;

    let reference = amortize(
        plan.purchase_amount,
        reference_apr,
        plan.principal_payment(),
        settings,
    )?;
    let reference_total_cost = plan.purchase_amount + reference.total_interest;
    let difference = total_cost - reference_total_cost;

    let schedule = build_schedule(
        plan.purchase_amount,
        plan.monthly_payment,
        plan.monthly_fee,
        plan.num_payments,
        reference_apr,
        settings.balance_tolerance,
    )?;

    let threshold = settings.reference_monthly_pct();
    let high_cost_periods: Vec<ScheduleEntry> = schedule
        .iter()
        .filter(|e| e.effective_monthly_rate > threshold)
        .cloned()
        .collect();

    let (optimal_payoff_period, remaining_balance_at_optimal) =
        optimal_payoff(&schedule, &high_cost_periods);

    tracing::debug!(
        purchase_amount = %plan.purchase_amount,
        num_payments = plan.num_payments,
        %equivalent_apr,
        %difference,
        high_cost = high_cost_periods.len(),
        ?optimal_payoff_period,
        "analyzed fixed-fee plan"
    );

    Ok(AnalysisResult {
        purchase_amount: plan.purchase_amount,
        num_payments: plan.num_payments,
        monthly_payment: plan.monthly_payment,
        monthly_fee: plan.monthly_fee,
        reference_apr,
        total_cost,
        total_fees,
        equivalent_apr,
        reference_interest: reference.total_interest,
        reference_total_cost,
        reference_payments: reference.period_count,
        difference,
        schedule,
        high_cost_periods,
        optimal_payoff_period,
        remaining_balance_at_optimal,
        cost_metrics: cost_metrics(plan),
    })
}

/// [`analyze`] wrapped in the standard computation envelope.
pub fn analyze_plan(
    plan: &PaymentPlan,
    settings: &EngineSettings,
) -> FeePlanResult<ComputationOutput<AnalysisResult>> {
    let start = Instant::now();
    let result = analyze(plan, settings)?;
    let warnings = collect_warnings(&result);
    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Equivalent APR by bisection on the level-payment formula; reference cost by \
         declining-balance amortization at the reference APR",
        settings,
        warnings,
        elapsed,
        result,
    ))
}

/// Analyze every plan of a config record, in order.
///
/// One outcome per plan: a plan that fails does not stop the rest, and its
/// error names the plan by its 1-based position.
pub fn analyze_plan_set(
    input: &PlanSetInput,
) -> Vec<FeePlanResult<ComputationOutput<AnalysisResult>>> {
    let settings = input.settings();
    input
        .payment_plans
        .iter()
        .enumerate()
        .map(|(i, plan)| analyze_plan(plan, &settings).map_err(|e| tag_plan(e, i + 1)))
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The month before the first high-cost month, with its balance. Nothing is
/// reported when the very first month is already high cost.
fn optimal_payoff(
    schedule: &[ScheduleEntry],
    high_cost_periods: &[ScheduleEntry],
) -> (Option<u32>, Option<Money>) {
    let Some(first) = high_cost_periods.first() else {
        return (None, None);
    };
    let period = first.period - 1;
    if period == 0 {
        return (None, None);
    }
    let balance = schedule
        .iter()
        .find(|e| e.period == period)
        .map(|e| e.balance);
    (Some(period), balance)
}

fn collect_warnings(result: &AnalysisResult) -> Vec<String> {
    let mut warnings = Vec::new();
    if result.costs_more_than_reference() {
        warnings.push(format!(
            "Fixed plan costs {} more than repaying at {}% APR.",
            result.difference.round_dp(2),
            result.reference_apr
        ));
    }
    if !result.high_cost_periods.is_empty() {
        warnings.push(format!(
            "{} month(s) charge a fee above the {}% monthly reference rate.",
            result.high_cost_periods.len(),
            (result.reference_apr / MONTHS_PER_YEAR).round_dp(2)
        ));
    }
    if result.pays_off_early() {
        warnings.push(format!(
            "Balance reaches zero after {} of {} payments.",
            result.schedule.len(),
            result.num_payments
        ));
    }
    warnings
}

fn tag_plan(err: FeePlanError, plan_number: usize) -> FeePlanError {
    match err {
        FeePlanError::InvalidPlan { field, reason } => FeePlanError::InvalidPlan {
            field: format!("plan #{plan_number} {field}"),
            reason,
        },
        FeePlanError::NonConvergent {
            function,
            iterations,
            remaining,
        } => FeePlanError::NonConvergent {
            function: format!("{function} (plan #{plan_number})"),
            iterations,
            remaining,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn plan(purchase: Decimal, n: u32, payment: Decimal, fee: Decimal) -> PaymentPlan {
        PaymentPlan {
            purchase_amount: purchase,
            num_payments: n,
            monthly_payment: payment,
            monthly_fee: fee,
        }
    }

    #[test]
    fn test_optimal_payoff_first_period_high_cost() {
        let entry = ScheduleEntry {
            period: 1,
            balance: dec!(50),
            principal_payment: dec!(50),
            fee: dec!(10),
            effective_monthly_rate: dec!(20),
            reference_interest: dec!(1.125),
        };
        let (p, b) = optimal_payoff(std::slice::from_ref(&entry), std::slice::from_ref(&entry));
        assert_eq!(p, None);
        assert_eq!(b, None);
    }

    #[test]
    fn test_optimal_payoff_none_without_high_cost() {
        let (p, b) = optimal_payoff(&[], &[]);
        assert_eq!(p, None);
        assert_eq!(b, None);
    }

    #[test]
    fn test_warnings_for_expensive_plan() {
        // A 20 fee on a 100 purchase is about 27% of the balance after month one
        let settings = EngineSettings::default();
        let out = analyze_plan(&plan(dec!(100), 4, dec!(45), dec!(20)), &settings).unwrap();
        assert_eq!(out.result.difference, dec!(55));
        assert_eq!(out.result.optimal_payoff_period, None);
        assert!(out.result.costs_more_than_reference());
        assert!(out.warnings.iter().any(|w| w.contains("costs")));
        assert!(out.warnings.iter().any(|w| w.contains("monthly reference rate")));
    }

    #[test]
    fn test_warning_for_early_payoff() {
        let settings = EngineSettings::default();
        let out = analyze_plan(&plan(dec!(100), 6, dec!(30), dec!(5)), &settings).unwrap();
        assert!(out.result.pays_off_early());
        assert!(out.warnings.iter().any(|w| w.contains("after 4 of 6")));
    }

    #[test]
    fn test_plan_set_tags_failing_plan() {
        let input = PlanSetInput {
            regular_apr: dec!(27),
            payment_plans: vec![
                plan(dec!(1196.00), 18, dec!(80.73), dec!(14.28)),
                plan(dec!(100), 12, dec!(5), dec!(5)),
            ],
        };
        let outcomes = analyze_plan_set(&input);
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_ok());
        match &outcomes[1] {
            Err(FeePlanError::InvalidPlan { field, .. }) => {
                assert_eq!(field, "plan #2 monthly_fee");
            }
            other => panic!("Expected InvalidPlan, got {other:?}"),
        }
    }

    #[test]
    fn test_plan_set_continues_past_failing_plan() {
        let input = PlanSetInput {
            regular_apr: dec!(27),
            payment_plans: vec![
                plan(Decimal::ZERO, 12, dec!(10), dec!(1)),
                plan(dec!(200.00), 18, dec!(13.51), dec!(2.39)),
                plan(dec!(1000), 12, dec!(83.33), Decimal::ZERO),
            ],
        };
        let outcomes = analyze_plan_set(&input);
        assert!(outcomes[0].is_err());
        assert_eq!(
            outcomes[1].as_ref().unwrap().result.optimal_payoff_period,
            Some(8)
        );
        assert_eq!(outcomes[2].as_ref().unwrap().result.schedule.len(), 12);
    }

    #[test]
    fn test_plan_set_default_apr() {
        let input: PlanSetInput = serde_json::from_str(
            r#"{"payment_plans": [{"purchase_amount": "200.00", "num_payments": 18,
                "monthly_payment": "13.51", "monthly_fee": "2.39"}]}"#,
        )
        .unwrap();
        assert_eq!(input.regular_apr, dec!(27));
        let outs = analyze_plan_set(&input);
        assert_eq!(outs.len(), 1);
        assert_eq!(outs[0].as_ref().unwrap().result.reference_apr, dec!(27));
    }
}
