use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use feeplan_core::settings::DEFAULT_REFERENCE_APR;
use feeplan_core::{analyze_plan_set, PaymentPlan, PlanSetInput};

use super::{AnalysisRun, PlanFailure, PlanReport};
use crate::input;

/// Arguments for analyzing a config record
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML config (reads piped stdin when omitted)
    pub config: Option<String>,

    /// Path to the config (same as the positional argument)
    #[arg(long, conflicts_with = "config")]
    pub input: Option<String>,

    /// Reference APR in percent (overrides regular_apr in the config)
    #[arg(long)]
    pub apr: Option<Decimal>,
}

/// Arguments for analyzing one plan from flags
#[derive(Args)]
pub struct PlanArgs {
    /// Amount financed
    #[arg(long)]
    pub purchase_amount: Decimal,

    /// Number of monthly payments
    #[arg(long)]
    pub num_payments: u32,

    /// Monthly payment including the fee
    #[arg(long)]
    pub monthly_payment: Decimal,

    /// Flat fee included in each payment
    #[arg(long, default_value = "0")]
    pub monthly_fee: Decimal,

    /// Reference APR in percent
    #[arg(long)]
    pub apr: Option<Decimal>,
}

/// Arguments for the built-in examples
#[derive(Args)]
pub struct DemoArgs {
    /// Reference APR in percent
    #[arg(long)]
    pub apr: Option<Decimal>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<AnalysisRun, Box<dyn std::error::Error>> {
    let path = args.config.or(args.input);
    let mut plan_set: PlanSetInput = if let Some(ref path) = path {
        tracing::info!(path = %path, "loading configuration");
        input::file::read_config(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("a config path or piped stdin is required (try `feeplan demo`)".into());
    };

    if let Some(apr) = args.apr {
        plan_set.regular_apr = apr;
    }
    if plan_set.payment_plans.is_empty() {
        return Err("config contains no payment_plans".into());
    }
    run_plan_set(plan_set)
}

pub fn run_plan(args: PlanArgs) -> Result<AnalysisRun, Box<dyn std::error::Error>> {
    let plan = PaymentPlan::new(
        args.purchase_amount,
        args.num_payments,
        args.monthly_payment,
        args.monthly_fee,
    )?;
    run_plan_set(single_plan_set(plan, args.apr))
}

pub fn run_demo(args: DemoArgs) -> Result<AnalysisRun, Box<dyn std::error::Error>> {
    let mut plan_set = demo_plan_set();
    if let Some(apr) = args.apr {
        plan_set.regular_apr = apr;
    }
    run_plan_set(plan_set)
}

/// Analyze every plan, keeping the good reports when some plans fail.
/// Only a run where nothing could be analyzed is an error.
pub(crate) fn run_plan_set(
    plan_set: PlanSetInput,
) -> Result<AnalysisRun, Box<dyn std::error::Error>> {
    let mut run = AnalysisRun {
        reference_apr: plan_set.regular_apr,
        reports: Vec::new(),
        failures: Vec::new(),
    };

    for (i, outcome) in analyze_plan_set(&plan_set).into_iter().enumerate() {
        let plan = i + 1;
        match outcome {
            Ok(output) => run.reports.push(PlanReport { plan, output }),
            Err(e) => {
                tracing::warn!(plan, error = %e, "plan analysis failed");
                run.failures.push(PlanFailure {
                    plan,
                    error: e.to_string(),
                });
            }
        }
    }

    if run.reports.is_empty() {
        let messages: Vec<&str> = run.failures.iter().map(|f| f.error.as_str()).collect();
        return Err(messages.join("; ").into());
    }
    Ok(run)
}

fn single_plan_set(plan: PaymentPlan, apr: Option<Decimal>) -> PlanSetInput {
    PlanSetInput {
        regular_apr: apr.unwrap_or(DEFAULT_REFERENCE_APR),
        payment_plans: vec![plan],
    }
}

/// Example plans shipped with the tool: two retail financing offers and a
/// small purchase whose last payment overshoots the balance.
pub fn demo_plan_set() -> PlanSetInput {
    PlanSetInput {
        regular_apr: DEFAULT_REFERENCE_APR,
        payment_plans: vec![
            demo_plan(dec!(1196.00), 18, dec!(80.73), dec!(14.28)),
            demo_plan(dec!(2365.20), 24, dec!(129.14), dec!(30.59)),
            demo_plan(dec!(200.00), 18, dec!(13.51), dec!(2.39)),
        ],
    }
}

fn demo_plan(
    purchase_amount: Decimal,
    num_payments: u32,
    monthly_payment: Decimal,
    monthly_fee: Decimal,
) -> PaymentPlan {
    PaymentPlan {
        purchase_amount,
        num_payments,
        monthly_payment,
        monthly_fee,
    }
}
