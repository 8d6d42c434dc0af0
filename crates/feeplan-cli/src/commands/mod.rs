pub mod analyze;

use rust_decimal::Decimal;
use serde::Serialize;

use feeplan_core::{AnalysisResult, ComputationOutput};

/// Everything one invocation analyzed, in input order.
#[derive(Debug, Serialize)]
pub struct AnalysisRun {
    /// Reference APR (percent) every plan was compared against
    pub reference_apr: Decimal,
    pub reports: Vec<PlanReport>,
    /// Plans that could not be analyzed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PlanFailure>,
}

/// Analysis of one plan, numbered by its position in the config.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub plan: usize,
    #[serde(flatten)]
    pub output: ComputationOutput<AnalysisResult>,
}

#[derive(Debug, Serialize)]
pub struct PlanFailure {
    pub plan: usize,
    pub error: String,
}
