//! Fixed-fee installment plan analysis.
//!
//! Converts a plan of equal monthly payments (each carrying a flat fee) into
//! an equivalent APR, compares it against declining-balance financing at a
//! reference APR, and finds the last month worth staying on the plan.

pub mod amortization;
pub mod analysis;
pub mod error;
pub mod plan;
pub mod settings;
pub mod types;

pub use analysis::plan_analyzer::{analyze, analyze_plan, analyze_plan_set, AnalysisResult, PlanSetInput};
pub use error::FeePlanError;
pub use plan::PaymentPlan;
pub use settings::EngineSettings;
pub use types::*;

/// Standard result type for all feeplan operations
pub type FeePlanResult<T> = Result<T, FeePlanError>;
