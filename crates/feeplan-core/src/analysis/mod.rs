pub mod cost_metrics;
pub mod plan_analyzer;
