use std::fmt::Write;

use super::{money, pct};
use crate::commands::AnalysisRun;

/// One line per plan: equivalent APR, cost difference and payoff hint.
pub fn render_minimal(run: &AnalysisRun) -> String {
    let mut out = String::new();
    for report in &run.reports {
        let r = &report.output.result;
        let payoff = match (r.optimal_payoff_period, r.remaining_balance_at_optimal) {
            (Some(period), Some(balance)) => format!("payoff after {} ({})", period, money(balance)),
            _ => "no early payoff".to_string(),
        };
        let _ = writeln!(
            out,
            "#{} apr={} diff={} {}",
            report.plan,
            pct(r.equivalent_apr),
            money(r.difference),
            payoff
        );
    }
    out
}
