use std::fmt::Write;

use feeplan_core::{AnalysisResult, ComputationOutput};
use tabled::{builder::Builder, Table};

use super::{money, pct};
use crate::commands::AnalysisRun;

/// Summary and schedule tables for each plan, followed by its warnings.
pub fn render_tables(run: &AnalysisRun) -> String {
    let mut out = String::new();
    for report in &run.reports {
        let _ = writeln!(out, "\nPlan #{}", report.plan);
        write_report(&mut out, &report.output);
    }
    out
}

fn write_report(out: &mut String, report: &ComputationOutput<AnalysisResult>) {
    let _ = writeln!(out, "{}", summary_table(&report.result));
    let _ = writeln!(out, "{}", schedule_table(&report.result));

    if !report.warnings.is_empty() {
        let _ = writeln!(out, "\nWarnings:");
        for w in &report.warnings {
            let _ = writeln!(out, "  - {}", w);
        }
    }
    let _ = writeln!(out, "\nMethodology: {}", report.methodology);
}

fn summary_table(r: &AnalysisResult) -> Table {
    let optimal = match (r.optimal_payoff_period, r.remaining_balance_at_optimal) {
        (Some(period), Some(balance)) => format!("after month {} ({})", period, money(balance)),
        _ => "-".to_string(),
    };

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["Purchase amount".to_string(), money(r.purchase_amount)]);
    builder.push_record(["Payments".to_string(), r.num_payments.to_string()]);
    builder.push_record(["Monthly payment".to_string(), money(r.monthly_payment)]);
    builder.push_record(["Monthly fee".to_string(), money(r.monthly_fee)]);
    builder.push_record(["Total cost".to_string(), money(r.total_cost)]);
    builder.push_record(["Total fees".to_string(), money(r.total_fees)]);
    builder.push_record(["Equivalent APR".to_string(), pct(r.equivalent_apr)]);
    builder.push_record(["Reference APR".to_string(), pct(r.reference_apr)]);
    builder.push_record(["Reference interest".to_string(), money(r.reference_interest)]);
    builder.push_record(["Reference payments".to_string(), r.reference_payments.to_string()]);
    builder.push_record(["Difference".to_string(), money(r.difference)]);
    builder.push_record(["Optimal payoff".to_string(), optimal]);
    Table::from(builder)
}

fn schedule_table(r: &AnalysisResult) -> Table {
    let mut builder = Builder::default();
    builder.push_record([
        "Month",
        "Balance",
        "Principal",
        "Fee",
        "Ref. interest",
        "Monthly rate",
        "APR equiv.",
        "",
    ]);
    for e in &r.schedule {
        let marker = if r.optimal_payoff_period == Some(e.period) {
            "payoff"
        } else if r.high_cost_periods.iter().any(|h| h.period == e.period) {
            "high cost"
        } else {
            ""
        };
        builder.push_record([
            e.period.to_string(),
            money(e.balance),
            money(e.principal_payment),
            money(e.fee),
            money(e.reference_interest),
            pct(e.effective_monthly_rate),
            pct(e.annualized_effective_rate()),
            marker.to_string(),
        ]);
    }
    Table::from(builder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::demo_run;

    #[test]
    fn test_tables_include_summary_and_schedule() {
        let out = render_tables(&demo_run());
        assert!(out.contains("Plan #1"));
        assert!(out.contains("Plan #3"));
        assert!(out.contains("$1453.14"));
        assert!(out.contains("after month 8 ($664.40)"));
        assert!(out.contains("high cost"));
        assert!(out.contains("Methodology: Equivalent APR by bisection"));
    }

    #[test]
    fn test_tables_list_warnings() {
        let out = render_tables(&demo_run());
        assert!(out.contains("Warnings:"));
        assert!(out.contains("month(s) charge a fee above the 2.25% monthly reference rate."));
    }
}
