use std::fmt::Write;

use feeplan_core::settings::MONTHS_PER_YEAR;
use feeplan_core::AnalysisResult;

use super::{money, pct, plain};
use crate::commands::AnalysisRun;

/// Markdown report, one section per plan separated by rules.
pub fn render_markdown(run: &AnalysisRun) -> String {
    let mut out = String::new();
    for (i, report) in run.reports.iter().enumerate() {
        if i > 0 {
            let _ = writeln!(out, "\n---\n");
        }
        write_plan(&mut out, &report.output.result, report.plan);
    }
    out
}

fn write_plan(out: &mut String, r: &AnalysisResult, plan_number: usize) {
    let apr = plain(r.reference_apr);

    let _ = writeln!(out, "\n# Fixed Payment Plan Analysis #{plan_number}");
    let _ = writeln!(out, "- Purchase Amount: {}", money(r.purchase_amount));
    let _ = writeln!(out, "- Number of Payments: {}", r.num_payments);
    let _ = writeln!(out, "- Monthly Payment: {}", money(r.monthly_payment));
    let _ = writeln!(out, "- Monthly Fee: {}", money(r.monthly_fee));
    let _ = writeln!(out, "- Total Cost: {}", money(r.total_cost));
    let _ = writeln!(out, "- Total Fees: {}", money(r.total_fees));
    let _ = writeln!(out, "- Equivalent APR: {}", pct(r.equivalent_apr));

    let _ = writeln!(out, "\n## Comparison with Regular {apr}% APR");
    let _ = writeln!(out, "- Regular Interest Paid: {}", money(r.reference_interest));
    let _ = writeln!(out, "- Regular Total Cost: {}", money(r.reference_total_cost));
    let _ = writeln!(out, "- Regular Payments Needed: {}", r.reference_payments);
    let _ = writeln!(out, "- Difference (Fixed Plan - Regular): {}", money(r.difference));
    if r.costs_more_than_reference() {
        let _ = writeln!(
            out,
            "- The fixed payment plan costs {} more than regular payments.",
            money(r.difference)
        );
    } else {
        let _ = writeln!(
            out,
            "- The fixed payment plan saves {} compared to regular payments.",
            money(r.difference.abs())
        );
    }

    let m = &r.cost_metrics;
    let _ = writeln!(out, "\n## Additional Analysis");
    let _ = writeln!(out, "- Simple interest rate equivalent: {} APR", pct(m.simple_interest_apr));
    let _ = writeln!(
        out,
        "- Monthly fee as % of purchase: {} per month",
        pct(m.monthly_fee_pct_of_purchase)
    );
    let _ = writeln!(
        out,
        "- Effective rate based on avg. balance: {} APR (approximate)",
        pct(m.average_balance_apr)
    );
    let _ = writeln!(
        out,
        "- Fee-only equivalent rate (on avg. balance): {} APR",
        pct(m.fee_only_apr)
    );

    let _ = writeln!(out, "\n## Balance Schedule and Optimal Payoff Analysis");
    let _ = writeln!(
        out,
        "| Month | Balance | Principal | Fixed Fee | Regular Interest* | Difference | Effective Rate | APR Equivalent |"
    );
    let _ = writeln!(
        out,
        "|-------|---------|-----------|-----------|-------------------|------------|----------------|----------------|"
    );
    for e in &r.schedule {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} monthly | {} |",
            e.period,
            money(e.balance),
            money(e.principal_payment),
            money(e.fee),
            money(e.reference_interest),
            money(e.fee_minus_reference_interest()),
            pct(e.effective_monthly_rate),
            pct(e.annualized_effective_rate()),
        );
        if r.optimal_payoff_period == Some(e.period) {
            if let Some(balance) = r.remaining_balance_at_optimal {
                let _ = writeln!(
                    out,
                    "| **OPTIMAL PAYOFF POINT: After month {}, pay remaining {}** |",
                    e.period,
                    money(balance)
                );
            }
        }
    }
    let _ = writeln!(
        out,
        "\n*Regular interest calculated at {apr}% APR on remaining balance"
    );

    if r.high_cost_periods.is_empty() {
        return;
    }

    let _ = writeln!(
        out,
        "\n### Months where fee rate exceeds regular {apr}% APR ({} monthly):",
        pct(r.reference_apr / MONTHS_PER_YEAR)
    );
    let _ = writeln!(
        out,
        "| Month | Rate | APR | Balance | Fixed Fee | Regular Interest | Difference |"
    );
    let _ = writeln!(
        out,
        "|-------|------|-----|---------|-----------|------------------|------------|"
    );
    for e in &r.high_cost_periods {
        let _ = writeln!(
            out,
            "| {} | {} monthly | {} | {} | {} | {} | {} |",
            e.period,
            pct(e.effective_monthly_rate),
            pct(e.annualized_effective_rate()),
            money(e.balance),
            money(e.fee),
            money(e.reference_interest),
            money(e.fee_minus_reference_interest()),
        );
    }

    if let (Some(period), Some(balance)) = (r.optimal_payoff_period, r.remaining_balance_at_optimal)
    {
        let _ = writeln!(out, "\n### Optimal Payoff Recommendation:");
        let _ = writeln!(
            out,
            "- Suggested optimal payoff: After month {period}, pay remaining {}",
            money(balance)
        );
        if let Some(entry) = r.entry(period) {
            let _ = writeln!(
                out,
                "- At this point, fixed fee would be {}, regular interest would be {}",
                money(entry.fee),
                money(entry.reference_interest)
            );
        }
        let _ = writeln!(
            out,
            "- This would avoid {} months of high-cost fees.",
            r.high_cost_periods.len()
        );
    }
}
