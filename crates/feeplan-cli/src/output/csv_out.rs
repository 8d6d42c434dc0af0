use std::io::{self, Write};

use crate::commands::AnalysisRun;

/// Write every schedule row of every plan as CSV to stdout.
pub fn print_csv(run: &AnalysisRun) {
    let stdout = io::stdout();
    if let Err(e) = write_csv(stdout.lock(), run) {
        eprintln!("CSV output error: {}", e);
    }
}

fn write_csv<W: Write>(writer: W, run: &AnalysisRun) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "plan",
        "period",
        "balance",
        "principal_payment",
        "fee",
        "effective_monthly_rate",
        "reference_interest",
        "high_cost",
        "optimal_payoff",
    ])?;

    for report in &run.reports {
        let r = &report.output.result;
        for e in &r.schedule {
            let high_cost = r.high_cost_periods.iter().any(|h| h.period == e.period);
            let optimal = r.optimal_payoff_period == Some(e.period);
            wtr.write_record([
                report.plan.to_string(),
                e.period.to_string(),
                e.balance.round_dp(2).to_string(),
                e.principal_payment.round_dp(2).to_string(),
                e.fee.round_dp(2).to_string(),
                e.effective_monthly_rate.round_dp(4).to_string(),
                e.reference_interest.round_dp(2).to_string(),
                high_cost.to_string(),
                optimal.to_string(),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
