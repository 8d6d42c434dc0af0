pub mod csv_out;
pub mod json;
pub mod markdown;
pub mod minimal;
pub mod table;
pub mod text;

use rust_decimal::Decimal;

use crate::commands::AnalysisRun;
use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: OutputFormat, run: &AnalysisRun) {
    match format {
        OutputFormat::Text => print!("{}", text::render_text(run)),
        OutputFormat::Markdown => print!("{}", markdown::render_markdown(run)),
        OutputFormat::Json => json::print_json(run),
        OutputFormat::Table => print!("{}", table::render_tables(run)),
        OutputFormat::Csv => csv_out::print_csv(run),
        OutputFormat::Minimal => print!("{}", minimal::render_minimal(run)),
    }
}

/// `$1234.50`, rounded to cents.
pub(crate) fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

/// `12.34%`
pub(crate) fn pct(value: Decimal) -> String {
    format!("{:.2}%", value.round_dp(2))
}

/// Rate as the user wrote it, without trailing zeros (`27.0` -> `27`).
pub(crate) fn plain(value: Decimal) -> String {
    value.normalize().to_string()
}


#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_rounds_to_cents() {
        assert_eq!(money(dec!(664.4)), "$664.40");
        assert_eq!(money(dec!(25.414875)), "$25.41");
        assert_eq!(money(dec!(-141.66)), "$-141.66");
    }

    #[test]
    fn test_pct_and_plain() {
        assert_eq!(pct(dec!(2.3882)), "2.39%");
        assert_eq!(plain(dec!(27.0)), "27");
        assert_eq!(plain(dec!(24.99)), "24.99");
    }
}
