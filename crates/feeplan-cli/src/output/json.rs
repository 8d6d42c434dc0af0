use crate::commands::AnalysisRun;

/// Pretty-print the run as JSON to stdout.
pub fn print_json(run: &AnalysisRun) {
    match serde_json::to_string_pretty(run) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}
