use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a JSON config record from stdin if data is being piped.
/// Returns None if stdin is a TTY (interactive) or empty.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_stdin(&buffer)
}

fn parse_stdin<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: T = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse config from stdin: {}", e))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use feeplan_core::PlanSetInput;
    use rust_decimal_macros::dec;

    #[test]
    fn test_piped_config_with_json_numbers() {
        let piped = r#"
            {"regular_apr": 24.99,
             "payment_plans": [{"purchase_amount": 1000, "num_payments": 12,
                                "monthly_payment": 83.33, "monthly_fee": 0}]}
        "#;
        let input: PlanSetInput = parse_stdin(piped).unwrap().unwrap();
        assert_eq!(input.regular_apr, dec!(24.99));
        assert_eq!(input.payment_plans[0].purchase_amount, dec!(1000));
        assert_eq!(input.payment_plans[0].monthly_payment, dec!(83.33));
    }

    #[test]
    fn test_blank_input_is_none() {
        let input: Option<PlanSetInput> = parse_stdin("  \n").unwrap();
        assert!(input.is_none());
    }

    #[test]
    fn test_malformed_input_is_reported() {
        let err = parse_stdin::<PlanSetInput>("{\"payment_plans\": [").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config from stdin"));
    }
}
