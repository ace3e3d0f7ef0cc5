use super::patterns::{AMOUNT_PATTERNS, longest_repeat, longest_sequence};
use crate::config::AmountLimits;
use crate::domain::validation::AmountValidation;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Digits in a row (repeated or sequential) that make an amount look made up.
const UNUSUAL_DIGIT_RUN: usize = 4;

#[derive(Debug, Clone, Default)]
pub struct AmountValidator {
    limits: AmountLimits,
}

impl AmountValidator {
    pub fn new(limits: AmountLimits) -> Self {
        Self { limits }
    }

    /// Extracts the first currency-prefixed amount in `text` and checks it.
    pub fn validate(&self, text: &str) -> AmountValidation {
        match extract_amount(text) {
            Some(amount) => self.check(amount),
            None => AmountValidation {
                errors: vec!["No amount found in message".to_string()],
                ..AmountValidation::default()
            },
        }
    }

    /// Bounds and pattern checks on an already parsed amount.
    pub fn check(&self, amount: Decimal) -> AmountValidation {
        let mut result = AmountValidation {
            amount: Some(amount),
            ..AmountValidation::default()
        };

        if amount < self.limits.min {
            result
                .errors
                .push(format!("Amount {} is too small (minimum {})", amount, self.limits.min));
            return result;
        }
        if amount > self.limits.max {
            result
                .errors
                .push(format!("Amount {} is too large (maximum {})", amount, self.limits.max));
            return result;
        }

        result.valid = true;

        if amount > self.limits.reasonable {
            result.is_unusual = true;
            result.warnings.push(format!(
                "Amount {} is above the usual limit of {}",
                amount, self.limits.reasonable
            ));
        }

        let whole = amount.trunc().to_string();
        if whole.len() >= UNUSUAL_DIGIT_RUN && longest_repeat(&whole) == whole.len() {
            result.is_unusual = true;
            result
                .warnings
                .push(format!("Amount {} consists of a single repeated digit", amount));
        } else if longest_sequence(&whole) >= UNUSUAL_DIGIT_RUN {
            result.is_unusual = true;
            result
                .warnings
                .push(format!("Amount {} contains a sequential digit pattern", amount));
        }

        result
    }
}

/// Parses the first currency-prefixed amount, ignoring thousand separators.
pub fn extract_amount(text: &str) -> Option<Decimal> {
    AMOUNT_PATTERNS
        .iter()
        .filter_map(|p| p.captures(text))
        .filter_map(|caps| caps.get(1))
        .min_by_key(|m| m.start())
        .and_then(|m| parse_amount(m.as_str()))
}

pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    Decimal::from_str(&cleaned).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use rust_decimal_macros::dec;

    fn validator() -> AmountValidator {
        AmountValidator::default()
    }

    #[test]
    fn test_documented_formats() {
        let cases = [
            ("Confirmed. KES 5,000 received", dec!(5000)),
            ("Ksh5,000.00 sent to JANE", dec!(5000)),
            ("KSHS. 1,250.50 paid", dec!(1250.50)),
            ("kes 75.5 credited", dec!(75.5)),
            ("You received Ksh. 300 from", dec!(300)),
            ("KES 999,999.99 deposited", dec!(999999.99)),
            ("Received 2,500 KES from MARY", dec!(2500)),
            ("Paid 300.00 Ksh to shop", dec!(300)),
        ];
        for (text, expected) in cases {
            let result = validator().validate(text);
            assert!(result.valid, "{text}: {:?}", result.errors);
            assert_eq!(result.amount, Some(expected), "{text}");
        }
    }

    #[test]
    fn test_no_amount() {
        let result = validator().validate("Your account has been updated");
        assert!(!result.valid);
        assert_eq!(result.amount, None);
        assert!(result.errors[0].contains("No amount found"));
    }

    #[test]
    fn test_bare_number_is_not_an_amount() {
        let result = validator().validate("Call 0712345678 about 5000");
        assert!(!result.valid);
    }

    #[test]
    fn test_out_of_bounds() {
        let small = validator().validate("KES 0.50 received");
        assert!(!small.valid);
        assert!(small.errors[0].contains("too small"));

        let large = validator().validate("KES 2,000,000 received");
        assert!(!large.valid);
        assert!(large.errors[0].contains("too large"));
    }

    #[test]
    fn test_unusual_but_valid() {
        let big = validator().validate("KES 200,000 received");
        assert!(big.valid);
        assert!(big.is_unusual);

        let repeated = validator().validate("KES 7,777 received");
        assert!(repeated.valid);
        assert!(repeated.is_unusual);

        let sequential = validator().validate("KES 12,345 received");
        assert!(sequential.valid);
        assert!(sequential.is_unusual);

        let plain = validator().validate("KES 5,000 received");
        assert!(plain.valid);
        assert!(!plain.is_unusual);
        assert!(plain.warnings.is_empty());
    }

    #[test]
    fn test_random_amounts_within_bounds_roundtrip() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let cents: i64 = rng.gen_range(100..=100_000_000);
            let amount = Decimal::new(cents, 2);
            let text = format!("Confirmed. KES {} received", amount);
            let result = validator().validate(&text);
            assert!(result.valid, "{text}: {:?}", result.errors);
            assert_eq!(result.amount, Some(amount));
        }
    }

    #[test]
    fn test_random_amounts_out_of_bounds_rejected() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let above: i64 = rng.gen_range(1_000_001..=50_000_000);
            let result = validator().validate(&format!("KES {} received", above));
            assert!(!result.valid);
        }
    }
}
