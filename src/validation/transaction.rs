use super::amount::{AmountValidator, extract_amount};
use super::authenticity::AuthenticityScorer;
use super::phone::{self, PhoneValidator};
use crate::config::GuardConfig;
use crate::domain::message::Message;
use crate::domain::validation::{PhoneValidation, Provider, ValidationFlag, ValidationResult};
use rust_decimal::Decimal;
use tracing::debug;

/// Runs amount, phone and authenticity checks over one message.
///
/// Only amount and phone failures invalidate a message. Everything else is
/// reported as a warning plus a [`ValidationFlag`] so that flagged messages
/// can still be stored for later review.
#[derive(Debug, Clone)]
pub struct TransactionValidator {
    amounts: AmountValidator,
    phones: PhoneValidator,
    authenticity: AuthenticityScorer,
}

impl Default for TransactionValidator {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl TransactionValidator {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            amounts: AmountValidator::new(config.amount.clone()),
            phones: PhoneValidator::new(),
            authenticity: AuthenticityScorer::from_config(config),
        }
    }

    /// Validates `message` against the counterparty `phone`.
    ///
    /// When `amount` is given it is the value that gets bounds-checked; a
    /// different amount in the text is reported as a mismatch.
    pub fn validate(
        &self,
        message: &Message,
        phone: &str,
        amount: Option<Decimal>,
    ) -> ValidationResult {
        self.combine(message, amount, self.phones.validate(phone))
    }

    /// Validates a message whose counterparty phone is embedded in its text.
    pub fn validate_message(&self, message: &Message) -> ValidationResult {
        let phone_result = match phone::extract(message.text()) {
            Some(phone) => self.phones.validate(&phone),
            None => PhoneValidation {
                errors: vec!["No phone number found in message".to_string()],
                ..PhoneValidation::default()
            },
        };
        self.combine(message, None, phone_result)
    }

    fn combine(
        &self,
        message: &Message,
        amount: Option<Decimal>,
        phone_result: PhoneValidation,
    ) -> ValidationResult {
        let amount_result = match amount {
            Some(value) => self.amounts.check(value),
            None => self.amounts.validate(message.text()),
        };
        let authenticity =
            self.authenticity
                .assess(message, Some(&amount_result), Some(&phone_result));

        let mut result = ValidationResult {
            valid: amount_result.valid && phone_result.valid,
            amount: amount_result.amount,
            phone: phone_result.normalized.clone(),
            provider: phone_result.provider,
            ..ValidationResult::default()
        };

        result.errors.extend(amount_result.errors);
        result.errors.extend(phone_result.errors);
        result.warnings.extend(amount_result.warnings);
        result.warnings.extend(phone_result.warnings);

        if amount_result.is_unusual {
            result.flag(ValidationFlag::UnusualAmount);
        }
        if phone_result.is_suspicious {
            result.flag(ValidationFlag::SuspiciousPhone);
        }
        if phone_result.provider == Some(Provider::Unknown) {
            result.flag(ValidationFlag::UnknownProvider);
        }
        if let Some(expected) = amount
            && let Some(found) = extract_amount(message.text())
            && found != expected
        {
            result
                .warnings
                .push(format!("Message states {found} but {expected} was expected"));
            result.flag(ValidationFlag::AmountMismatch);
        }
        if !authenticity.indicators.has_valid_sender {
            result.flag(ValidationFlag::UntrustedSender);
        }
        if !authenticity.authentic {
            result.warnings.push(format!(
                "Authenticity score {} is below threshold",
                authenticity.score
            ));
            result.warnings.extend(authenticity.issues.iter().cloned());
            result.flag(ValidationFlag::LowAuthenticity);
        }

        debug!(
            valid = result.valid,
            score = authenticity.score,
            flags = ?result.flags,
            "validated message"
        );
        result.authenticity = Some(authenticity);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SAMPLE: &str =
        "Confirmed. KES 5,000 from John 0712345678 on 01/01/2025 at 14:30 ref QAB123ABC";

    #[test]
    fn test_sample_message_is_valid() {
        let validator = TransactionValidator::default();
        let message = Message::new(SAMPLE, "MPESA", 1_735_741_800_000);
        let result = validator.validate(&message, "0712345678", None);

        assert!(result.valid, "{:?}", result.errors);
        assert_eq!(result.amount, Some(dec!(5000)));
        assert_eq!(result.phone.as_deref(), Some("254712345678"));
        assert_eq!(result.provider, Some(Provider::Safaricom));
        assert!(result.authenticity.as_ref().unwrap().authentic);
    }

    #[test]
    fn test_invalid_phone_invalidates() {
        let validator = TransactionValidator::default();
        let message = Message::new(SAMPLE, "MPESA", 0);
        let result = validator.validate(&message, "12345", None);
        assert!(!result.valid);
        assert!(result.phone.is_none());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_low_authenticity_is_a_flag_not_a_failure() {
        let validator = TransactionValidator::default();
        let message = Message::new("hello KES 5,000 john", "0799123123", 0);
        let result = validator.validate(&message, "0722815930", None);

        assert!(result.valid);
        assert!(result.has_flag(ValidationFlag::LowAuthenticity));
        assert!(result.has_flag(ValidationFlag::UntrustedSender));
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_explicit_amount_mismatch() {
        let validator = TransactionValidator::default();
        let message = Message::new(SAMPLE, "MPESA", 0);
        let result = validator.validate(&message, "0712345678", Some(dec!(4500)));

        assert!(result.valid);
        assert_eq!(result.amount, Some(dec!(4500)));
        assert!(result.has_flag(ValidationFlag::AmountMismatch));
    }

    #[test]
    fn test_explicit_amount_out_of_bounds() {
        let validator = TransactionValidator::default();
        let message = Message::new(SAMPLE, "MPESA", 0);
        let result = validator.validate(&message, "0712345678", Some(dec!(5000000)));
        assert!(!result.valid);
    }

    #[test]
    fn test_validate_message_extracts_phone() {
        let validator = TransactionValidator::default();
        let ok = validator.validate_message(&Message::new(SAMPLE, "MPESA", 0));
        assert!(ok.valid);
        assert_eq!(ok.phone.as_deref(), Some("254712345678"));

        let missing = validator.validate_message(&Message::new("KES 5,000 received", "MPESA", 0));
        assert!(!missing.valid);
        assert_eq!(missing.errors, vec!["No phone number found in message".to_string()]);
    }
}
