use super::amount::AmountValidator;
use super::patterns::{DATE_PATTERNS, KEYWORD_PATTERNS, TIME_PATTERNS, any_match, find_references};
use super::phone::{self, PhoneValidator};
use crate::config::GuardConfig;
use crate::domain::message::Message;
use crate::domain::validation::{
    AmountValidation, AuthenticityIndicators, AuthenticityResult, PhoneValidation,
};

pub const SENDER_WEIGHT: u8 = 25;
pub const KEYWORD_WEIGHT: u8 = 20;
pub const STRUCTURE_WEIGHT: u8 = 15;
pub const AMOUNT_WEIGHT: u8 = 20;
pub const PHONE_WEIGHT: u8 = 20;

/// Heuristic 0-100 score for "this text is a genuine transfer notification".
#[derive(Debug, Clone)]
pub struct AuthenticityScorer {
    trusted_senders: Vec<String>,
    threshold: u8,
    amounts: AmountValidator,
    phones: PhoneValidator,
}

impl Default for AuthenticityScorer {
    fn default() -> Self {
        Self::from_config(&GuardConfig::default())
    }
}

impl AuthenticityScorer {
    pub fn from_config(config: &GuardConfig) -> Self {
        Self {
            trusted_senders: config
                .trusted_senders
                .iter()
                .map(|s| sender_key(s))
                .collect(),
            threshold: config.authenticity_threshold,
            amounts: AmountValidator::new(config.amount.clone()),
            phones: PhoneValidator::new(),
        }
    }

    pub fn is_trusted_sender(&self, sender: &str) -> bool {
        let key = sender_key(sender);
        !key.is_empty() && self.trusted_senders.contains(&key)
    }

    /// Scores `message`, reusing amount/phone results when the caller already
    /// has them and computing them from the text otherwise.
    pub fn assess(
        &self,
        message: &Message,
        amount: Option<&AmountValidation>,
        phone: Option<&PhoneValidation>,
    ) -> AuthenticityResult {
        let text = message.text();

        let amount_valid = match amount {
            Some(result) => result.valid,
            None => self.amounts.validate(text).valid,
        };
        let phone_valid = match phone {
            Some(result) => result.valid,
            None => phone::extract(text)
                .map(|p| self.phones.validate(&p).valid)
                .unwrap_or(false),
        };

        let indicators = AuthenticityIndicators {
            has_valid_sender: self.is_trusted_sender(message.sender()),
            has_valid_keywords: any_match(&KEYWORD_PATTERNS, text),
            has_valid_structure: (any_match(&DATE_PATTERNS, text) || any_match(&TIME_PATTERNS, text))
                && !find_references(text).is_empty(),
            amount_valid,
            phone_valid,
        };

        let mut score: u8 = 0;
        let mut issues = Vec::new();
        let checks = [
            (
                indicators.has_valid_sender,
                SENDER_WEIGHT,
                "Sender is not a recognised money-transfer service",
            ),
            (
                indicators.has_valid_keywords,
                KEYWORD_WEIGHT,
                "Message lacks transaction keywords",
            ),
            (
                indicators.has_valid_structure,
                STRUCTURE_WEIGHT,
                "Message lacks a date/time and reference code",
            ),
            (indicators.amount_valid, AMOUNT_WEIGHT, "Amount is missing or invalid"),
            (indicators.phone_valid, PHONE_WEIGHT, "Phone number is missing or invalid"),
        ];
        for (passed, weight, issue) in checks {
            if passed {
                score = score.saturating_add(weight);
            } else {
                issues.push(issue.to_string());
            }
        }
        let score = score.min(100);

        AuthenticityResult {
            authentic: score >= self.threshold,
            score,
            indicators,
            issues,
        }
    }
}

fn sender_key(sender: &str) -> String {
    sender
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
