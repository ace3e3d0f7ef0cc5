use crate::domain::dedup::MessageSignature;
use crate::validation::amount::parse_amount;
use crate::validation::patterns::{
    AMOUNT_PATTERNS, AMOUNT_TOKEN_PATTERNS, DIGIT_RUN_PATTERNS, find_references,
};

/// Pulls amount-like, phone-like and reference-like tokens out of a message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureExtractor;

impl SignatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, message: &str) -> MessageSignature {
        let mut signature = MessageSignature::default();

        for pattern in AMOUNT_PATTERNS.iter() {
            for caps in pattern.captures_iter(message) {
                if let Some(amount) = caps.get(1).and_then(|m| parse_amount(m.as_str())) {
                    signature.amounts.insert(amount.normalize());
                }
            }
        }
        for pattern in AMOUNT_TOKEN_PATTERNS.iter() {
            for m in pattern.find_iter(message) {
                if let Some(amount) = parse_amount(m.as_str()) {
                    signature.amounts.insert(amount.normalize());
                }
            }
        }
        for pattern in DIGIT_RUN_PATTERNS.iter() {
            for m in pattern.find_iter(message) {
                signature.phones.insert(m.as_str().to_string());
            }
        }
        signature.references.extend(find_references(message));

        signature
    }
}
