use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AmountValidation {
    pub valid: bool,
    pub amount: Option<Decimal>,
    /// Valid, but large or made of a suspicious digit pattern.
    pub is_unusual: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Safaricom,
    Airtel,
    Telkom,
    Equitel,
    Unknown,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Provider::Safaricom => "Safaricom",
            Provider::Airtel => "Airtel",
            Provider::Telkom => "Telkom",
            Provider::Equitel => "Equitel",
            Provider::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhoneValidation {
    pub valid: bool,
    /// Canonical `254XXXXXXXXX` form, present whenever normalization succeeded.
    pub normalized: Option<String>,
    pub provider: Option<Provider>,
    pub is_suspicious: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthenticityIndicators {
    pub has_valid_sender: bool,
    pub has_valid_keywords: bool,
    pub has_valid_structure: bool,
    pub amount_valid: bool,
    pub phone_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticityResult {
    pub authentic: bool,
    /// 0..=100
    pub score: u8,
    pub indicators: AuthenticityIndicators,
    pub issues: Vec<String>,
}

/// Category tags attached to a transaction that passed validation with
/// reservations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFlag {
    LowAuthenticity,
    UntrustedSender,
    UnusualAmount,
    SuspiciousPhone,
    UnknownProvider,
    AmountMismatch,
}

impl ValidationFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationFlag::LowAuthenticity => "low_authenticity",
            ValidationFlag::UntrustedSender => "untrusted_sender",
            ValidationFlag::UnusualAmount => "unusual_amount",
            ValidationFlag::SuspiciousPhone => "suspicious_phone",
            ValidationFlag::UnknownProvider => "unknown_provider",
            ValidationFlag::AmountMismatch => "amount_mismatch",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub flags: Vec<ValidationFlag>,
    pub amount: Option<Decimal>,
    pub phone: Option<String>,
    pub provider: Option<Provider>,
    pub authenticity: Option<AuthenticityResult>,
}

impl ValidationResult {
    pub fn has_flag(&self, flag: ValidationFlag) -> bool {
        self.flags.contains(&flag)
    }

    pub(crate) fn flag(&mut self, flag: ValidationFlag) {
        if !self.has_flag(flag) {
            self.flags.push(flag);
        }
    }
}
