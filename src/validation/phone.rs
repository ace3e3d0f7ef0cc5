use super::patterns::{
    COUNTRY_CODE, MOBILE_LEADING_DIGITS, NATIONAL_NUMBER_LEN, PHONE_CANDIDATE_PATTERNS,
    longest_repeat, longest_sequence, provider_for,
};
use crate::domain::validation::{PhoneValidation, Provider};

/// Runs of this many repeated or sequential digits mark a number as suspicious.
const SUSPICIOUS_DIGIT_RUN: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeError {
    Empty,
    InvalidLength(usize),
    WrongCountryCode,
    NotMobile,
}

impl std::fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeError::Empty => write!(f, "Phone number is empty"),
            NormalizeError::InvalidLength(len) => {
                write!(f, "Phone number has an invalid length ({len} digits)")
            }
            NormalizeError::WrongCountryCode => {
                write!(f, "Phone number does not use country code {COUNTRY_CODE}")
            }
            NormalizeError::NotMobile => write!(f, "Phone number is not a mobile number"),
        }
    }
}

/// Canonical `254XXXXXXXXX` form of `raw`.
///
/// Accepts `0712345678`, `712345678`, `254712345678` and `+254 712 345 678`;
/// any non-digit characters are ignored. Idempotent on its own output.
pub fn normalize(raw: &str) -> Result<String, NormalizeError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        0 => return Err(NormalizeError::Empty),
        len if len == NATIONAL_NUMBER_LEN => digits.as_str(),
        len if len == NATIONAL_NUMBER_LEN + 1 => digits
            .strip_prefix('0')
            .ok_or(NormalizeError::InvalidLength(len))?,
        len if len == NATIONAL_NUMBER_LEN + COUNTRY_CODE.len() => digits
            .strip_prefix(COUNTRY_CODE)
            .ok_or(NormalizeError::WrongCountryCode)?,
        len => return Err(NormalizeError::InvalidLength(len)),
    };

    if !national.starts_with(MOBILE_LEADING_DIGITS) {
        return Err(NormalizeError::NotMobile);
    }
    Ok(format!("{COUNTRY_CODE}{national}"))
}

/// Best-effort key for phones that fail normalization, so history lookups
/// still compare like with like.
pub fn normalize_lossy(raw: &str) -> String {
    normalize(raw).unwrap_or_else(|_| raw.chars().filter(char::is_ascii_digit).collect())
}

/// First token in `text` that normalizes to a valid mobile number.
pub fn extract(text: &str) -> Option<String> {
    PHONE_CANDIDATE_PATTERNS
        .iter()
        .flat_map(|p| p.find_iter(text))
        .find_map(|m| normalize(m.as_str()).ok())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PhoneValidator;

impl PhoneValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate(&self, phone: &str) -> PhoneValidation {
        let normalized = match normalize(phone) {
            Ok(n) => n,
            Err(e) => {
                return PhoneValidation {
                    errors: vec![e.to_string()],
                    ..PhoneValidation::default()
                };
            }
        };

        let national = &normalized[COUNTRY_CODE.len()..];
        let provider = provider_for(national);
        let mut result = PhoneValidation {
            valid: true,
            normalized: Some(normalized.clone()),
            provider: Some(provider),
            ..PhoneValidation::default()
        };

        if provider == Provider::Unknown {
            result
                .warnings
                .push(format!("No known provider for prefix {}", &national[..3]));
        }
        if longest_repeat(national) >= SUSPICIOUS_DIGIT_RUN {
            result.is_suspicious = true;
            result
                .warnings
                .push(format!("Phone {normalized} contains a long repeated-digit run"));
        }
        if longest_sequence(national) >= SUSPICIOUS_DIGIT_RUN {
            result.is_suspicious = true;
            result
                .warnings
                .push(format!("Phone {normalized} contains a long sequential-digit run"));
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_invariant_normalization() {
        let inputs = [
            "0712345678",
            "712345678",
            "254712345678",
            "+254712345678",
            "+254 712 345 678",
            "0712-345-678",
            "(0712) 345678",
        ];
        for input in inputs {
            assert_eq!(normalize(input).unwrap(), "254712345678", "{input}");
        }
    }

    #[test]
    fn test_random_numbers_normalize_across_formats() {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let lead = if rng.gen_bool(0.5) { '7' } else { '1' };
            let rest: String = (0..8)
                .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
                .collect();
            let national = format!("{lead}{rest}");
            let expected = format!("254{national}");

            for input in [
                format!("0{national}"),
                national.clone(),
                expected.clone(),
                format!("+254 {} {} {}", &national[..3], &national[3..6], &national[6..]),
            ] {
                assert_eq!(normalize(&input).unwrap(), expected, "{input}");
            }
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        for input in ["0722000111", "+254110123456", "254733123456"] {
            let once = normalize(input).unwrap();
            assert_eq!(normalize(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_rejections() {
        assert_eq!(normalize(""), Err(NormalizeError::Empty));
        assert_eq!(normalize("12345"), Err(NormalizeError::InvalidLength(5)));
        assert_eq!(normalize("255712345678"), Err(NormalizeError::WrongCountryCode));
        assert_eq!(normalize("1712345678"), Err(NormalizeError::InvalidLength(10)));
        assert_eq!(normalize("0212345678"), Err(NormalizeError::NotMobile));

        let result = PhoneValidator::new().validate("255712345678");
        assert!(!result.valid);
        assert!(result.normalized.is_none());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_provider_labels() {
        let v = PhoneValidator::new();
        assert_eq!(v.validate("0712345678").provider, Some(Provider::Safaricom));
        assert_eq!(v.validate("0733123456").provider, Some(Provider::Airtel));
        assert_eq!(v.validate("0771234567").provider, Some(Provider::Telkom));
        assert_eq!(v.validate("0764123456").provider, Some(Provider::Equitel));

        let unknown = v.validate("0760815930");
        assert!(unknown.valid);
        assert_eq!(unknown.provider, Some(Provider::Unknown));
        assert_eq!(unknown.warnings.len(), 1);
    }

    #[test]
    fn test_suspicious_runs_warn_only() {
        let v = PhoneValidator::new();
        let repeated = v.validate("0711111111");
        assert!(repeated.valid);
        assert!(repeated.is_suspicious);

        let sequential = v.validate("0712345678");
        assert!(sequential.valid);
        assert!(sequential.is_suspicious);

        let plain = v.validate("0722815930");
        assert!(plain.valid);
        assert!(!plain.is_suspicious);
    }

    #[test]
    fn test_extract_from_text() {
        let text = "Confirmed. KES 5,000 from John 0712345678 on 01/01/2025 at 14:30";
        assert_eq!(extract(text).as_deref(), Some("254712345678"));
        assert_eq!(extract("sent to +254733123456.").as_deref(), Some("254733123456"));
        assert_eq!(extract("no number here, ref 123"), None);
    }
}
