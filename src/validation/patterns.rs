//! Pattern tables for extracting amounts, phones and reference codes.
//!
//! Every supported input format is one row in a table; adding a format
//! means adding a row and a test case, not new control flow.

use crate::domain::validation::Provider;
use regex::Regex;
use std::sync::LazyLock;

/// Currency-tagged amounts. Capture group 1 is the numeric part; within a row
/// the thousand-separated form is tried before the plain one.
pub const AMOUNT_SOURCES: &[&str] = &[
    // KES 5,000 | Ksh5,000.00 | KSHS. 1,250.50 | kes 75.5
    r"(?i)\b(?:kes|kshs|ksh)\.?\s*(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)",
    // 5,000 KES | 300.00 Ksh
    r"(?i)(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)\s*(?:kes|kshs|ksh)\b",
];

/// Amount-like tokens for signatures, with or without a currency tag.
pub const AMOUNT_TOKEN_SOURCES: &[&str] =
    &[r"\b(?:\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+\.\d{2})\b"];

/// Candidate phone tokens; each is confirmed by normalization afterwards.
pub const PHONE_CANDIDATE_SOURCES: &[&str] = &[r"\+?\b\d{9,12}\b"];

/// Long digit runs used as phone-like signature tokens.
pub const DIGIT_RUN_SOURCES: &[&str] = &[r"\d{7,}"];

/// Upper-case alphanumeric transaction codes such as `QAB123ABC`.
pub const REFERENCE_SOURCES: &[&str] = &[r"\b[A-Z0-9]{8,12}\b"];

pub const KEYWORD_SOURCES: &[&str] = &[
    r"(?i)\b(?:confirmed|received|sent|paid|transferred|withdrawn|deposited|credited|debited)\b",
    r"(?i)\b(?:balance|transaction|cost)\b",
];

pub const DATE_SOURCES: &[&str] = &[
    // 01/01/2025 | 1/1/25
    r"\b\d{1,2}/\d{1,2}/\d{2,4}\b",
    // 2025-01-01
    r"\b\d{4}-\d{2}-\d{2}\b",
];

pub const TIME_SOURCES: &[&str] = &[r"(?i)\b\d{1,2}:\d{2}(?:\s?[ap]m)?\b"];

pub static AMOUNT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(AMOUNT_SOURCES));
pub static AMOUNT_TOKEN_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(AMOUNT_TOKEN_SOURCES));
pub static PHONE_CANDIDATE_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(PHONE_CANDIDATE_SOURCES));
pub static DIGIT_RUN_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DIGIT_RUN_SOURCES));
pub static REFERENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(REFERENCE_SOURCES));
pub static KEYWORD_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(KEYWORD_SOURCES));
pub static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(DATE_SOURCES));
pub static TIME_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(TIME_SOURCES));

/// Sources are literals covered by `test_all_patterns_compile`.
fn compile(sources: &[&str]) -> Vec<Regex> {
    sources.iter().filter_map(|s| Regex::new(s).ok()).collect()
}

pub fn any_match(patterns: &[Regex], text: &str) -> bool {
    patterns.iter().any(|p| p.is_match(text))
}

/// Reference codes must mix letters and digits; pure numbers are phones or
/// amounts, pure words are names. Tokens inside a currency amount such as
/// `KES15000.00` are not references.
pub fn find_references(text: &str) -> Vec<String> {
    let amounts: Vec<(usize, usize)> = AMOUNT_PATTERNS
        .iter()
        .flat_map(|p| p.find_iter(text))
        .map(|m| (m.start(), m.end()))
        .collect();

    REFERENCE_PATTERNS
        .iter()
        .flat_map(|p| p.find_iter(text))
        .filter(|m| {
            !amounts
                .iter()
                .any(|&(start, end)| m.start() >= start && m.end() <= end)
        })
        .map(|m| m.as_str())
        .filter(|s| s.chars().any(|c| c.is_ascii_digit()) && s.chars().any(|c| c.is_ascii_uppercase()))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Phone numbering plan
// ---------------------------------------------------------------------------

pub const COUNTRY_CODE: &str = "254";

/// Digits after the country code.
pub const NATIONAL_NUMBER_LEN: usize = 9;

/// Leading digit of a mobile national number.
pub const MOBILE_LEADING_DIGITS: &[char] = &['7', '1'];

/// National-number prefixes per provider. Longest match wins.
pub const PROVIDER_PREFIXES: &[(&str, Provider)] = &[
    ("70", Provider::Safaricom),
    ("71", Provider::Safaricom),
    ("72", Provider::Safaricom),
    ("740", Provider::Safaricom),
    ("741", Provider::Safaricom),
    ("742", Provider::Safaricom),
    ("743", Provider::Safaricom),
    ("745", Provider::Safaricom),
    ("746", Provider::Safaricom),
    ("748", Provider::Safaricom),
    ("757", Provider::Safaricom),
    ("758", Provider::Safaricom),
    ("759", Provider::Safaricom),
    ("768", Provider::Safaricom),
    ("769", Provider::Safaricom),
    ("79", Provider::Safaricom),
    ("110", Provider::Safaricom),
    ("111", Provider::Safaricom),
    ("112", Provider::Safaricom),
    ("113", Provider::Safaricom),
    ("114", Provider::Safaricom),
    ("115", Provider::Safaricom),
    ("73", Provider::Airtel),
    ("750", Provider::Airtel),
    ("751", Provider::Airtel),
    ("752", Provider::Airtel),
    ("753", Provider::Airtel),
    ("754", Provider::Airtel),
    ("755", Provider::Airtel),
    ("756", Provider::Airtel),
    ("762", Provider::Airtel),
    ("78", Provider::Airtel),
    ("100", Provider::Airtel),
    ("101", Provider::Airtel),
    ("102", Provider::Airtel),
    ("77", Provider::Telkom),
    ("763", Provider::Equitel),
    ("764", Provider::Equitel),
    ("765", Provider::Equitel),
    ("766", Provider::Equitel),
];

pub fn provider_for(national: &str) -> Provider {
    PROVIDER_PREFIXES
        .iter()
        .filter(|(prefix, _)| national.starts_with(prefix))
        .max_by_key(|(prefix, _)| prefix.len())
        .map(|(_, provider)| *provider)
        .unwrap_or(Provider::Unknown)
}

// ---------------------------------------------------------------------------
// Digit patterns
// ---------------------------------------------------------------------------

/// Length of the longest run of one repeated digit.
pub fn longest_repeat(digits: &str) -> usize {
    longest_run(digits, |a, b| a == b)
}

/// Length of the longest run of consecutive ascending or descending digits.
pub fn longest_sequence(digits: &str) -> usize {
    let ascending = longest_run(digits, |a, b| b as i32 - a as i32 == 1);
    let descending = longest_run(digits, |a, b| a as i32 - b as i32 == 1);
    ascending.max(descending)
}

fn longest_run(digits: &str, step: impl Fn(u8, u8) -> bool) -> usize {
    let bytes: Vec<u8> = digits.bytes().filter(u8::is_ascii_digit).collect();
    if bytes.is_empty() {
        return 0;
    }
    let mut best = 1;
    let mut current = 1;
    for pair in bytes.windows(2) {
        if step(pair[0], pair[1]) {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(AMOUNT_PATTERNS.len(), AMOUNT_SOURCES.len());
        assert_eq!(AMOUNT_TOKEN_PATTERNS.len(), AMOUNT_TOKEN_SOURCES.len());
        assert_eq!(PHONE_CANDIDATE_PATTERNS.len(), PHONE_CANDIDATE_SOURCES.len());
        assert_eq!(DIGIT_RUN_PATTERNS.len(), DIGIT_RUN_SOURCES.len());
        assert_eq!(REFERENCE_PATTERNS.len(), REFERENCE_SOURCES.len());
        assert_eq!(KEYWORD_PATTERNS.len(), KEYWORD_SOURCES.len());
        assert_eq!(DATE_PATTERNS.len(), DATE_SOURCES.len());
        assert_eq!(TIME_PATTERNS.len(), TIME_SOURCES.len());
    }

    #[test]
    fn test_provider_longest_prefix_wins() {
        assert_eq!(provider_for("712345678"), Provider::Safaricom);
        assert_eq!(provider_for("733123456"), Provider::Airtel);
        assert_eq!(provider_for("763123456"), Provider::Equitel);
        assert_eq!(provider_for("762123456"), Provider::Airtel);
        assert_eq!(provider_for("768123456"), Provider::Safaricom);
        assert_eq!(provider_for("771234567"), Provider::Telkom);
        assert_eq!(provider_for("760123456"), Provider::Unknown);
    }

    #[test]
    fn test_references_need_letters_and_digits() {
        let refs = find_references("ref QAB123ABC from JOHNDOEXX 0712345678");
        assert_eq!(refs, vec!["QAB123ABC".to_string()]);
    }

    #[test]
    fn test_digit_runs() {
        assert_eq!(longest_repeat("0777777712"), 7);
        assert_eq!(longest_sequence("5123456"), 6);
        assert_eq!(longest_sequence("987650"), 5);
        assert_eq!(longest_repeat(""), 0);
    }
}
