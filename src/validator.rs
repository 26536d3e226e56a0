// 🔎 CPF Validator - structural validation of the taxpayer identifier
// Two weighted mod-11 check digits over an 11-digit numeric string

use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Outcome of structural CPF validation.
///
/// Malformed is a normal return value, not an error: it covers wrong length,
/// non-digit characters, the ten repeated-digit sequences and check digit
/// mismatches. The pipeline does not distinguish these subcases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationResult {
    Valid,
    Malformed,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        *self == ValidationResult::Valid
    }
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validate a CPF string.
///
/// A valid CPF is exactly 11 ASCII digits, not all identical, whose two
/// trailing digits match the weighted mod-11 check digits computed from the
/// preceding positions. Pure function, never panics on malformed input.
pub fn validate(input: &str) -> ValidationResult {
    let digits = match parse_digits(input) {
        Some(d) => d,
        None => return ValidationResult::Malformed,
    };

    // The ten degenerate sequences ("00000000000".."99999999999") pass the
    // checksum arithmetic but are not assignable identifiers
    if digits.iter().all(|&d| d == digits[0]) {
        return ValidationResult::Malformed;
    }

    // First check digit: positions 0..8 weighted 10 down to 2, compared
    // against position 9. Computed before the second digit; the second pass
    // includes position 9 in its sum.
    let sum: u32 = digits[..9]
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * (10 - i as u32))
        .sum();
    let mut d1 = 11 - (sum % 11);
    if d1 >= 10 {
        d1 = 0;
    }
    if d1 != digits[9] as u32 {
        return ValidationResult::Malformed;
    }

    // Second check digit: positions 0..9 weighted 11 down to 2, compared
    // against position 10
    let sum: u32 = digits[..10]
        .iter()
        .enumerate()
        .map(|(i, &d)| d as u32 * (11 - i as u32))
        .sum();
    let mut d2 = 11 - (sum % 11);
    if d2 >= 10 {
        d2 = 0;
    }
    if d2 != digits[10] as u32 {
        return ValidationResult::Malformed;
    }

    ValidationResult::Valid
}

/// Parse the input into exactly 11 digit values, or None if the shape is wrong
fn parse_digits(input: &str) -> Option<[u8; 11]> {
    if input.len() != 11 {
        return None;
    }

    let mut digits = [0u8; 11];
    for (i, c) in input.chars().enumerate() {
        digits[i] = c.to_digit(10)? as u8;
    }
    Some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_cpf() {
        assert_eq!(validate("52998224725"), ValidationResult::Valid);
        assert_eq!(validate("11144477735"), ValidationResult::Valid);
    }

    #[test]
    fn test_corrupted_check_digit() {
        // Last digit off by one
        assert_eq!(validate("52998224724"), ValidationResult::Malformed);
        // First check digit corrupted
        assert_eq!(validate("52998224735"), ValidationResult::Malformed);
    }

    #[test]
    fn test_repeated_digit_sequences() {
        for d in 0..10 {
            let cpf: String = std::iter::repeat(char::from(b'0' + d)).take(11).collect();
            assert_eq!(
                validate(&cpf),
                ValidationResult::Malformed,
                "repeated sequence {} must be rejected",
                cpf
            );
        }
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(validate(""), ValidationResult::Malformed);
        assert_eq!(validate("5299822472"), ValidationResult::Malformed);
        assert_eq!(validate("529982247255"), ValidationResult::Malformed);
    }

    #[test]
    fn test_non_digit_characters() {
        assert_eq!(validate("529.982.247"), ValidationResult::Malformed);
        assert_eq!(validate("5299822472a"), ValidationResult::Malformed);
        assert_eq!(validate("           "), ValidationResult::Malformed);
        // Multi-byte chars must not panic
        assert_eq!(validate("5299822472ñ"), ValidationResult::Malformed);
    }

    #[test]
    fn test_idempotence() {
        let first = validate("52998224725");
        let second = validate("52998224725");
        assert_eq!(first, second);

        let first = validate("52998224724");
        let second = validate("52998224724");
        assert_eq!(first, second);
    }
}
