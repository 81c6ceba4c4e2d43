//! Legacy password hash.
//!
//! This is a 32-bit rolling hash kept only so that records persisted by the
//! original web client keep verifying. It is NOT a password hash in any
//! security sense: it is fast, unsalted and trivially reversible by brute
//! force. Replacing it needs a versioned hash field and a migration.

/// Hash a password the way previously persisted records were hashed.
///
/// Each UTF-16 code unit is folded in as `hash * 31 + unit` with 32-bit
/// wrap-around, and the signed result is rendered in decimal.
pub fn legacy_hash(password: &str) -> String {
    password
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "0")]
    #[case("a", "97")]
    #[case("wrong", "113405357")]
    #[case("password", "1216985755")]
    #[case("admin123", "-969161597")]
    fn test_legacy_hash_vectors(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(legacy_hash(input), expected);
    }

    #[test]
    fn test_legacy_hash_uses_utf16_units() {
        // U+1F600 is a surrogate pair, two units in UTF-16.
        assert_eq!(legacy_hash("😀"), "1772899");
        assert_eq!(legacy_hash("héllo"), "103094734");
    }

    #[test]
    fn test_legacy_hash_is_deterministic() {
        assert_eq!(legacy_hash("s3cret"), legacy_hash("s3cret"));
        assert_ne!(legacy_hash("s3cret"), legacy_hash("S3cret"));
    }
}
