use thiserror::Error;

const MAX_KEY_LEN: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreKeyError {
    #[error("store key must not be empty")]
    Empty,
    #[error("store key is longer than 64 characters")]
    TooLong,
    #[error("store key must not start with '.'")]
    LeadingDot,
    #[error("store key contains invalid character '{character}'")]
    InvalidCharacter { character: char },
}

/// Keys become file names, so only a portable subset of characters is accepted.
pub(crate) fn validate_store_key(key: &str) -> Result<(), StoreKeyError> {
    if key.is_empty() {
        return Err(StoreKeyError::Empty);
    }
    if key.chars().count() > MAX_KEY_LEN {
        return Err(StoreKeyError::TooLong);
    }
    if key.starts_with('.') {
        return Err(StoreKeyError::LeadingDot);
    }
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.') {
            continue;
        }
        return Err(StoreKeyError::InvalidCharacter { character: ch });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_keys() {
        for key in ["skyboundSave", "slot_1", "a-b.c"] {
            assert!(validate_store_key(key).is_ok(), "key={key}");
        }
    }

    #[test]
    fn rejects_invalid_keys() {
        for key in ["", ".hidden", "..", "a/b", r"a\b", "white space"] {
            assert!(validate_store_key(key).is_err(), "key={key}");
        }
    }

    #[test]
    fn rejects_overlong_key() {
        let key = "k".repeat(MAX_KEY_LEN + 1);
        assert_eq!(validate_store_key(&key), Err(StoreKeyError::TooLong));
    }
}
