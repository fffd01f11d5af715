use std::fmt;

/// The hashable subset of runtime values.
///
/// Used both as hash-map keys and as memoization cache keys. Equality and
/// hashing are exact per variant: `Integer(1)` and `String("1")` are distinct
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Integer(i64),
    Boolean(bool),
    String(String),
}

/// Label listing the hashable variants, used by key-validation errors.
pub const HASHABLE_HINT: &str = "String, Int, Bool";

impl fmt::Display for HashKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKey::Integer(v) => write!(f, "{}", v),
            HashKey::Boolean(v) => write!(f, "{}", v),
            HashKey::String(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl HashKey {
    /// Canonical unquoted text, used where keys become JSON object keys.
    pub fn as_plain_text(&self) -> String {
        match self {
            HashKey::Integer(v) => v.to_string(),
            HashKey::Boolean(v) => v.to_string(),
            HashKey::String(v) => v.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_strings_only() {
        assert_eq!(HashKey::Integer(7).to_string(), "7");
        assert_eq!(HashKey::Boolean(true).to_string(), "true");
        assert_eq!(HashKey::String("k".to_string()).to_string(), "\"k\"");
    }

    #[test]
    fn test_plain_text_is_unquoted() {
        assert_eq!(HashKey::String("k".to_string()).as_plain_text(), "k");
        assert_eq!(HashKey::Integer(-3).as_plain_text(), "-3");
    }

    #[test]
    fn test_variants_are_distinct_keys() {
        assert_ne!(
            HashKey::Integer(1),
            HashKey::String("1".to_string())
        );
    }
}
