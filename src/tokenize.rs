//! Raw splitting of set- and record-shaped attribute values.

use std::collections::HashSet;

/// Split a set-shaped value into trimmed, non-empty, de-duplicated tokens,
/// preserving first-occurrence order.
pub(crate) fn parse_set(input: &str, delimiter: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();
    for token in input.split(delimiter) {
        let token = token.trim();
        if token.is_empty() || seen.contains(token) {
            continue;
        }
        seen.insert(token.to_owned());
        tokens.push(token.to_owned());
    }
    tokens
}

/// Split a record-shaped value into key/value pairs. Only entries that
/// split into exactly two non-empty parts survive. Duplicate keys are kept;
/// duplicate handling is a policy decision, not a parsing one.
pub(crate) fn parse_record(
    input: &str,
    entry_separator: &str,
    key_value_separator: &str,
) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for entry in input.trim().split(entry_separator) {
        let parts: Vec<&str> = entry.split(key_value_separator).collect();
        if parts.len() != 2 {
            continue;
        }
        let key = parts[0].trim();
        let value = parts[1].trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        pairs.push((key.to_owned(), value.to_owned()));
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_trims_and_drops_empties() {
        assert_eq!(parse_set("  a  b   c ", " "), vec!["a", "b", "c"]);
        assert_eq!(parse_set("a;;b;", ";"), vec!["a", "b"]);
    }

    #[test]
    fn set_dedupes_preserving_order() {
        assert_eq!(parse_set("b a b c a", " "), vec!["b", "a", "c"]);
    }

    #[test]
    fn set_empty_input() {
        assert!(parse_set("", " ").is_empty());
        assert!(parse_set("   ", " ").is_empty());
    }

    #[test]
    fn record_splits_pairs() {
        assert_eq!(
            parse_record("color: red; width: 10px", ";", ":"),
            vec![
                ("color".to_string(), "red".to_string()),
                ("width".to_string(), "10px".to_string()),
            ]
        );
    }

    #[test]
    fn record_rejects_malformed_entries() {
        // no separator, empty side, and too many parts all drop out
        assert_eq!(
            parse_record("plain; :red; a:b:c; ok:1", ";", ":"),
            vec![("ok".to_string(), "1".to_string())]
        );
    }

    #[test]
    fn record_keeps_duplicates() {
        assert_eq!(
            parse_record("a:1;a:2", ";", ":"),
            vec![
                ("a".to_string(), "1".to_string()),
                ("a".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn record_empty_input() {
        assert!(parse_record("", ";", ":").is_empty());
    }
}
