use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Declarative predicate over a single attribute value.
///
/// Built from policy literals: `"*"` admits anything, a string matches
/// exactly, a list matches by membership, a regular expression by search,
/// and a boolean by emptiness (`true` matches the empty string, `false`
/// any non-empty one). Predicates wrap arbitrary user functions and have
/// no wire form.
#[derive(Clone)]
pub enum Matcher {
    Any,
    Exact(String),
    AnyOf(Vec<String>),
    Pattern(Regex),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
    Empty(bool),
}

impl Matcher {
    pub fn predicate<F>(check: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Matcher::Predicate(Arc::new(check))
    }

    /// Evaluation order is fixed: wildcard, predicate, pattern, exact
    /// string, list membership, emptiness.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Any => true,
            Matcher::Predicate(check) => check(value),
            Matcher::Pattern(pattern) => pattern.is_match(value),
            Matcher::Exact(expected) => expected == value,
            Matcher::AnyOf(allowed) => allowed.iter().any(|entry| entry == value),
            Matcher::Empty(want_empty) => *want_empty == value.is_empty(),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Any => f.write_str("Any"),
            Matcher::Exact(value) => f.debug_tuple("Exact").field(value).finish(),
            Matcher::AnyOf(values) => f.debug_tuple("AnyOf").field(values).finish(),
            Matcher::Pattern(pattern) => f.debug_tuple("Pattern").field(&pattern.as_str()).finish(),
            Matcher::Predicate(_) => f.write_str("Predicate(..)"),
            Matcher::Empty(want_empty) => f.debug_tuple("Empty").field(want_empty).finish(),
        }
    }
}

#[cfg(feature = "json")]
impl<'de> serde::Deserialize<'de> for Matcher {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{self, MapAccess, SeqAccess, Visitor};

        struct MatcherVisitor;

        impl<'de> Visitor<'de> for MatcherVisitor {
            type Value = Matcher;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("\"*\", a string, a list of strings, a boolean, or {\"regex\": \"...\"}")
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<Matcher, E> {
                Ok(Matcher::Empty(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Matcher, E> {
                Ok(if value == "*" {
                    Matcher::Any
                } else {
                    Matcher::Exact(value.to_owned())
                })
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Matcher, A::Error> {
                let mut allowed = Vec::new();
                while let Some(entry) = seq.next_element::<String>()? {
                    allowed.push(entry);
                }
                Ok(Matcher::AnyOf(allowed))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Matcher, A::Error> {
                let mut pattern: Option<String> = None;
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "regex" => pattern = Some(map.next_value()?),
                        other => return Err(de::Error::unknown_field(other, &["regex"])),
                    }
                }
                let pattern = pattern.ok_or_else(|| de::Error::missing_field("regex"))?;
                let compiled = Regex::new(&pattern).map_err(de::Error::custom)?;
                Ok(Matcher::Pattern(compiled))
            }
        }

        deserializer.deserialize_any(MatcherVisitor)
    }
}
