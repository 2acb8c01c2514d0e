//! Declarative sanitization policies.

use indexmap::IndexMap;
use std::collections::HashMap;

use crate::matcher::Matcher;
use crate::recover::ErrorHandling;

/// Everything the sanitizer is told about what to let through. Treated as
/// immutable for the duration of a run.
#[derive(Clone, Debug, Default)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct Policy {
    pub preserve_comments: bool,
    pub tags: HashMap<String, TagRule>,
    pub top_level_limits: Limits,
    pub error_handling: ErrorHandling,
}

/// Per-tag admission rule: which attributes the tag may carry and how wide
/// and deep its subtree may grow. The attribute key `"*"` is a catch-all
/// admission fallback; it never creates a required-attribute obligation.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(default))]
pub struct TagRule {
    pub attributes: IndexMap<String, AttrRule>,
    pub limits: Limits,
}

#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Deserialize), serde(default))]
pub struct Limits {
    pub children: Option<usize>,
    pub nesting: Option<usize>,
}

/// The three shapes an attribute value can take, tagged by `mode` on the
/// wire: a plain scalar, an ordered delimiter-separated set, or an ordered
/// key/value record.
#[derive(Clone, Debug)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(tag = "mode", rename_all = "lowercase")
)]
pub enum AttrRule {
    #[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
    Simple {
        value: Matcher,
        #[cfg_attr(feature = "json", serde(default))]
        default_value: Option<String>,
        #[cfg_attr(feature = "json", serde(default))]
        max_length: Option<usize>,
        #[cfg_attr(feature = "json", serde(default))]
        required: bool,
    },
    #[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
    Set {
        delimiter: String,
        #[cfg_attr(feature = "json", serde(default))]
        max_entries: Option<usize>,
        values: Matcher,
        #[cfg_attr(feature = "json", serde(default))]
        default_value: Option<String>,
        #[cfg_attr(feature = "json", serde(default))]
        max_length: Option<usize>,
        #[cfg_attr(feature = "json", serde(default))]
        required: bool,
    },
    #[cfg_attr(feature = "json", serde(rename_all = "camelCase"))]
    Record {
        entry_separator: String,
        key_value_separator: String,
        #[cfg_attr(feature = "json", serde(default))]
        max_entries: Option<usize>,
        values: IndexMap<String, Matcher>,
        #[cfg_attr(feature = "json", serde(default))]
        default_value: Option<String>,
        #[cfg_attr(feature = "json", serde(default))]
        max_length: Option<usize>,
        #[cfg_attr(feature = "json", serde(default))]
        required: bool,
    },
}

impl AttrRule {
    pub fn default_value(&self) -> Option<&str> {
        match self {
            AttrRule::Simple { default_value, .. }
            | AttrRule::Set { default_value, .. }
            | AttrRule::Record { default_value, .. } => default_value.as_deref(),
        }
    }

    pub fn max_length(&self) -> Option<usize> {
        match self {
            AttrRule::Simple { max_length, .. }
            | AttrRule::Set { max_length, .. }
            | AttrRule::Record { max_length, .. } => *max_length,
        }
    }

    pub fn required(&self) -> bool {
        match self {
            AttrRule::Simple { required, .. }
            | AttrRule::Set { required, .. }
            | AttrRule::Record { required, .. } => *required,
        }
    }
}
