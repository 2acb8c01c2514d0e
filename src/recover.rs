//! Recovery strategies for policy violations.
//!
//! Each violation class owns an enum of its native strategies. A class
//! whose slot is unset falls back to the next-broader class, down the chain
//! collection/duplicate/value-shape → `attribute_value` → `attribute` →
//! `tag`; the top-level classes (`tag`, `tag_children`, `tag_nesting`)
//! throw when unset.

use markup5ever_rcdom::Handle;

use crate::dom;
use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum TagStrategy {
    DiscardElement,
    UnwrapElement,
    ThrowError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum AttributeStrategy {
    DiscardAttribute,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum AttributeValueStrategy {
    ApplyDefaultValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum ValueTooLongStrategy {
    TrimExcess,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum SetValueStrategy {
    DropValue,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RecordValueStrategy {
    DropPair,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum RecordDuplicateStrategy {
    DropDuplicates,
    KeepDuplicates,
    KeepFirst,
    KeepLast,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum CollectionTooManyStrategy {
    DropExtra,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum TagChildrenStrategy {
    DiscardElement,
    DiscardFirsts,
    DiscardLasts,
    ThrowError,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub enum TagNestingStrategy {
    DiscardElement,
    ThrowError,
}

/// One optional strategy slot per violation class.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(
    feature = "json",
    derive(serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ErrorHandling {
    pub tag: Option<TagStrategy>,
    pub attribute: Option<AttributeStrategy>,
    pub attribute_value: Option<AttributeValueStrategy>,
    pub value_too_long: Option<ValueTooLongStrategy>,
    pub set_value: Option<SetValueStrategy>,
    pub record_value: Option<RecordValueStrategy>,
    pub record_duplicate: Option<RecordDuplicateStrategy>,
    pub collection_too_many: Option<CollectionTooManyStrategy>,
    pub tag_children: Option<TagChildrenStrategy>,
    pub tag_nesting: Option<TagNestingStrategy>,
}

/// How an attribute-level recovery left things.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Outcome {
    /// The element was detached or unwrapped; abandon it.
    ElementGone,
    /// The attribute was resolved (defaulted, deleted, discarded); stop
    /// working on it.
    AttributeDone,
    /// Skip the offending piece and keep going.
    Continue,
}

/// As [`Outcome`], split so the duplicate-key handler can also say whether
/// the current pair joins the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DuplicateOutcome {
    ElementGone,
    AttributeDone,
    SkipCurrent,
    KeepCurrent,
}

/// Returns false when the element was removed or unwrapped.
pub(crate) fn tag_violation(
    element: &Handle,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<bool> {
    match handling.tag {
        Some(TagStrategy::DiscardElement) => {
            dom::detach(element);
            Ok(false)
        }
        Some(TagStrategy::UnwrapElement) => {
            dom::unwrap(element);
            Ok(false)
        }
        Some(TagStrategy::ThrowError) | None => Err(violation()),
    }
}

pub(crate) fn children_violation(
    node: &Handle,
    handling: &ErrorHandling,
    limit: usize,
    violation: impl FnOnce() -> Error,
) -> Result<bool> {
    match handling.tag_children {
        Some(TagChildrenStrategy::DiscardElement) => {
            dom::detach(node);
            Ok(false)
        }
        Some(TagChildrenStrategy::DiscardFirsts) => {
            let excess = dom::child_count(node).saturating_sub(limit);
            for child in dom::child_snapshot(node).iter().take(excess) {
                dom::detach(child);
            }
            Ok(true)
        }
        Some(TagChildrenStrategy::DiscardLasts) => {
            let snapshot = dom::child_snapshot(node);
            let excess = snapshot.len().saturating_sub(limit);
            for child in snapshot.iter().rev().take(excess) {
                dom::detach(child);
            }
            Ok(true)
        }
        Some(TagChildrenStrategy::ThrowError) | None => Err(violation()),
    }
}

pub(crate) fn nesting_violation(
    element: &Handle,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<bool> {
    match handling.tag_nesting {
        Some(TagNestingStrategy::DiscardElement) => {
            dom::detach(element);
            Ok(false)
        }
        Some(TagNestingStrategy::ThrowError) | None => Err(violation()),
    }
}

pub(crate) fn attribute_violation(
    element: &Handle,
    name: &str,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.attribute {
        Some(AttributeStrategy::DiscardAttribute) => {
            dom::remove_attribute(element, name);
            Ok(Outcome::AttributeDone)
        }
        None => {
            if tag_violation(element, handling, violation)? {
                Ok(Outcome::AttributeDone)
            } else {
                Ok(Outcome::ElementGone)
            }
        }
    }
}

pub(crate) fn value_violation(
    element: &Handle,
    name: &str,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.attribute_value {
        Some(AttributeValueStrategy::ApplyDefaultValue) => {
            match default_value {
                Some(default) => dom::set_attribute(element, name, default),
                None => dom::remove_attribute(element, name),
            }
            Ok(Outcome::AttributeDone)
        }
        None => attribute_violation(element, name, handling, violation),
    }
}

pub(crate) fn overlong_value(
    element: &Handle,
    name: &str,
    limit: usize,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.value_too_long {
        Some(ValueTooLongStrategy::TrimExcess) => {
            if let Some(value) = dom::get_attribute(element, name) {
                let trimmed: String = value.chars().take(limit).collect();
                dom::set_attribute(element, name, &trimmed);
            }
            Ok(Outcome::Continue)
        }
        None => value_violation(element, name, default_value, handling, violation),
    }
}

pub(crate) fn set_entry_violation(
    element: &Handle,
    name: &str,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.set_value {
        Some(SetValueStrategy::DropValue) => Ok(Outcome::Continue),
        None => value_violation(element, name, default_value, handling, violation),
    }
}

pub(crate) fn pair_violation(
    element: &Handle,
    name: &str,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.record_value {
        Some(RecordValueStrategy::DropPair) => Ok(Outcome::Continue),
        None => value_violation(element, name, default_value, handling, violation),
    }
}

/// Indirect handler: may truncate `entries` in place.
pub(crate) fn oversized_collection<T>(
    element: &Handle,
    name: &str,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    entries: &mut Vec<T>,
    limit: usize,
    violation: impl FnOnce() -> Error,
) -> Result<Outcome> {
    match handling.collection_too_many {
        Some(CollectionTooManyStrategy::DropExtra) => {
            entries.truncate(limit);
            Ok(Outcome::Continue)
        }
        None => value_violation(element, name, default_value, handling, violation),
    }
}

/// Indirect handler: may rewrite the accumulated `output` in place and
/// decides whether the current pair joins it.
pub(crate) fn duplicate_key(
    element: &Handle,
    name: &str,
    default_value: Option<&str>,
    handling: &ErrorHandling,
    key: &str,
    output: &mut Vec<(String, String)>,
    violation: impl FnOnce() -> Error,
) -> Result<DuplicateOutcome> {
    match handling.record_duplicate {
        Some(RecordDuplicateStrategy::DropDuplicates) => {
            output.retain(|(existing, _)| existing != key);
            Ok(DuplicateOutcome::SkipCurrent)
        }
        Some(RecordDuplicateStrategy::KeepDuplicates) => Ok(DuplicateOutcome::KeepCurrent),
        Some(RecordDuplicateStrategy::KeepFirst) => Ok(DuplicateOutcome::SkipCurrent),
        Some(RecordDuplicateStrategy::KeepLast) => {
            output.retain(|(existing, _)| existing != key);
            Ok(DuplicateOutcome::KeepCurrent)
        }
        None => match value_violation(element, name, default_value, handling, violation)? {
            Outcome::ElementGone => Ok(DuplicateOutcome::ElementGone),
            _ => Ok(DuplicateOutcome::AttributeDone),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::tests::{append, element};

    fn violation() -> Error {
        Error::TagNotAllowed {
            tag: "div".to_string(),
        }
    }

    #[test]
    fn tag_violation_throws_by_default() {
        let node = element("div");
        assert!(tag_violation(&node, &ErrorHandling::default(), violation).is_err());
    }

    #[test]
    fn tag_violation_discards() {
        let parent = element("div");
        let child = element("span");
        append(&parent, &child);
        let handling = ErrorHandling {
            tag: Some(TagStrategy::DiscardElement),
            ..Default::default()
        };
        assert!(!tag_violation(&child, &handling, violation).unwrap());
        assert!(parent.children.borrow().is_empty());
    }

    #[test]
    fn attribute_violation_falls_back_to_tag() {
        let node = element("div");
        dom::set_attribute(&node, "onclick", "x");

        // unset attribute slot escalates to the (throwing) tag level
        assert!(attribute_violation(&node, "onclick", &ErrorHandling::default(), violation).is_err());

        let handling = ErrorHandling {
            tag: Some(TagStrategy::DiscardElement),
            ..Default::default()
        };
        assert_eq!(
            attribute_violation(&node, "onclick", &handling, violation).unwrap(),
            Outcome::ElementGone
        );
    }

    #[test]
    fn attribute_violation_discards_attribute() {
        let node = element("div");
        dom::set_attribute(&node, "onclick", "x");
        let handling = ErrorHandling {
            attribute: Some(AttributeStrategy::DiscardAttribute),
            ..Default::default()
        };
        assert_eq!(
            attribute_violation(&node, "onclick", &handling, violation).unwrap(),
            Outcome::AttributeDone
        );
        assert!(dom::get_attribute(&node, "onclick").is_none());
    }

    #[test]
    fn default_value_applied_or_deleted() {
        let node = element("div");
        dom::set_attribute(&node, "class", "bad");
        let handling = ErrorHandling {
            attribute_value: Some(AttributeValueStrategy::ApplyDefaultValue),
            ..Default::default()
        };

        value_violation(&node, "class", Some("fallback"), &handling, violation).unwrap();
        assert_eq!(dom::get_attribute(&node, "class").as_deref(), Some("fallback"));

        value_violation(&node, "class", None, &handling, violation).unwrap();
        assert!(dom::get_attribute(&node, "class").is_none());
    }

    #[test]
    fn trim_excess_truncates_chars() {
        let node = element("div");
        dom::set_attribute(&node, "title", "héllo world");
        let handling = ErrorHandling {
            value_too_long: Some(ValueTooLongStrategy::TrimExcess),
            ..Default::default()
        };
        assert_eq!(
            overlong_value(&node, "title", 5, None, &handling, violation).unwrap(),
            Outcome::Continue
        );
        assert_eq!(dom::get_attribute(&node, "title").as_deref(), Some("héllo"));
    }

    #[test]
    fn duplicate_strategies() {
        let node = element("div");
        let handling = |strategy| ErrorHandling {
            record_duplicate: Some(strategy),
            ..Default::default()
        };
        let base = || {
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        };

        let mut output = base();
        let outcome = duplicate_key(
            &node,
            "style",
            None,
            &handling(RecordDuplicateStrategy::DropDuplicates),
            "a",
            &mut output,
            violation,
        )
        .unwrap();
        assert_eq!(outcome, DuplicateOutcome::SkipCurrent);
        assert_eq!(output, vec![("b".to_string(), "2".to_string())]);

        let mut output = base();
        let outcome = duplicate_key(
            &node,
            "style",
            None,
            &handling(RecordDuplicateStrategy::KeepFirst),
            "a",
            &mut output,
            violation,
        )
        .unwrap();
        assert_eq!(outcome, DuplicateOutcome::SkipCurrent);
        assert_eq!(output, base());

        let mut output = base();
        let outcome = duplicate_key(
            &node,
            "style",
            None,
            &handling(RecordDuplicateStrategy::KeepLast),
            "a",
            &mut output,
            violation,
        )
        .unwrap();
        assert_eq!(outcome, DuplicateOutcome::KeepCurrent);
        assert_eq!(output, vec![("b".to_string(), "2".to_string())]);

        let mut output = base();
        let outcome = duplicate_key(
            &node,
            "style",
            None,
            &handling(RecordDuplicateStrategy::KeepDuplicates),
            "a",
            &mut output,
            violation,
        )
        .unwrap();
        assert_eq!(outcome, DuplicateOutcome::KeepCurrent);
        assert_eq!(output, base());
    }

    #[test]
    fn children_violation_trims_either_end() {
        let parent = element("ul");
        for tag in ["a", "b", "c", "d"] {
            append(&parent, &element(tag));
        }
        let handling = ErrorHandling {
            tag_children: Some(TagChildrenStrategy::DiscardFirsts),
            ..Default::default()
        };
        assert!(children_violation(&parent, &handling, 2, violation).unwrap());
        let names: Vec<_> = parent
            .children
            .borrow()
            .iter()
            .map(|child| dom::element_name(child).unwrap())
            .collect();
        assert_eq!(names, vec!["c", "d"]);

        let handling = ErrorHandling {
            tag_children: Some(TagChildrenStrategy::DiscardLasts),
            ..Default::default()
        };
        assert!(children_violation(&parent, &handling, 1, violation).unwrap());
        let names: Vec<_> = parent
            .children
            .borrow()
            .iter()
            .map(|child| dom::element_name(child).unwrap())
            .collect();
        assert_eq!(names, vec!["c"]);
    }
}
