//! Attribute sanitization: the per-element driver and the three
//! value-shape sanitizers.

use std::collections::HashSet;

use indexmap::IndexMap;
use log::trace;
use markup5ever_rcdom::Handle;

use crate::dom;
use crate::error::{Error, Result};
use crate::policy::AttrRule;
use crate::recover::{self, DuplicateOutcome, ErrorHandling, Outcome};
use crate::tokenize;

/// Police every attribute on `element`, then enforce required attributes.
/// Returns false when a recovery removed or unwrapped the element.
pub(crate) fn sanitize_attributes(
    element: &Handle,
    tag: &str,
    rules: &IndexMap<String, AttrRule>,
    handling: &ErrorHandling,
) -> Result<bool> {
    for name in dom::attribute_names(element) {
        match rules.get(&name).or_else(|| rules.get("*")) {
            None => {
                trace!("dropping attribute \"{name}\" on <{tag}>");
                let outcome = recover::attribute_violation(element, &name, handling, || {
                    Error::AttributeNotAllowed {
                        tag: tag.to_owned(),
                        attribute: name.clone(),
                    }
                })?;
                if outcome == Outcome::ElementGone {
                    return Ok(false);
                }
            }
            Some(rule) => {
                if !sanitize_value(element, tag, &name, rule, handling)? {
                    return Ok(false);
                }
            }
        }
    }

    // required attributes; "*" is an admission fallback, never an obligation
    for (name, rule) in rules {
        if name == "*" || !rule.required() || dom::get_attribute(element, name).is_some() {
            continue;
        }
        let outcome = recover::value_violation(element, name, rule.default_value(), handling, || {
            Error::MissingAttribute {
                tag: tag.to_owned(),
                attribute: name.clone(),
            }
        })?;
        if outcome == Outcome::ElementGone {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Check one attribute value against its rule, rewriting it in place.
/// Returns false when a recovery removed or unwrapped the element.
fn sanitize_value(
    element: &Handle,
    tag: &str,
    name: &str,
    rule: &AttrRule,
    handling: &ErrorHandling,
) -> Result<bool> {
    let mut value = match dom::get_attribute(element, name) {
        Some(value) => value,
        None => return Ok(true),
    };

    if let Some(limit) = rule.max_length() {
        if value.chars().count() > limit {
            let outcome =
                recover::overlong_value(element, name, limit, rule.default_value(), handling, || {
                    Error::ValueTooLong {
                        tag: tag.to_owned(),
                        attribute: name.to_owned(),
                        limit,
                    }
                })?;
            if outcome == Outcome::ElementGone {
                return Ok(false);
            }
            // the recovery may have trimmed, replaced, or deleted the value
            value = match dom::get_attribute(element, name) {
                None => return Ok(true),
                Some(value) if value.is_empty() => return Ok(true),
                Some(value) => value,
            };
        }
    }

    match rule {
        AttrRule::Simple {
            value: matcher,
            default_value,
            ..
        } => {
            if matcher.matches(&value) {
                return Ok(true);
            }
            let outcome =
                recover::value_violation(element, name, default_value.as_deref(), handling, || {
                    Error::ValueNotAllowed {
                        tag: tag.to_owned(),
                        attribute: name.to_owned(),
                        value: value.clone(),
                    }
                })?;
            Ok(outcome != Outcome::ElementGone)
        }
        AttrRule::Set {
            delimiter,
            max_entries,
            values,
            default_value,
            ..
        } => {
            let mut tokens = tokenize::parse_set(&value, delimiter);
            if let Some(limit) = *max_entries {
                if tokens.len() > limit {
                    let count = tokens.len();
                    let outcome = recover::oversized_collection(
                        element,
                        name,
                        default_value.as_deref(),
                        handling,
                        &mut tokens,
                        limit,
                        || Error::TooManyEntries {
                            tag: tag.to_owned(),
                            attribute: name.to_owned(),
                            count,
                            limit,
                        },
                    )?;
                    match outcome {
                        Outcome::ElementGone => return Ok(false),
                        Outcome::AttributeDone => return Ok(true),
                        Outcome::Continue => {}
                    }
                }
            }

            let mut output = Vec::new();
            for token in tokens {
                if values.matches(&token) {
                    output.push(token);
                    continue;
                }
                let outcome = recover::set_entry_violation(
                    element,
                    name,
                    default_value.as_deref(),
                    handling,
                    || Error::SetEntryNotAllowed {
                        tag: tag.to_owned(),
                        attribute: name.to_owned(),
                        token: token.clone(),
                    },
                )?;
                match outcome {
                    Outcome::ElementGone => return Ok(false),
                    Outcome::AttributeDone => return Ok(true),
                    Outcome::Continue => {}
                }
            }
            dom::set_attribute(element, name, &output.join(delimiter));
            Ok(true)
        }
        AttrRule::Record {
            entry_separator,
            key_value_separator,
            max_entries,
            values,
            default_value,
            ..
        } => {
            let mut pairs = tokenize::parse_record(&value, entry_separator, key_value_separator);
            if let Some(limit) = *max_entries {
                if pairs.len() > limit {
                    let count = pairs.len();
                    let outcome = recover::oversized_collection(
                        element,
                        name,
                        default_value.as_deref(),
                        handling,
                        &mut pairs,
                        limit,
                        || Error::TooManyEntries {
                            tag: tag.to_owned(),
                            attribute: name.to_owned(),
                            count,
                            limit,
                        },
                    )?;
                    match outcome {
                        Outcome::ElementGone => return Ok(false),
                        Outcome::AttributeDone => return Ok(true),
                        Outcome::Continue => {}
                    }
                }
            }

            let mut seen: HashSet<String> = HashSet::new();
            let mut output: Vec<(String, String)> = Vec::new();
            for (key, pair_value) in pairs {
                if seen.contains(&key) {
                    let outcome = recover::duplicate_key(
                        element,
                        name,
                        default_value.as_deref(),
                        handling,
                        &key,
                        &mut output,
                        || Error::DuplicateKey {
                            tag: tag.to_owned(),
                            attribute: name.to_owned(),
                            key: key.clone(),
                        },
                    )?;
                    match outcome {
                        DuplicateOutcome::ElementGone => return Ok(false),
                        DuplicateOutcome::AttributeDone => return Ok(true),
                        DuplicateOutcome::SkipCurrent => continue,
                        DuplicateOutcome::KeepCurrent => {}
                    }
                }

                let allowed = values
                    .get(&key)
                    .map(|matcher| matcher.matches(&pair_value))
                    .unwrap_or(false);
                if !allowed {
                    let outcome = recover::pair_violation(
                        element,
                        name,
                        default_value.as_deref(),
                        handling,
                        || Error::PairNotAllowed {
                            tag: tag.to_owned(),
                            attribute: name.to_owned(),
                            key: key.clone(),
                            value: pair_value.clone(),
                        },
                    )?;
                    match outcome {
                        Outcome::ElementGone => return Ok(false),
                        Outcome::AttributeDone => return Ok(true),
                        Outcome::Continue => continue,
                    }
                }

                seen.insert(key.clone());
                output.push((key, pair_value));
            }

            let joined = output
                .iter()
                .map(|(key, pair_value)| format!("{key}{key_value_separator}{pair_value}"))
                .collect::<Vec<_>>()
                .join(entry_separator);
            dom::set_attribute(element, name, &joined);
            Ok(true)
        }
    }
}
