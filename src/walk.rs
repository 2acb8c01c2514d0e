//! Recursive descent over the parsed tree, applying tag admission,
//! attribute rules, and structural limits in a fixed order.

use log::debug;
use markup5ever_rcdom::{Handle, NodeData};

use crate::attrs;
use crate::dom;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::recover;

/// Traversal state for one path from the fragment root down. Copied, not
/// shared, between siblings.
#[derive(Clone, Debug)]
pub(crate) struct WalkState {
    /// Depth of the nearest ancestor element from the fragment root.
    pub(crate) root_nesting: usize,
    /// Ancestor frames, outermost first.
    pub(crate) tag_nesting: Vec<TagFrame>,
}

/// One ancestor element on the current path. `depth` counts how far below
/// that ancestor the element being examined sits; it is bumped once per
/// element walked beneath it.
#[derive(Clone, Debug)]
pub(crate) struct TagFrame {
    pub(crate) name: String,
    pub(crate) depth: usize,
}

impl WalkState {
    pub(crate) fn new() -> Self {
        WalkState {
            root_nesting: 0,
            tag_nesting: Vec::new(),
        }
    }
}

pub(crate) fn walk_node(node: &Handle, policy: &Policy, state: &WalkState) -> Result<()> {
    match &node.data {
        NodeData::Element { .. } => {
            if let Some(limit) = policy.top_level_limits.nesting {
                if state.root_nesting > limit {
                    let tag = dom::element_name(node).unwrap_or_default();
                    debug!("<{tag}> exceeds the top-level nesting limit of {limit}");
                    recover::nesting_violation(node, &policy.error_handling, || {
                        Error::NestingTooDeep { tag, limit }
                    })?;
                    return Ok(());
                }
            }
            let state = WalkState {
                root_nesting: state.root_nesting + 1,
                tag_nesting: state.tag_nesting.clone(),
            };
            walk_element(node, policy, state)
        }
        NodeData::Comment { .. } => {
            if !policy.preserve_comments {
                dom::detach(node);
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Fixed detection order: tag admission, attributes, child count, ancestor
/// nesting, then recursion into the surviving children.
fn walk_element(element: &Handle, policy: &Policy, mut state: WalkState) -> Result<()> {
    let tag = match dom::element_name(element) {
        Some(tag) => tag,
        None => return Ok(()),
    };

    let rule = match policy.tags.get(&tag) {
        Some(rule) => rule,
        None => {
            debug!("rejecting <{tag}>");
            recover::tag_violation(element, &policy.error_handling, || Error::TagNotAllowed {
                tag: tag.clone(),
            })?;
            return Ok(());
        }
    };

    if !attrs::sanitize_attributes(element, &tag, &rule.attributes, &policy.error_handling)? {
        return Ok(());
    }

    if let Some(limit) = rule.limits.children {
        let count = dom::child_count(element);
        if count > limit {
            debug!("<{tag}> has {count} children, limit is {limit}");
            let kept =
                recover::children_violation(element, &policy.error_handling, limit, || {
                    Error::TooManyChildren {
                        tag: tag.clone(),
                        count,
                        limit,
                    }
                })?;
            if !kept {
                return Ok(());
            }
        }
    }

    // Bump every ancestor frame once for this element, innermost first, and
    // test each ancestor's nesting limit as soon as its counter moves. The
    // first ancestor whose limit trips is the one reported.
    for frame in state.tag_nesting.iter_mut().rev() {
        frame.depth += 1;
        let ancestor_rule = match policy.tags.get(&frame.name) {
            Some(rule) => rule,
            None => continue,
        };
        let limit = match ancestor_rule.limits.nesting {
            Some(limit) => limit,
            None => continue,
        };
        if frame.depth > limit {
            debug!("<{tag}> is nested too deeply inside <{}>", frame.name);
            recover::nesting_violation(element, &policy.error_handling, || {
                Error::TagNestingTooDeep {
                    tag: tag.clone(),
                    ancestor: frame.name.clone(),
                }
            })?;
            return Ok(());
        }
    }

    state.tag_nesting.push(TagFrame {
        name: tag,
        depth: 0,
    });
    for child in dom::child_snapshot(element) {
        walk_node(&child, policy, &state)?;
    }
    Ok(())
}
