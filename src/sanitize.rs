//! Top-level driver: parse the fragment, police it, serialize what's left.

use log::debug;

use crate::dom;
use crate::error::{Error, Result};
use crate::policy::Policy;
use crate::recover;
use crate::walk::{self, WalkState};

/// Sanitize an untrusted HTML fragment under `policy`.
///
/// The fragment is parsed, rewritten in place, and re-serialized. Empty
/// input yields empty output. An error is returned only when a violation
/// class is configured (or defaults) to throw; the partially rewritten tree
/// is discarded with it.
///
/// ```
/// use scour::policy::{Policy, TagRule};
/// use scour::recover::TagStrategy;
///
/// let mut policy = Policy::default();
/// policy.tags.insert("b".to_string(), TagRule::default());
/// policy.error_handling.tag = Some(TagStrategy::DiscardElement);
///
/// let clean = scour::sanitize("<b>fine</b><script>not fine</script>", &policy)?;
/// assert_eq!(clean, "<b>fine</b>");
/// # Ok::<(), scour::Error>(())
/// ```
pub fn sanitize(html: &str, policy: &Policy) -> Result<String> {
    if html.is_empty() {
        return Ok(String::new());
    }

    let dom = dom::parse_fragment(html);
    let root = match dom::fragment_root(&dom) {
        Some(root) => root,
        None => return Ok(String::new()),
    };

    if let Some(limit) = policy.top_level_limits.children {
        let count = dom::child_count(&root);
        if count > limit {
            debug!("fragment has {count} top-level nodes, limit is {limit}");
            let kept = recover::children_violation(&root, &policy.error_handling, limit, || {
                Error::TooManyChildren {
                    tag: "#fragment".to_owned(),
                    count,
                    limit,
                }
            })?;
            if !kept {
                return Ok(String::new());
            }
        }
    }

    let state = WalkState::new();
    for child in dom::child_snapshot(&root) {
        walk::walk_node(&child, policy, &state)?;
    }

    dom::serialize_children(&root)
}
