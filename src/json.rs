//! JSON wire form for policies.

use crate::error::Result;
use crate::policy::Policy;
use crate::sanitize::sanitize;

/// Parse a policy from its JSON wire form. Keys are camelCase, attribute
/// rules are tagged by `mode`, and matchers are written as `"*"`, strings,
/// string lists, booleans, or `{"regex": "..."}`.
pub fn policy_from_json(text: &str) -> Result<Policy> {
    Ok(serde_json::from_str(text)?)
}

/// Sanitize `html` under a policy supplied as JSON.
pub fn sanitize_json(html: &str, policy: &str) -> Result<String> {
    let policy = policy_from_json(policy)?;
    sanitize(html, &policy)
}
