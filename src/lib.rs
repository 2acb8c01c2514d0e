//! Policy-driven HTML sanitizer.
//!
//! An untrusted HTML fragment is parsed (html5ever, rcdom), rewritten in
//! place under a declarative [`policy::Policy`], and re-serialized. The
//! policy names the permitted tags, the attributes each tag may carry, the
//! shape and values of those attributes, and structural limits on child
//! count and nesting depth. Every violation class picks a
//! [`recover`] strategy, from silently dropping the offending piece to
//! failing the run.
//!
//! ```
//! use scour::policy::{Policy, TagRule};
//! use scour::recover::TagStrategy;
//!
//! let mut policy = Policy::default();
//! policy.tags.insert("b".to_string(), TagRule::default());
//! policy.error_handling.tag = Some(TagStrategy::DiscardElement);
//!
//! let clean = scour::sanitize("<b>fine</b><script>not fine</script>", &policy)?;
//! assert_eq!(clean, "<b>fine</b>");
//! # Ok::<(), scour::Error>(())
//! ```

mod attrs;
mod dom;
mod error;
mod tokenize;
mod walk;

#[cfg(feature = "json")]
pub mod json;
pub mod matcher;
pub mod policy;
pub mod recover;
pub mod sanitize;
#[cfg(feature = "url")]
pub mod url;

pub use crate::error::{Error, Result};
pub use crate::sanitize::sanitize;
