//! Glue over the external tree model: fragment parsing and serialization,
//! the mutation primitives the rewriting engine needs, and attribute access
//! on rcdom element nodes. Attribute insertion order is the order of the
//! underlying attribute list and survives every operation here.

use std::rc::Rc;

use html5ever::driver::{self, ParseOpts};
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, Attribute, LocalName, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

use crate::error::{Error, Result};

/// Parse an untrusted fragment in a `body` context. The resulting document
/// has a single container element holding the fragment's top-level nodes.
pub(crate) fn parse_fragment(html: &str) -> RcDom {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    driver::parse_fragment(
        RcDom::default(),
        opts,
        QualName::new(None, ns!(html), local_name!("body")),
        vec![],
    )
    .one(StrTendril::from(html))
}

/// The container element holding the parsed fragment's top-level nodes.
pub(crate) fn fragment_root(dom: &RcDom) -> Option<Handle> {
    dom.document.children.borrow().first().cloned()
}

pub(crate) fn serialize_children(root: &Handle) -> Result<String> {
    let mut buf = Vec::new();
    let handle: SerializableHandle = root.clone().into();
    serialize(&mut buf, &handle, SerializeOpts::default())?;
    String::from_utf8(buf).map_err(|source| Error::from(source.utf8_error()))
}

pub(crate) fn element_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

pub(crate) fn parent_of(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Children captured before any mutation, so in-place detaches during
/// iteration cannot skip or repeat siblings.
pub(crate) fn child_snapshot(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub(crate) fn child_count(node: &Handle) -> usize {
    node.children.borrow().len()
}

pub(crate) fn detach(node: &Handle) {
    if let Some(parent) = parent_of(node) {
        let mut children = parent.children.borrow_mut();
        if let Some(index) = children.iter().position(|child| Rc::ptr_eq(child, node)) {
            children.remove(index);
        }
    }
    node.parent.set(None);
}

/// Replace an element with its children, in order, at its own position.
/// A node without a parent or without children degrades to a plain detach.
pub(crate) fn unwrap(node: &Handle) {
    if parent_of(node).is_none() {
        node.parent.set(None);
        return;
    }
    let grandchildren: Vec<Handle> = node.children.borrow_mut().drain(..).collect();
    if grandchildren.is_empty() {
        detach(node);
        return;
    }
    if let Some(parent) = parent_of(node) {
        {
            let mut siblings = parent.children.borrow_mut();
            let index = siblings
                .iter()
                .position(|child| Rc::ptr_eq(child, node))
                .unwrap_or(siblings.len());
            siblings.splice(index..index, grandchildren.iter().cloned());
        }
        for child in &grandchildren {
            child.parent.set(Some(Rc::downgrade(&parent)));
        }
    }
    detach(node);
}

pub(crate) fn attribute_names(node: &Handle) -> Vec<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .map(|attr| attr.name.local.as_ref().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

pub(crate) fn get_attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Overwrite in place when the attribute exists (keeping its position),
/// append otherwise.
pub(crate) fn set_attribute(node: &Handle, name: &str, value: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        let mut attrs = attrs.borrow_mut();
        if let Some(existing) = attrs.iter_mut().find(|attr| &*attr.name.local == name) {
            existing.value = StrTendril::from(value);
            return;
        }
        attrs.push(Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: StrTendril::from(value),
        });
    }
}

pub(crate) fn remove_attribute(node: &Handle, name: &str) {
    if let NodeData::Element { attrs, .. } = &node.data {
        attrs.borrow_mut().retain(|attr| &*attr.name.local != name);
    }
}
