//! Headless page document: an arena of elements built from server-rendered markup.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// Serialized form of an element subtree, as stored in page snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Markup>,
}

impl Markup {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class.push(class.into());
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub data: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    pending: bool,
}

impl Element {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// `tag.class` match; an empty tag matches any element.
    pub fn matches(&self, tag: &str, class: &str) -> bool {
        (tag.is_empty() || self.tag.eq_ignore_ascii_case(tag)) && self.has_class(class)
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Set while a toggle request for this control is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

/// Slots of detached subtrees go on the free list and are handed out again by the
/// next insertion, so a stale `NodeId` of a removed element may later name another.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    free: Vec<NodeId>,
    root: NodeId,
}

impl Document {
    pub fn new(markup: Markup) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            free: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.insert(markup, None);
        doc
    }

    fn insert(&mut self, markup: Markup, parent: Option<NodeId>) -> NodeId {
        let element = Element {
            tag: markup.tag,
            id: markup.id,
            classes: markup.class,
            data: markup.data,
            attrs: markup.attrs,
            text: markup.text,
            parent,
            children: Vec::new(),
            pending: false,
        };
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot.0] = element;
                slot
            }
            None => {
                self.nodes.push(element);
                NodeId(self.nodes.len() - 1)
            }
        };
        for child in markup.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// Number of slots in the arena, attached or free.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0)
    }

    /// Pre-order walk of `scope` and everything attached below it.
    pub fn subtree(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![scope];
        while let Some(id) = stack.pop() {
            let Some(element) = self.get(id) else {
                continue;
            };
            out.push(id);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }

    /// `id` followed by its ancestors up to the root.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| {
            self.get(*current).and_then(|element| element.parent)
        })
    }

    pub fn find_all(&self, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.find_all_in(self.root, pred)
    }

    pub fn find_all_in(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.subtree(scope)
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(&pred))
            .collect()
    }

    pub fn find_in(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.subtree(scope)
            .into_iter()
            .find(|id| self.get(*id).is_some_and(&pred))
    }

    /// Elements matching `tag.class` whose data attribute `key` equals `value`.
    /// The value is compared as-is and never parsed as a selector.
    pub fn find_by_data(&self, tag: &str, class: &str, key: &str, value: &str) -> Vec<NodeId> {
        self.find_all(|e| e.matches(tag, class) && e.data(key) == Some(value))
    }

    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.data(key))
    }

    pub fn set_data(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.data.insert(key.to_string(), value.into());
        }
    }

    pub fn attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id).and_then(|e| e.attr(key))
    }

    pub fn set_attr(&mut self, id: NodeId, key: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.attrs.insert(key.to_string(), value.into());
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|e| e.text.as_str())
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(element) = self.get_mut(id) {
            element.text = text.into();
        }
    }

    pub fn set_pending(&mut self, id: NodeId, pending: bool) {
        if let Some(element) = self.get_mut(id) {
            element.pending = pending;
        }
    }

    pub fn append_child(&mut self, parent: NodeId, markup: Markup) -> Option<NodeId> {
        self.get(parent)?;
        let child = self.insert(markup, Some(parent));
        self.nodes[parent.0].children.push(child);
        Some(child)
    }

    /// Detaches the direct children of `parent` that match `pred` and frees their
    /// subtrees; returns how many children were removed.
    pub fn remove_children(&mut self, parent: NodeId, pred: impl Fn(&Element) -> bool) -> usize {
        let Some(element) = self.get(parent) else {
            return 0;
        };
        let (removed, kept): (Vec<NodeId>, Vec<NodeId>) = element
            .children
            .iter()
            .partition(|child| self.get(**child).is_some_and(&pred));
        self.nodes[parent.0].children = kept;
        for child in &removed {
            let freed = self.subtree(*child);
            self.nodes[child.0].parent = None;
            self.free.extend(freed);
        }
        removed.len()
    }

    pub fn to_markup(&self) -> Markup {
        self.markup_of(self.root)
    }

    fn markup_of(&self, id: NodeId) -> Markup {
        let element = &self.nodes[id.0];
        Markup {
            tag: element.tag.clone(),
            id: element.id.clone(),
            class: element.classes.clone(),
            data: element.data.clone(),
            attrs: element.attrs.clone(),
            text: element.text.clone(),
            children: element.children.iter().map(|c| self.markup_of(*c)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> Markup {
        Markup::new("div")
            .child(Markup::new("a").class("subscription").data("name", name))
            .child(Markup::new("span").class("subscribed").data("name", name))
    }

    #[test]
    fn data_lookup_compares_values_literally() {
        let doc = Document::new(
            Markup::new("body")
                .child(profile("alice"))
                .child(profile("bob] , a[data-name=alice")),
        );

        let alice = doc.find_by_data("a", "subscription", "name", "alice");
        assert_eq!(alice.len(), 1);

        let odd = doc.find_by_data("a", "subscription", "name", "bob] , a[data-name=alice");
        assert_eq!(odd.len(), 1);
        assert_ne!(odd, alice);
    }

    #[test]
    fn removed_children_leave_the_tree() {
        let mut doc = Document::new(profile("alice"));
        let span = doc.find_all(|e| e.matches("span", "subscribed"))[0];
        doc.append_child(span, Markup::new("p").text("marker"));
        doc.append_child(span, Markup::new("b").text("keep"));

        assert_eq!(doc.remove_children(span, |e| e.tag == "p"), 1);
        assert!(doc.find_all(|e| e.tag == "p").is_empty());
        assert_eq!(doc.get(span).unwrap().children().len(), 1);
    }

    #[test]
    fn repeated_append_and_remove_reuses_slots() {
        let mut doc = Document::new(profile("alice"));
        let span = doc.find_all(|e| e.matches("span", "subscribed"))[0];

        doc.append_child(span, Markup::new("p").text("marker"));
        doc.remove_children(span, |e| e.tag == "p");
        let settled = doc.capacity();

        for _ in 0..50 {
            doc.append_child(span, Markup::new("p").child(Markup::new("b").text("marker")));
            doc.remove_children(span, |e| e.tag == "p");
        }
        assert!(doc.capacity() <= settled + 1);
        assert!(doc.get(span).unwrap().children().is_empty());
        assert_eq!(doc.to_markup(), profile("alice"));
    }

    #[test]
    fn markup_survives_a_trip_through_the_arena() {
        let markup = Markup::new("body").child(profile("alice"));
        assert_eq!(Document::new(markup.clone()).to_markup(), markup);
    }

    #[test]
    fn ancestors_start_at_the_node_itself() {
        let doc = Document::new(profile("alice"));
        let link = doc.find_all(|e| e.tag == "a")[0];
        let chain: Vec<NodeId> = doc.ancestors(link).collect();
        assert_eq!(chain, vec![link, doc.root()]);
    }
}
