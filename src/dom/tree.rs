//! The headless document: element arena, containment, styles, fixed layout.

use std::collections::{BTreeMap, HashMap, VecDeque};

use slotmap::{SecondaryMap, SlotMap};

use super::node::{ElementData, ElementId, ScrollBehavior};
use crate::geometry::{Orientation, Rect, Size};

/// Empty slice constant for returning when an element has no children.
const EMPTY_CHILDREN: &[ElementId] = &[];

/// The document the interop layer observes, backed by a slotmap arena.
///
/// Elements live in a single `SlotMap`; parent/child links sit in secondary
/// maps. String ids are indexed so widgets can address elements the way they
/// would with `getElementById`. When two elements share an id the most
/// recently inserted one wins.
#[derive(Debug)]
pub struct Document {
    nodes: SlotMap<ElementId, ElementData>,
    children: SecondaryMap<ElementId, Vec<ElementId>>,
    parent: SecondaryMap<ElementId, ElementId>,
    by_id: HashMap<String, ElementId>,
    viewport: Size,
    body_styles: BTreeMap<String, String>,
}

impl Document {
    /// Create an empty document with the given viewport size.
    pub fn new(viewport: Size) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            by_id: HashMap::new(),
            viewport,
            body_styles: BTreeMap::new(),
        }
    }

    // ── Tree ─────────────────────────────────────────────────────────

    /// Insert a parentless element.
    pub fn insert(&mut self, data: ElementData) -> ElementId {
        self.alloc(data)
    }

    /// Insert an element as the last child of `parent`, which must exist.
    pub fn insert_child(&mut self, parent: ElementId, data: ElementData) -> ElementId {
        debug_assert!(self.nodes.contains_key(parent), "parent element does not exist");
        let id = self.alloc(data);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
            self.parent.insert(id, parent);
        }
        id
    }

    fn alloc(&mut self, data: ElementData) -> ElementId {
        let dom_id = data.id.clone();
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if let Some(dom_id) = dom_id {
            self.by_id.insert(dom_id, id);
        }
        id
    }

    /// Remove an element and all its descendants.
    ///
    /// Returns the removed element's data, or `None` if it didn't exist.
    pub fn remove(&mut self, id: ElementId) -> Option<ElementData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        if let Some(parent_id) = self.parent.remove(id) {
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            if let Some(data) = self.nodes.remove(current) {
                if let Some(dom_id) = &data.id {
                    if self.by_id.get(dom_id) == Some(&current) {
                        self.by_id.remove(dom_id);
                    }
                }
                if current == id {
                    removed = Some(data);
                }
            }
        }

        removed
    }

    /// The parent of an element, if it has one.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.parent.get(id).copied()
    }

    /// Children of an element, empty if it has none or does not exist.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// `Node.contains` semantics: true if `node` is `container` or one of
    /// its descendants.
    pub fn contains(&self, container: ElementId, node: ElementId) -> bool {
        if !self.nodes.contains_key(container) || !self.nodes.contains_key(node) {
            return false;
        }
        let mut current = Some(node);
        while let Some(c) = current {
            if c == container {
                return true;
            }
            current = self.parent.get(c).copied();
        }
        false
    }

    /// Like [`contains`](Self::contains), addressing the container by its
    /// string id. A missing container contains nothing.
    pub fn contains_by_id(&self, container: &str, node: ElementId) -> bool {
        self.find(container)
            .is_some_and(|container| self.contains(container, node))
    }

    // ── Lookup ───────────────────────────────────────────────────────

    /// Resolve a string id to an element handle.
    pub fn find(&self, dom_id: &str) -> Option<ElementId> {
        self.by_id.get(dom_id).copied()
    }

    /// Immutable access to an element's data.
    pub fn get(&self, id: ElementId) -> Option<&ElementData> {
        self.nodes.get(id)
    }

    /// Mutable access to an element's data.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id)
    }

    /// Element data addressed by string id.
    pub fn element(&self, dom_id: &str) -> Option<&ElementData> {
        self.find(dom_id).and_then(|id| self.nodes.get(id))
    }

    /// Mutable element data addressed by string id.
    pub fn element_mut(&mut self, dom_id: &str) -> Option<&mut ElementData> {
        let id = self.find(dom_id)?;
        self.nodes.get_mut(id)
    }

    /// Snapshot of an element's bounding box.
    pub fn rect(&self, dom_id: &str) -> Option<Rect> {
        self.element(dom_id).map(|data| data.rect)
    }

    /// Update an element's bounding box, as the host does after layout.
    pub fn set_rect(&mut self, id: ElementId, rect: Rect) {
        if let Some(data) = self.nodes.get_mut(id) {
            data.rect = rect;
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Viewport & body ──────────────────────────────────────────────

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Read a style property on the document body.
    pub fn body_style(&self, name: &str) -> Option<&str> {
        self.body_styles.get(name).map(String::as_str)
    }

    /// Set a style property on the document body.
    pub fn set_body_style(&mut self, name: &str, value: impl Into<String>) {
        self.body_styles.insert(name.to_owned(), value.into());
    }

    /// Clear a style property on the document body.
    pub fn remove_body_style(&mut self, name: &str) {
        self.body_styles.remove(name);
    }

    // ── Scrolling ────────────────────────────────────────────────────

    /// Scroll `id` to `position` along `orientation`, clamped to its extent.
    ///
    /// Returns `false` if the element does not exist.
    pub fn scroll_to(
        &mut self,
        id: ElementId,
        orientation: Orientation,
        position: f64,
        behavior: ScrollBehavior,
    ) -> bool {
        match self.nodes.get_mut(id) {
            Some(data) => {
                data.scroll.set_position(orientation, position);
                data.scroll.last_behavior = Some(behavior);
                true
            }
            None => false,
        }
    }

    // ── Layout ───────────────────────────────────────────────────────

    /// Resolve the rect of every element carrying a fixed [`Placement`].
    ///
    /// The element's current height and (absent an explicit width) current
    /// width are its intrinsic size. This is the headless stand-in for the
    /// host's layout pass between placement and the next frame.
    pub fn layout_fixed(&mut self) {
        let viewport_width = self.viewport.width;
        for (_, data) in self.nodes.iter_mut() {
            let Some(placement) = data.placement else {
                continue;
            };
            let width = placement.width.unwrap_or(data.rect.width);
            let x = match (placement.left, placement.right) {
                (Some(left), _) => left,
                (None, Some(right)) => viewport_width - right - width,
                (None, None) => data.rect.x,
            };
            data.rect = Rect::new(
                x + width * placement.translate_x_percent / 100.0,
                placement.top,
                width,
                data.rect.height,
            );
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(Size::new(1024.0, 768.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::{Placement, ScrollState};

    /// Build a small test document:
    /// ```text
    ///       body
    ///      /    \
    ///   menu    button
    ///   /  \
    ///  a    b
    /// ```
    fn build_doc() -> (Document, ElementId, ElementId, ElementId, ElementId, ElementId) {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let body = doc.insert(ElementData::new().with_id("body"));
        let menu = doc.insert_child(body, ElementData::new().with_id("menu"));
        let button = doc.insert_child(body, ElementData::new().with_id("button"));
        let a = doc.insert_child(menu, ElementData::new().with_id("a"));
        let b = doc.insert_child(menu, ElementData::new());
        (doc, body, menu, button, a, b)
    }

    #[test]
    fn insert_builds_tree() {
        let (doc, body, menu, button, ..) = build_doc();
        assert_eq!(doc.len(), 5);
        assert_eq!(doc.parent(menu), Some(body));
        assert_eq!(doc.children(body), &[menu, button]);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "parent element does not exist")]
    fn insert_child_requires_live_parent() {
        let (mut doc, _, menu, ..) = build_doc();
        doc.remove(menu);
        doc.insert_child(menu, ElementData::new().with_id("orphan"));
    }

    #[test]
    fn find_by_string_id() {
        let (doc, _, menu, button, a, _) = build_doc();
        assert_eq!(doc.find("menu"), Some(menu));
        assert_eq!(doc.find("button"), Some(button));
        assert_eq!(doc.find("a"), Some(a));
        assert_eq!(doc.find("nope"), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let (doc, body, menu, button, a, b) = build_doc();
        assert!(doc.contains(menu, menu));
        assert!(doc.contains(menu, a));
        assert!(doc.contains(menu, b));
        assert!(doc.contains(body, a));
        assert!(!doc.contains(menu, button));
        assert!(!doc.contains(a, menu));
    }

    #[test]
    fn contains_by_id_missing_container_is_false() {
        let (doc, _, _, _, a, _) = build_doc();
        assert!(doc.contains_by_id("menu", a));
        assert!(!doc.contains_by_id("ghost", a));
    }

    #[test]
    fn remove_subtree_clears_ids() {
        let (mut doc, body, menu, button, a, b) = build_doc();
        let removed = doc.remove(menu).unwrap();
        assert_eq!(removed.id.as_deref(), Some("menu"));
        assert!(doc.find("menu").is_none());
        assert!(doc.find("a").is_none());
        assert!(doc.get(a).is_none());
        assert!(doc.get(b).is_none());
        assert_eq!(doc.children(body), &[button]);
        assert!(!doc.contains(menu, a));
    }

    #[test]
    fn remove_stale_is_none() {
        let (mut doc, _, menu, ..) = build_doc();
        doc.remove(menu);
        assert!(doc.remove(menu).is_none());
    }

    #[test]
    fn duplicate_id_latest_wins() {
        let mut doc = Document::default();
        let first = doc.insert(ElementData::new().with_id("dup"));
        let second = doc.insert(ElementData::new().with_id("dup"));
        assert_eq!(doc.find("dup"), Some(second));
        // Removing the shadowed element keeps the live mapping.
        doc.remove(first);
        assert_eq!(doc.find("dup"), Some(second));
    }


    #[test]
    fn rect_snapshot() {
        let (mut doc, _, menu, ..) = build_doc();
        doc.set_rect(menu, Rect::new(5.0, 6.0, 7.0, 8.0));
        assert_eq!(doc.rect("menu"), Some(Rect::new(5.0, 6.0, 7.0, 8.0)));
        assert_eq!(doc.rect("ghost"), None);
    }

    #[test]
    fn body_styles() {
        let mut doc = Document::default();
        doc.set_body_style("cursor", "col-resize");
        assert_eq!(doc.body_style("cursor"), Some("col-resize"));
        doc.remove_body_style("cursor");
        assert_eq!(doc.body_style("cursor"), None);
    }

    #[test]
    fn scroll_to_clamps_and_records_behavior() {
        let mut doc = Document::default();
        let track = doc.insert(ElementData::new().with_scroll(ScrollState {
            scroll_width: 1000.0,
            client_width: 250.0,
            ..Default::default()
        }));
        assert!(doc.scroll_to(track, Orientation::Horizontal, 2000.0, ScrollBehavior::Smooth));
        let scroll = doc.get(track).unwrap().scroll;
        assert_eq!(scroll.left, 750.0);
        assert_eq!(scroll.last_behavior, Some(ScrollBehavior::Smooth));

        doc.remove(track);
        assert!(!doc.scroll_to(track, Orientation::Horizontal, 0.0, ScrollBehavior::Auto));
    }

    #[test]
    fn layout_fixed_resolves_anchors() {
        let mut doc = Document::new(Size::new(800.0, 600.0));
        let left = doc.insert(ElementData::new().with_rect(Rect::new(0.0, 0.0, 100.0, 40.0)));
        let centered = doc.insert(ElementData::new().with_rect(Rect::new(0.0, 0.0, 100.0, 40.0)));
        let right = doc.insert(ElementData::new().with_rect(Rect::new(0.0, 0.0, 100.0, 40.0)));

        doc.get_mut(left).unwrap().placement = Some(Placement {
            top: 50.0,
            left: Some(20.0),
            width: Some(150.0),
            ..Default::default()
        });
        doc.get_mut(centered).unwrap().placement = Some(Placement {
            top: 50.0,
            left: Some(400.0),
            translate_x_percent: -50.0,
            ..Default::default()
        });
        doc.get_mut(right).unwrap().placement = Some(Placement {
            top: 50.0,
            right: Some(30.0),
            ..Default::default()
        });
        doc.layout_fixed();

        assert_eq!(doc.get(left).unwrap().rect, Rect::new(20.0, 50.0, 150.0, 40.0));
        assert_eq!(doc.get(centered).unwrap().rect, Rect::new(350.0, 50.0, 100.0, 40.0));
        assert_eq!(doc.get(right).unwrap().rect, Rect::new(670.0, 50.0, 100.0, 40.0));
    }
}
