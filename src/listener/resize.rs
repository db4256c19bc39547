//! Resize handles: pointer drag translated into incremental resize deltas.
//!
//! Pointer-down is matched against registered handles. Once a drag starts,
//! move and up are taken from the document-level stream so the drag keeps
//! tracking after the pointer leaves the handle.

use crate::dom::{Document, ElementId};
use crate::event::{Category, Notification, Outbox, Payload};
use crate::geometry::{Orientation, Point};
use crate::registry::Registry;

/// Body cursor shown while dragging along `orientation`.
fn drag_cursor(orientation: Orientation) -> &'static str {
    match orientation {
        Orientation::Horizontal => "col-resize",
        Orientation::Vertical => "row-resize",
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ActiveDrag {
    element_id: String,
    orientation: Orientation,
    last: f64,
}

/// Resize drag state machine over every registered handle.
#[derive(Debug, Default)]
pub struct ResizeController {
    handles: Registry<Orientation>,
    active: Option<ActiveDrag>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a resize handle.
    pub fn register(&mut self, element_id: &str, orientation: Orientation) {
        let was_attached = self.is_attached();
        self.handles.insert(element_id, orientation);
        if !was_attached {
            tracing::debug!("resize listeners attached");
        }
    }

    /// Remove a handle. A drag in progress on it is cancelled without a
    /// resize-end and the body styles are restored.
    pub fn unregister(&mut self, doc: &mut Document, element_id: &str) -> bool {
        let existed = self.handles.remove(element_id).is_some();
        if self
            .active
            .as_ref()
            .is_some_and(|drag| drag.element_id == element_id)
        {
            self.active = None;
            restore_body(doc);
        }
        if existed && self.handles.is_empty() {
            tracing::debug!("resize listeners detached");
        }
        existed
    }

    /// The global listeners are live iff any handle is registered.
    pub fn is_attached(&self) -> bool {
        !self.handles.is_empty()
    }

    pub fn is_registered(&self, element_id: &str) -> bool {
        self.handles.contains(element_id)
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Start a drag if `target` lies within a registered handle.
    ///
    /// Returns whether a drag started.
    pub fn pointer_down(&mut self, doc: &mut Document, target: ElementId, point: Point) -> bool {
        if self.active.is_some() {
            return false;
        }
        let Some((element_id, orientation)) = self
            .handles
            .iter()
            .find(|(id, _)| doc.contains_by_id(id, target))
            .map(|(id, &orientation)| (id.to_owned(), orientation))
        else {
            return false;
        };
        doc.set_body_style("cursor", drag_cursor(orientation));
        doc.set_body_style("user-select", "none");
        tracing::trace!(element_id = %element_id, "resize drag started");
        self.active = Some(ActiveDrag {
            element_id,
            orientation,
            last: point.along(orientation),
        });
        true
    }

    /// Report the movement since the previous position. Zero movement is not
    /// reported.
    pub fn pointer_move(&mut self, point: Point, outbox: &mut Outbox) {
        let Some(drag) = self.active.as_mut() else {
            return;
        };
        let position = point.along(drag.orientation);
        let delta = position - drag.last;
        drag.last = position;
        if delta != 0.0 {
            outbox.push(Notification::new(
                Category::ResizeHandle,
                drag.element_id.clone(),
                Payload::Resize { delta },
            ));
        }
    }

    /// Finish the drag, restoring body styles and reporting resize-end once.
    pub fn pointer_up(&mut self, doc: &mut Document, outbox: &mut Outbox) {
        let Some(drag) = self.active.take() else {
            return;
        };
        restore_body(doc);
        tracing::trace!(element_id = %drag.element_id, "resize drag ended");
        outbox.push(Notification::new(
            Category::ResizeHandle,
            drag.element_id,
            Payload::ResizeEnd,
        ));
    }
}

fn restore_body(doc: &mut Document) {
    doc.remove_body_style("cursor");
    doc.remove_body_style("user-select");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::ElementData;
    use pretty_assertions::assert_eq;

    fn doc_with_handle() -> (Document, ElementId, ElementId) {
        let mut doc = Document::default();
        let body = doc.insert(ElementData::new().with_id("body"));
        let handle = doc.insert_child(body, ElementData::new().with_id("splitter"));
        (doc, body, handle)
    }

    fn payloads(outbox: &mut Outbox) -> Vec<Payload> {
        outbox.drain().into_iter().map(|n| n.payload).collect()
    }

    #[test]
    fn deltas_are_incremental() {
        let (mut doc, _, handle) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Horizontal);
        let mut outbox = Outbox::new();

        assert!(resize.pointer_down(&mut doc, handle, Point::new(100.0, 0.0)));
        for x in [100.0, 108.0, 103.0] {
            resize.pointer_move(Point::new(x, 40.0), &mut outbox);
        }
        resize.pointer_up(&mut doc, &mut outbox);

        assert_eq!(
            payloads(&mut outbox),
            vec![
                Payload::Resize { delta: 8.0 },
                Payload::Resize { delta: -5.0 },
                Payload::ResizeEnd,
            ]
        );
    }

    #[test]
    fn vertical_handle_tracks_y() {
        let (mut doc, _, handle) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Vertical);
        let mut outbox = Outbox::new();

        resize.pointer_down(&mut doc, handle, Point::new(0.0, 50.0));
        assert_eq!(doc.body_style("cursor"), Some("row-resize"));
        resize.pointer_move(Point::new(999.0, 70.0), &mut outbox);
        assert_eq!(payloads(&mut outbox), vec![Payload::Resize { delta: 20.0 }]);
    }

    #[test]
    fn body_styles_set_and_restored() {
        let (mut doc, _, handle) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Horizontal);
        let mut outbox = Outbox::new();

        resize.pointer_down(&mut doc, handle, Point::new(0.0, 0.0));
        assert!(resize.is_dragging());
        assert_eq!(doc.body_style("cursor"), Some("col-resize"));
        assert_eq!(doc.body_style("user-select"), Some("none"));

        resize.pointer_up(&mut doc, &mut outbox);
        assert!(!resize.is_dragging());
        assert_eq!(doc.body_style("cursor"), None);
        assert_eq!(doc.body_style("user-select"), None);
    }

    #[test]
    fn resize_end_fires_once_per_drag() {
        let (mut doc, _, handle) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Horizontal);
        let mut outbox = Outbox::new();

        resize.pointer_down(&mut doc, handle, Point::new(0.0, 0.0));
        resize.pointer_up(&mut doc, &mut outbox);
        resize.pointer_up(&mut doc, &mut outbox);
        assert_eq!(payloads(&mut outbox), vec![Payload::ResizeEnd]);
    }

    #[test]
    fn pointer_down_outside_handle_does_not_start() {
        let (mut doc, body, _) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Horizontal);
        let mut outbox = Outbox::new();

        assert!(!resize.pointer_down(&mut doc, body, Point::new(0.0, 0.0)));
        resize.pointer_move(Point::new(50.0, 0.0), &mut outbox);
        assert!(outbox.is_empty());
        assert_eq!(doc.body_style("cursor"), None);
    }

    #[test]
    fn attached_iff_handles_registered() {
        let mut doc = Document::default();
        let mut resize = ResizeController::new();
        assert!(!resize.is_attached());
        resize.register("a", Orientation::Horizontal);
        resize.register("b", Orientation::Vertical);
        assert!(resize.is_attached());
        assert!(resize.unregister(&mut doc, "a"));
        assert!(resize.is_attached());
        assert!(resize.unregister(&mut doc, "b"));
        assert!(!resize.is_attached());
        assert!(!resize.unregister(&mut doc, "b"));
    }

    #[test]
    fn unregister_mid_drag_cancels() {
        let (mut doc, _, handle) = doc_with_handle();
        let mut resize = ResizeController::new();
        resize.register("splitter", Orientation::Horizontal);
        let mut outbox = Outbox::new();

        resize.pointer_down(&mut doc, handle, Point::new(0.0, 0.0));
        resize.unregister(&mut doc, "splitter");
        assert!(!resize.is_dragging());
        assert_eq!(doc.body_style("cursor"), None);
        resize.pointer_move(Point::new(30.0, 0.0), &mut outbox);
        resize.pointer_up(&mut doc, &mut outbox);
        assert!(outbox.is_empty());
    }
}
