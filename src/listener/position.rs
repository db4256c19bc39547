//! Floating-element positioning with single-pass overflow correction.
//!
//! [`FloatingPositioner::place`] anchors content below a reference element.
//! The correction runs on the next animation frame, once the host has laid
//! the content out and its real size is known. Vertical and horizontal
//! corrections are independent and run once each; nothing is re-checked
//! after a flip.

use crate::dom::{Document, Placement};

/// Horizontal alignment of floating content relative to its reference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingCorrection {
    content_id: String,
    reference_id: String,
}

/// Places floating content and corrects viewport overflow one frame later.
#[derive(Debug)]
pub struct FloatingPositioner {
    gap: f64,
    margin: f64,
    pending: Vec<PendingCorrection>,
}

impl FloatingPositioner {
    pub fn new(gap: f64, margin: f64) -> Self {
        Self {
            gap,
            margin,
            pending: Vec::new(),
        }
    }

    /// Place `content_id` below `reference_id` and schedule its correction.
    ///
    /// Returns `false`, leaving the document untouched, if either element
    /// is missing. Placing the same content again replaces its pending pass.
    pub fn place(
        &mut self,
        doc: &mut Document,
        content_id: &str,
        reference_id: &str,
        align: Align,
        match_width: bool,
    ) -> bool {
        let Some(reference) = doc.rect(reference_id) else {
            return false;
        };
        let viewport = doc.viewport();
        let Some(content) = doc.element_mut(content_id) else {
            return false;
        };

        let mut placement = Placement {
            top: reference.bottom() + self.gap,
            ..Placement::default()
        };
        match align {
            Align::Start => placement.left = Some(reference.left()),
            Align::Center => {
                placement.left = Some(reference.center_x());
                placement.translate_x_percent = -50.0;
            }
            Align::End => placement.right = Some(viewport.width - reference.right()),
        }
        if match_width {
            placement.width = Some(reference.width);
        }
        content.placement = Some(placement);

        self.pending.retain(|p| p.content_id != content_id);
        self.pending.push(PendingCorrection {
            content_id: content_id.to_owned(),
            reference_id: reference_id.to_owned(),
        });
        true
    }

    /// Whether any correction is waiting for the next frame.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Run every pending correction against freshly measured rects.
    pub fn on_frame(&mut self, doc: &mut Document) {
        if self.pending.is_empty() {
            return;
        }
        doc.layout_fixed();
        for pending in std::mem::take(&mut self.pending) {
            self.correct(doc, &pending);
        }
        doc.layout_fixed();
    }

    fn correct(&self, doc: &mut Document, pending: &PendingCorrection) {
        let Some(reference) = doc.rect(&pending.reference_id) else {
            return;
        };
        let viewport = doc.viewport();
        let Some(content) = doc.element_mut(&pending.content_id) else {
            return;
        };
        let measured = content.rect;
        let Some(placement) = content.placement.as_mut() else {
            return;
        };

        if measured.bottom() > viewport.height {
            placement.top = reference.top() - measured.height - self.gap;
            tracing::trace!(content_id = %pending.content_id, "floating content flipped above reference");
        }
        if measured.right() > viewport.width {
            placement.pin_left(viewport.width - measured.width - self.margin);
        } else if measured.left() < 0.0 {
            placement.pin_left(self.margin);
        }
    }
}
