//! Click-outside tracking.
//!
//! One document-level pointer-down listener serves every registration. Each
//! registration names an element and an optional trigger element (the button
//! that opened a popover, say); a pointer-down outside both fires it.

use crate::dom::{Document, ElementId};
use crate::event::{Category, Notification, Outbox, Payload};
use crate::registry::Registry;

/// DOM-side record for one click-outside registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickOutsideEntry {
    pub trigger: Option<String>,
}

/// Registry of click-outside registrations plus the dispatch rule.
#[derive(Debug, Default)]
pub struct ClickOutsideTracker {
    registry: Registry<ClickOutsideEntry>,
}

impl ClickOutsideTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the registration for `element_id`.
    pub fn register(&mut self, element_id: &str, trigger: Option<&str>) {
        let entry = ClickOutsideEntry {
            trigger: trigger.map(str::to_owned),
        };
        if self.registry.insert(element_id, entry).is_some() {
            tracing::trace!(element_id, "click-outside registration replaced");
        }
    }

    /// Remove the registration for `element_id`. Returns whether one existed.
    pub fn unregister(&mut self, element_id: &str) -> bool {
        self.registry.remove(element_id).is_some()
    }

    /// Whether `element_id` is registered.
    pub fn is_registered(&self, element_id: &str) -> bool {
        self.registry.contains(element_id)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Evaluate every registration against a pointer-down on `target`.
    ///
    /// A registration fires when its element exists and does not contain the
    /// target, and its trigger (if any) does not contain the target either.
    /// A registration whose element is absent from the document is skipped.
    /// Returns the number of notifications queued.
    pub fn handle_pointer_down(
        &self,
        doc: &Document,
        target: ElementId,
        outbox: &mut Outbox,
    ) -> usize {
        let mut fired = 0;
        for element_id in self.registry.keys() {
            let Some(entry) = self.registry.get(&element_id) else {
                continue;
            };
            let Some(element) = doc.find(&element_id) else {
                continue;
            };
            if doc.contains(element, target) {
                continue;
            }
            let inside_trigger = entry
                .trigger
                .as_deref()
                .is_some_and(|trigger| doc.contains_by_id(trigger, target));
            if inside_trigger {
                continue;
            }
            tracing::trace!(element_id = %element_id, "pointer-down outside");
            outbox.push(Notification::new(
                Category::ClickOutside,
                element_id,
                Payload::Outside,
            ));
            fired += 1;
        }
        fired
    }
}
