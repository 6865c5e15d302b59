//! Popup stack domain module.
//!
//! An ordered stack of modal descriptors. The renderer shows only the top
//! entry; placeholders (busy/progress overlays) always sit below everything
//! else so an alert queued mid-operation interrupts them without the caller
//! coordinating ordering.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identity of a queued modal.
///
/// 弹窗唯一标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModalId(String);

impl ModalId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ModalId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for ModalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Modal payload, dispatched exhaustively by the renderer.
///
/// 弹窗类型（穷举匹配，不存在未知类型）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModalKind {
    /// Dismissible message dialog.
    Alert {
        title: Option<String>,
        message: String,
    },
    /// Busy/progress overlay; renders only when nothing else is queued.
    Placeholder { message: Option<String> },
}

impl ModalKind {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, ModalKind::Placeholder { .. })
    }
}

/// A queued modal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalDescriptor {
    pub id: ModalId,
    pub kind: ModalKind,
}

impl ModalDescriptor {
    /// Create a descriptor with a generated id.
    pub fn new(kind: ModalKind) -> Self {
        Self {
            id: ModalId::generate(),
            kind,
        }
    }

    pub fn with_id(id: ModalId, kind: ModalKind) -> Self {
        Self { id, kind }
    }
}

/// Ordered modal stack.
///
/// 弹窗栈。
///
/// Invariants:
/// - at most one entry per id (re-queueing an id replaces the old entry);
/// - placeholders sit below every non-placeholder;
/// - the newest non-placeholder is always the top entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModalStack {
    entries: Vec<ModalDescriptor>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a modal.
    ///
    /// Placeholders insert at the bottom; everything else goes on top.
    pub fn queue(&mut self, descriptor: ModalDescriptor) {
        self.entries.retain(|entry| entry.id != descriptor.id);

        if descriptor.kind.is_placeholder() {
            self.entries.insert(0, descriptor);
        } else {
            self.entries.push(descriptor);
        }
    }

    /// Remove the entry with the given id. No-op when absent.
    pub fn hide(&mut self, id: &ModalId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != *id);
        self.entries.len() != before
    }

    /// Empty the stack unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// The entry the renderer should show, if any.
    pub fn top(&self) -> Option<&ModalDescriptor> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModalDescriptor> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(message: &str) -> ModalDescriptor {
        ModalDescriptor::new(ModalKind::Alert {
            title: None,
            message: message.to_string(),
        })
    }

    fn placeholder() -> ModalDescriptor {
        ModalDescriptor::new(ModalKind::Placeholder { message: None })
    }

    #[test]
    fn modal_stack_queue_puts_newest_alert_on_top() {
        let mut stack = ModalStack::new();
        stack.queue(alert("first"));
        stack.queue(alert("second"));

        assert_eq!(stack.len(), 2);
        match &stack.top().unwrap().kind {
            ModalKind::Alert { message, .. } => assert_eq!(message, "second"),
            other => panic!("unexpected top: {other:?}"),
        }
    }

    #[test]
    fn modal_stack_placeholder_never_renders_above_alert() {
        let mut stack = ModalStack::new();
        stack.queue(alert("error"));
        stack.queue(placeholder());

        assert!(!stack.top().unwrap().kind.is_placeholder());
    }

    #[test]
    fn modal_stack_alert_supersedes_active_placeholder() {
        let mut stack = ModalStack::new();
        stack.queue(placeholder());
        assert!(stack.top().unwrap().kind.is_placeholder());

        stack.queue(alert("interrupt"));
        assert!(!stack.top().unwrap().kind.is_placeholder());
    }

    #[test]
    fn modal_stack_placeholder_renders_when_alone() {
        let mut stack = ModalStack::new();
        let busy = placeholder();
        let busy_id = busy.id.clone();
        stack.queue(busy);
        stack.queue(alert("interrupt"));

        let alert_id = stack.top().unwrap().id.clone();
        assert!(stack.hide(&alert_id));
        assert!(stack.top().unwrap().kind.is_placeholder());
        assert_eq!(stack.top().unwrap().id, busy_id);
    }

    #[test]
    fn modal_stack_requeue_same_id_keeps_single_entry() {
        let mut stack = ModalStack::new();
        let id = ModalId::from("busy");
        stack.queue(ModalDescriptor::with_id(
            id.clone(),
            ModalKind::Placeholder { message: None },
        ));
        stack.queue(ModalDescriptor::with_id(
            id.clone(),
            ModalKind::Placeholder {
                message: Some("still working".into()),
            },
        ));

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.top().unwrap().id, id);
    }

    #[test]
    fn modal_stack_hide_unknown_id_is_noop() {
        let mut stack = ModalStack::new();
        stack.queue(alert("only"));
        assert!(!stack.hide(&ModalId::from("missing")));
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn modal_stack_clear_empties_unconditionally() {
        let mut stack = ModalStack::new();
        stack.queue(placeholder());
        stack.queue(alert("a"));
        stack.queue(alert("b"));
        stack.clear();
        assert!(stack.is_empty());
        assert!(stack.top().is_none());
    }
}
