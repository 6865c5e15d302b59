//! Popup service.
//!
//! Owns the modal stack behind an async mutex and publishes the current
//! top-of-stack through a watch channel so the render layer can observe
//! without polling.

use tokio::sync::{watch, Mutex};
use tracing::debug;

use onboard_core::popup::{ModalDescriptor, ModalId, ModalKind, ModalStack};

pub struct PopupService {
    stack: Mutex<ModalStack>,
    top_tx: watch::Sender<Option<ModalDescriptor>>,
}

impl Default for PopupService {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupService {
    pub fn new() -> Self {
        let (top_tx, _) = watch::channel(None);
        Self {
            stack: Mutex::new(ModalStack::new()),
            top_tx,
        }
    }

    /// Queue a modal and return its id so the caller can dismiss it later.
    pub async fn queue(&self, kind: ModalKind) -> ModalId {
        let descriptor = ModalDescriptor::new(kind);
        let id = descriptor.id.clone();
        let mut stack = self.stack.lock().await;
        debug!(modal_id = %id, "popup.queue");
        stack.queue(descriptor);
        self.publish(&stack);
        id
    }

    /// Convenience: queue a dismissible alert dialog.
    pub async fn alert(&self, message: impl Into<String>) -> ModalId {
        self.queue(ModalKind::Alert {
            title: None,
            message: message.into(),
        })
        .await
    }

    /// Convenience: queue a busy/progress placeholder.
    pub async fn placeholder(&self, message: Option<String>) -> ModalId {
        self.queue(ModalKind::Placeholder { message }).await
    }

    /// Remove a modal by id. No-op when absent.
    pub async fn hide(&self, id: &ModalId) {
        let mut stack = self.stack.lock().await;
        if stack.hide(id) {
            debug!(modal_id = %id, "popup.hide");
            self.publish(&stack);
        }
    }

    /// Empty the stack unconditionally.
    pub async fn clear(&self) {
        let mut stack = self.stack.lock().await;
        stack.clear();
        debug!("popup.clear");
        self.publish(&stack);
    }

    /// The modal the renderer should currently show.
    pub async fn top(&self) -> Option<ModalDescriptor> {
        self.stack.lock().await.top().cloned()
    }

    /// Snapshot of the full ordered stack, bottom to top.
    pub async fn modals(&self) -> Vec<ModalDescriptor> {
        self.stack.lock().await.iter().cloned().collect()
    }

    /// Observe top-of-stack changes.
    pub fn watch_top(&self) -> watch::Receiver<Option<ModalDescriptor>> {
        self.top_tx.subscribe()
    }

    fn publish(&self, stack: &ModalStack) {
        // Receivers may all be gone; that is fine.
        let _ = self.top_tx.send(stack.top().cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn popup_service_alert_supersedes_placeholder_in_watch() {
        let popup = PopupService::new();
        let mut rx = popup.watch_top();

        popup.placeholder(Some("Signing in…".into())).await;
        rx.changed().await.unwrap();
        assert!(rx.borrow().as_ref().unwrap().kind.is_placeholder());

        popup.alert("boom").await;
        rx.changed().await.unwrap();
        assert!(!rx.borrow().as_ref().unwrap().kind.is_placeholder());
    }

    #[tokio::test]
    async fn popup_service_hide_restores_placeholder() {
        let popup = PopupService::new();
        let busy = popup.placeholder(None).await;
        let alert = popup.alert("boom").await;

        popup.hide(&alert).await;
        let top = popup.top().await.unwrap();
        assert_eq!(top.id, busy);
    }

    #[tokio::test]
    async fn popup_service_clear_empties_stack() {
        let popup = PopupService::new();
        popup.placeholder(None).await;
        popup.alert("a").await;
        popup.clear().await;
        assert!(popup.top().await.is_none());
        assert!(popup.modals().await.is_empty());
    }
}
