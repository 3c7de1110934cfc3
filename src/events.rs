//! Editing-session events.
//!
//! Mutations that the UI layer reacts to (toasts, list invalidation) are
//! published on a bounded channel rather than called back directly, so the
//! core stays free of presentation concerns.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;
use uuid::Uuid;

use crate::models::document::{DocumentKind, DocumentStatus};

/// Events emitted by an editing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EditorEvent {
    DocumentLoaded {
        session_id: Uuid,
        kind: DocumentKind,
        document_id: i64,
    },
    DocumentSaved {
        session_id: Uuid,
        kind: DocumentKind,
        document_id: Option<i64>,
        created: bool,
    },
    StatusUpdated {
        kind: DocumentKind,
        document_id: i64,
        status: DocumentStatus,
    },
    ProductLineDeleted {
        session_id: Uuid,
        line_id: i64,
    },
    ComponentLineDeleted {
        session_id: Uuid,
        line_id: i64,
    },
    BomExpanded {
        session_id: Uuid,
        product_id: i64,
        line_count: usize,
    },
    BomExpansionFailed {
        session_id: Uuid,
        product_id: i64,
        message: String,
    },
    /// A BOM response arrived after the line had already been re-targeted
    /// and was discarded.
    BomExpansionSuperseded {
        session_id: Uuid,
        product_id: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<EditorEvent>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<EditorEvent>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: EditorEvent) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Convenience constructor for a sender/receiver pair.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<EditorEvent>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

/// Drains the event channel, logging each event. Suitable as a default
/// consumer when no UI is attached (the CLI spawns this).
pub async fn process_events(mut receiver: mpsc::Receiver<EditorEvent>) {
    while let Some(event) = receiver.recv().await {
        info!(?event, "Editor event");
    }
}
