//! Editing-session orchestration.
//!
//! [`EditorSession`] pairs the synchronous [`DocumentEditor`] with the
//! async collaborators: BOM expansion on product selection, two-phase
//! deletes for persisted lines, edit-mode reload and the validation-gated
//! submit. The tree is only mutated between awaits, and every mutation
//! that involves the backend only lands locally after the backend
//! confirmed it.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::clients::{BomApi, DocumentApi};
use crate::editor::template::OrderTemplate;
use crate::editor::validation::ValidationMap;
use crate::editor::{DocumentEditor, ExpansionOutcome};
use crate::errors::ServiceError;
use crate::events::{EditorEvent, EventSender};
use crate::models::catalog::Product;
use crate::models::document::{Document, LineId};

/// Result of a validation-gated submit.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The document reached the backend; `message` is the server's own
    /// acknowledgement when it sent one.
    Saved {
        created: bool,
        message: Option<String>,
    },
    /// Validation failed; nothing was sent. Keys are scoped by line
    /// position, see [`crate::editor::validation`].
    Rejected(ValidationMap),
}

pub struct EditorSession<B, D>
where
    B: BomApi,
    D: DocumentApi,
{
    session_id: Uuid,
    editor: DocumentEditor,
    bom: Arc<B>,
    documents: Arc<D>,
    events: EventSender,
}

impl<B, D> EditorSession<B, D>
where
    B: BomApi,
    D: DocumentApi,
{
    /// Starts a session on a fresh document of the store's kind.
    pub fn new(bom: Arc<B>, documents: Arc<D>, events: EventSender) -> Self {
        let kind = documents.kind();
        Self {
            session_id: Uuid::new_v4(),
            editor: DocumentEditor::new(kind),
            bom,
            documents,
            events,
        }
    }

    /// Starts a production session booked against a loaded order.
    pub fn from_template(
        template: &OrderTemplate,
        bom: Arc<B>,
        documents: Arc<D>,
        events: EventSender,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            editor: DocumentEditor::from_document(template.start_document()),
            bom,
            documents,
            events,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Synchronous editor access for header and field edits.
    pub fn editor(&self) -> &DocumentEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut DocumentEditor {
        &mut self.editor
    }

    pub fn document(&self) -> &Document {
        self.editor.document()
    }

    /// Reloads the tree from the backend (edit mode). On failure the
    /// current tree is kept and the caller renders the retry affordance.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn load(&mut self, document_id: i64) -> Result<(), ServiceError> {
        let doc = self.documents.fetch(document_id).await.map_err(|err| {
            error!("Failed to load document {}: {}", document_id, err);
            err
        })?;
        let kind = doc.kind;
        self.editor.replace(doc);
        self.emit(EditorEvent::DocumentLoaded {
            session_id: self.session_id,
            kind,
            document_id,
        })
        .await;
        info!("Document loaded: id={}, kind={}", document_id, kind);
        Ok(())
    }

    /// Selects a product for a line and expands its BOM template.
    ///
    /// The line is reset synchronously before the fetch; a fetch failure
    /// leaves it component-less but the document stays editable, and a
    /// response that arrives after the line was re-targeted is discarded.
    #[instrument(skip(self, product), fields(session_id = %self.session_id, product_id = product.id))]
    pub async fn select_product(
        &mut self,
        index: usize,
        product: &Product,
    ) -> Result<ExpansionOutcome, ServiceError> {
        let ticket = self.editor.select_product(index, product)?;

        match self.bom.sub_components(product.id).await {
            Ok(rows) => {
                if self.editor.apply_bom_rows(&ticket, &rows) {
                    self.emit(EditorEvent::BomExpanded {
                        session_id: self.session_id,
                        product_id: product.id,
                        line_count: rows.len(),
                    })
                    .await;
                    Ok(ExpansionOutcome::Applied(rows.len()))
                } else {
                    warn!(
                        "Discarding superseded BOM response: product_id={}",
                        product.id
                    );
                    self.emit(EditorEvent::BomExpansionSuperseded {
                        session_id: self.session_id,
                        product_id: product.id,
                    })
                    .await;
                    Ok(ExpansionOutcome::Superseded)
                }
            }
            Err(err) => {
                warn!(
                    "BOM expansion failed: product_id={}, error={}",
                    product.id, err
                );
                self.emit(EditorEvent::BomExpansionFailed {
                    session_id: self.session_id,
                    product_id: product.id,
                    message: err.notification_message(),
                })
                .await;
                Err(err)
            }
        }
    }

    /// Removes a product line. Persisted lines go through the backend
    /// first and are only spliced out of the tree once the delete is
    /// confirmed; unsaved lines are spliced immediately.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn remove_product(&mut self, index: usize) -> Result<Option<String>, ServiceError> {
        let line_id = self.product_line_id(index)?;
        match line_id {
            LineId::New => {
                self.editor.remove_product(index)?;
                Ok(None)
            }
            LineId::Persisted(id) => {
                self.guard_last_product()?;
                let message = self.documents.delete_product_line(id).await.map_err(|err| {
                    error!("Failed to delete product line {}: {}", id, err);
                    err
                })?;
                self.editor.remove_product(index)?;
                self.emit(EditorEvent::ProductLineDeleted {
                    session_id: self.session_id,
                    line_id: id,
                })
                .await;
                Ok(message)
            }
        }
    }

    /// Removes a component line with the same persisted-vs-unsaved
    /// branching as [`Self::remove_product`].
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn remove_component(
        &mut self,
        product_index: usize,
        component_index: usize,
    ) -> Result<Option<String>, ServiceError> {
        let line_id = self.component_line_id(product_index, component_index)?;
        match line_id {
            LineId::New => {
                self.editor.remove_component(product_index, component_index)?;
                Ok(None)
            }
            LineId::Persisted(id) => {
                self.guard_last_component(product_index)?;
                let message = self
                    .documents
                    .delete_component_line(id)
                    .await
                    .map_err(|err| {
                        error!("Failed to delete component line {}: {}", id, err);
                        err
                    })?;
                self.editor.remove_component(product_index, component_index)?;
                self.emit(EditorEvent::ComponentLineDeleted {
                    session_id: self.session_id,
                    line_id: id,
                })
                .await;
                Ok(message)
            }
        }
    }

    /// Validates and submits the tree. A non-empty validation map blocks
    /// the submit without any network call; otherwise the tree is
    /// flattened and sent as create or update depending on whether the
    /// document already has a server identity.
    #[instrument(skip(self), fields(session_id = %self.session_id))]
    pub async fn submit(&mut self) -> Result<SubmitOutcome, ServiceError> {
        let errors = self.editor.validate();
        if !errors.is_empty() {
            info!("Submit blocked by validation: errors={}", errors.len());
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let doc = self.editor.document();
        let (created, message) = match doc.id {
            Some(id) => (false, self.documents.update(id, doc).await?),
            None => (true, self.documents.create(doc).await?),
        };
        self.emit(EditorEvent::DocumentSaved {
            session_id: self.session_id,
            kind: doc.kind,
            document_id: doc.id,
            created,
        })
        .await;
        info!("Document saved: created={}", created);
        Ok(SubmitOutcome::Saved { created, message })
    }

    // ----- internals --------------------------------------------------

    async fn emit(&self, event: EditorEvent) {
        if let Err(err) = self.events.send(event).await {
            warn!("Dropping editor event: {}", err);
        }
    }

    fn product_line_id(&self, index: usize) -> Result<LineId, ServiceError> {
        self.editor
            .document()
            .products
            .get(index)
            .map(|line| line.id)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("no product line at index {}", index))
            })
    }

    fn component_line_id(
        &self,
        product_index: usize,
        component_index: usize,
    ) -> Result<LineId, ServiceError> {
        let line = self
            .editor
            .document()
            .products
            .get(product_index)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!("no product line at index {}", product_index))
            })?;
        line.components
            .get(component_index)
            .map(|c| c.id)
            .ok_or_else(|| {
                ServiceError::InvalidInput(format!(
                    "no component line at index {}",
                    component_index
                ))
            })
    }

    /// The last-line rules must hold before a server delete is attempted,
    /// not only at splice time.
    fn guard_last_product(&self) -> Result<(), ServiceError> {
        if self.editor.document().products.len() == 1 {
            return Err(ServiceError::InvalidOperation(
                "the last product line cannot be removed".into(),
            ));
        }
        Ok(())
    }

    fn guard_last_component(&self, product_index: usize) -> Result<(), ServiceError> {
        let line = &self.editor.document().products[product_index];
        if line.components.len() == 1 {
            return Err(ServiceError::InvalidOperation(
                "the last component line cannot be removed".into(),
            ));
        }
        Ok(())
    }
}
