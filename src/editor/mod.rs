//! The nested document editor.
//!
//! [`DocumentEditor`] owns the in-memory tree and applies every mutation
//! through one place, synchronously, so derivation rules can't drift
//! between call sites. Two directional rules coexist and must not be
//! conflated:
//!
//! * **cascade**: editing a product quantity pushes that quantity down
//!   into every component line and recomputes component amounts;
//! * **aggregation**: editing a component field recomputes that line's
//!   amount and pulls the sum back up into the owning product's amount.
//!
//! Async concerns (BOM fetches, line deletes, submission) live in
//! [`crate::session`]; the editor only hands out [`BomTicket`]s so late
//! BOM responses can be recognized as stale and discarded.

pub mod amounts;
pub mod availability;
pub mod template;
pub mod validation;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::ServiceError;
use crate::models::bom::BomRow;
use crate::models::catalog::{Component, Product};
use crate::models::document::{
    ComponentId, ComponentLine, Counterparty, Document, DocumentKind, DocumentStatus, LineId,
    ProductId, ProductLine, VendorId,
};
use template::OrderTemplate;
use validation::{validate_document, ValidationMap};

/// How a BOM expansion concluded: installed into the line, or recognized
/// as stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpansionOutcome {
    Applied(usize),
    Superseded,
}

/// Claim ticket for an in-flight BOM expansion. A response is applied only
/// while the line still matches the ticket's generation and product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BomTicket {
    pub line_index: usize,
    pub product_id: ProductId,
    pub generation: u64,
}

/// A single component-field edit. Quantity and rate arrive as raw input
/// and are coerced, never rejected.
#[derive(Debug, Clone)]
pub enum ComponentEdit {
    Component(ComponentId),
    Quantity(String),
    Unit(String),
    Rate(String),
}

#[derive(Debug, Clone)]
pub struct DocumentEditor {
    doc: Document,
}

impl DocumentEditor {
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            doc: Document::new(kind),
        }
    }

    pub fn from_document(doc: Document) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Installs a freshly loaded tree (edit-mode reload).
    pub fn replace(&mut self, doc: Document) {
        self.doc = doc;
    }

    // ----- header -----------------------------------------------------

    pub fn set_document_date(&mut self, date: Option<NaiveDate>) {
        self.doc.document_date = date;
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) {
        self.doc.delivery_date = date;
    }

    pub fn set_buyer(&mut self, buyer: VendorId) {
        self.doc.counterparty = Counterparty::Buyer(buyer);
    }

    pub fn set_order_ref(&mut self, order_ref: impl Into<String>) {
        self.doc.counterparty = Counterparty::OrderRef(order_ref.into());
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.doc.note = note.into();
    }

    pub fn set_status(&mut self, status: DocumentStatus) -> Result<(), ServiceError> {
        if !status.valid_for(self.doc.kind) {
            return Err(ServiceError::InvalidStatus(format!(
                "{} is not a valid {} status",
                status, self.doc.kind
            )));
        }
        self.doc.status = Some(status);
        Ok(())
    }

    // ----- product lines ----------------------------------------------

    /// Appends an empty product line. Blocked once every catalog product
    /// is already claimed by some line.
    pub fn add_product(&mut self, catalog: &[Product]) -> Result<usize, ServiceError> {
        if !availability::can_add(catalog, &self.doc.assigned_product_ids()) {
            return Err(ServiceError::InvalidOperation(
                "every product is already added".into(),
            ));
        }
        self.doc.products.push(ProductLine::empty());
        Ok(self.doc.products.len() - 1)
    }

    /// Splices out a product line. The last remaining line cannot be
    /// removed; persisted lines must be deleted server-side first (the
    /// session handles that ordering).
    pub fn remove_product(&mut self, index: usize) -> Result<ProductLine, ServiceError> {
        self.product_index(index)?;
        if self.doc.products.len() == 1 {
            return Err(ServiceError::InvalidOperation(
                "the last product line cannot be removed".into(),
            ));
        }
        Ok(self.doc.products.remove(index))
    }

    /// (Re-)targets a line at a product: quantity resets to 1, the amount
    /// seeds from the product's base rate and any previous component lines
    /// are discarded. Returns the ticket the caller needs to install the
    /// BOM expansion for this selection.
    pub fn select_product(
        &mut self,
        index: usize,
        product: &Product,
    ) -> Result<BomTicket, ServiceError> {
        let line = self.product_mut(index)?;
        line.product_id = Some(product.id);
        line.quantity = Decimal::ONE;
        line.amount = product.rate;
        line.components.clear();
        let generation = line.next_bom_generation();
        Ok(BomTicket {
            line_index: index,
            product_id: product.id,
            generation,
        })
    }

    /// Installs fetched BOM rows for a prior selection. Returns `false`
    /// (leaving the tree untouched) when the ticket is stale: the line was
    /// re-targeted, removed, or expanded again since the ticket was issued.
    pub fn apply_bom_rows(&mut self, ticket: &BomTicket, rows: &[BomRow]) -> bool {
        let Some(line) = self.doc.products.get_mut(ticket.line_index) else {
            return false;
        };
        if line.bom_generation() != ticket.generation
            || line.product_id != Some(ticket.product_id)
        {
            return false;
        }

        line.components = rows
            .iter()
            .map(|row| ComponentLine {
                id: LineId::New,
                component_id: row.component_id,
                quantity: row.quantity,
                unit: row.unit.clone().unwrap_or_default(),
                rate: row.rate,
                amount: amounts::line_amount(row.quantity, row.rate),
            })
            .collect();
        if !line.components.is_empty() {
            line.amount = line.component_total();
        }
        true
    }

    /// Targets a line at a product using component lines captured from a
    /// source order instead of a BOM fetch (production composed from an
    /// order). Only products the template allows can be chosen.
    pub fn select_product_from_template(
        &mut self,
        index: usize,
        product: &Product,
        template: &OrderTemplate,
    ) -> Result<(), ServiceError> {
        if !template.allows(product.id) {
            return Err(ServiceError::InvalidOperation(format!(
                "product {} is not part of order {}",
                product.name,
                template.order_ref()
            )));
        }
        let line = self.product_mut(index)?;
        line.product_id = Some(product.id);
        if line.quantity.is_zero() {
            line.quantity = Decimal::ONE;
        }
        line.components = template.components_for(product.id);
        line.amount = if line.components.is_empty() {
            product.rate
        } else {
            line.component_total()
        };
        line.next_bom_generation();
        Ok(())
    }

    /// Sets a product quantity from raw input and cascades it into every
    /// component line, recomputing their amounts. The cascade is strictly
    /// downward; the product amount is not re-aggregated here.
    pub fn set_product_quantity(&mut self, index: usize, raw: &str) -> Result<(), ServiceError> {
        let quantity = amounts::parse_decimal_or_zero(raw);
        let line = self.product_mut(index)?;
        line.quantity = quantity;
        for component in &mut line.components {
            component.quantity = quantity;
            component.amount = amounts::line_amount(quantity, component.rate);
        }
        Ok(())
    }

    // ----- component lines --------------------------------------------

    /// Appends an empty component line under a product. Blocked once every
    /// catalog component is claimed within that product.
    pub fn add_component(
        &mut self,
        product_index: usize,
        catalog: &[Component],
    ) -> Result<usize, ServiceError> {
        let line = self.product_mut(product_index)?;
        let assigned: Vec<Option<ComponentId>> =
            line.components.iter().map(|c| c.component_id).collect();
        if !availability::can_add(catalog, &assigned) {
            return Err(ServiceError::InvalidOperation(
                "every component is already added".into(),
            ));
        }
        line.components.push(ComponentLine::empty());
        Ok(line.components.len() - 1)
    }

    /// Splices out a component line and re-aggregates the product amount.
    /// The last remaining component line of a product cannot be removed.
    pub fn remove_component(
        &mut self,
        product_index: usize,
        component_index: usize,
    ) -> Result<ComponentLine, ServiceError> {
        let line = self.product_mut(product_index)?;
        if component_index >= line.components.len() {
            return Err(ServiceError::InvalidInput(format!(
                "no component line at index {}",
                component_index
            )));
        }
        if line.components.len() == 1 {
            return Err(ServiceError::InvalidOperation(
                "the last component line cannot be removed".into(),
            ));
        }
        let removed = line.components.remove(component_index);
        line.amount = line.component_total();
        Ok(removed)
    }

    /// Applies one field edit, recomputes that line's amount and
    /// re-aggregates the owning product's amount (the aggregation
    /// direction, opposite to the quantity cascade).
    pub fn update_component_field(
        &mut self,
        product_index: usize,
        component_index: usize,
        edit: ComponentEdit,
    ) -> Result<(), ServiceError> {
        let line = self.product_mut(product_index)?;
        let component = line.components.get_mut(component_index).ok_or_else(|| {
            ServiceError::InvalidInput(format!("no component line at index {}", component_index))
        })?;

        match edit {
            ComponentEdit::Component(id) => component.component_id = Some(id),
            ComponentEdit::Quantity(raw) => {
                component.quantity = amounts::parse_decimal_or_zero(&raw)
            }
            ComponentEdit::Unit(unit) => component.unit = unit,
            ComponentEdit::Rate(raw) => component.rate = amounts::parse_decimal_or_zero(&raw),
        }
        component.amount = amounts::line_amount(component.quantity, component.rate);
        line.amount = line.component_total();
        Ok(())
    }

    // ----- dropdown support -------------------------------------------

    pub fn available_products<'a>(
        &self,
        catalog: &'a [Product],
        current_index: Option<usize>,
    ) -> Vec<&'a Product> {
        availability::available(catalog, &self.doc.assigned_product_ids(), current_index)
    }

    pub fn available_components<'a>(
        &self,
        product_index: usize,
        catalog: &'a [Component],
        current_index: Option<usize>,
    ) -> Result<Vec<&'a Component>, ServiceError> {
        let line = self.product_ref(product_index)?;
        let assigned: Vec<Option<ComponentId>> =
            line.components.iter().map(|c| c.component_id).collect();
        Ok(availability::available(catalog, &assigned, current_index))
    }

    pub fn can_add_product(&self, catalog: &[Product]) -> bool {
        availability::can_add(catalog, &self.doc.assigned_product_ids())
    }

    // ----- validation -------------------------------------------------

    pub fn validate(&self) -> ValidationMap {
        validate_document(&self.doc)
    }

    // ----- internals --------------------------------------------------

    fn product_index(&self, index: usize) -> Result<usize, ServiceError> {
        if index < self.doc.products.len() {
            Ok(index)
        } else {
            Err(ServiceError::InvalidInput(format!(
                "no product line at index {}",
                index
            )))
        }
    }

    fn product_ref(&self, index: usize) -> Result<&ProductLine, ServiceError> {
        self.product_index(index)?;
        Ok(&self.doc.products[index])
    }

    fn product_mut(&mut self, index: usize) -> Result<&mut ProductLine, ServiceError> {
        self.product_index(index)?;
        Ok(&mut self.doc.products[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn product(id: ProductId, rate: Decimal) -> Product {
        Product {
            id,
            name: format!("Product {}", id),
            rate,
        }
    }

    fn bom_row(component_id: ComponentId, quantity: Decimal, rate: Decimal) -> BomRow {
        BomRow {
            component_id: Some(component_id),
            quantity,
            unit: Some("pcs".into()),
            rate,
        }
    }

    #[test]
    fn selection_resets_line_and_expansion_derives_amounts() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let ticket = editor
            .select_product(0, &product(4, dec!(500)))
            .expect("selection should succeed");
        assert_eq!(editor.document().products[0].amount, dec!(500));
        assert!(editor.document().products[0].components.is_empty());

        assert!(editor.apply_bom_rows(&ticket, &[bom_row(7, dec!(2), dec!(50))]));
        let line = &editor.document().products[0];
        assert_eq!(line.components.len(), 1);
        assert_eq!(line.components[0].amount, dec!(100));
        assert_eq!(line.amount, dec!(100));
    }

    #[test]
    fn stale_bom_responses_are_discarded() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let first = editor.select_product(0, &product(4, dec!(500))).unwrap();
        let second = editor.select_product(0, &product(9, dec!(300))).unwrap();

        // The slow response for the first selection arrives last.
        assert!(!editor.apply_bom_rows(&first, &[bom_row(7, dec!(2), dec!(50))]));
        assert!(editor.document().products[0].components.is_empty());

        assert!(editor.apply_bom_rows(&second, &[bom_row(8, dec!(1), dec!(30))]));
        assert_eq!(
            editor.document().products[0].components[0].component_id,
            Some(8)
        );
    }

    #[test]
    fn quantity_cascade_rescales_every_component() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let ticket = editor.select_product(0, &product(4, dec!(500))).unwrap();
        editor.apply_bom_rows(
            &ticket,
            &[bom_row(7, dec!(2), dec!(50)), bom_row(8, dec!(1), dec!(20))],
        );

        editor.set_product_quantity(0, "3").unwrap();
        let line = &editor.document().products[0];
        assert_eq!(line.quantity, dec!(3));
        for component in &line.components {
            assert_eq!(component.quantity, dec!(3));
        }
        assert_eq!(line.components[0].amount, dec!(150));
        assert_eq!(line.components[1].amount, dec!(60));
    }

    #[test]
    fn component_edit_aggregates_into_owner_only() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let catalog = vec![product(1, dec!(10)), product(2, dec!(20))];
        let t0 = editor.select_product(0, &catalog[0]).unwrap();
        editor.apply_bom_rows(&t0, &[bom_row(7, dec!(1), dec!(10))]);
        editor.add_product(&catalog).unwrap();
        let t1 = editor.select_product(1, &catalog[1]).unwrap();
        editor.apply_bom_rows(&t1, &[bom_row(8, dec!(1), dec!(5))]);

        editor
            .update_component_field(0, 0, ComponentEdit::Rate("25".into()))
            .unwrap();

        let doc = editor.document();
        assert_eq!(doc.products[0].components[0].amount, dec!(25));
        assert_eq!(doc.products[0].amount, dec!(25));
        // Sibling product line untouched.
        assert_eq!(doc.products[1].amount, dec!(5));
    }

    #[test]
    fn malformed_input_coerces_to_zero_amounts() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        editor
            .update_component_field(0, 0, ComponentEdit::Rate("oops".into()))
            .unwrap();
        assert_eq!(editor.document().products[0].components[0].rate, dec!(0));
        assert_eq!(editor.document().products[0].components[0].amount, dec!(0));
    }

    #[test]
    fn last_lines_cannot_be_removed() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        assert_matches!(
            editor.remove_product(0),
            Err(ServiceError::InvalidOperation(_))
        );
        assert_matches!(
            editor.remove_component(0, 0),
            Err(ServiceError::InvalidOperation(_))
        );
    }

    #[test]
    fn add_product_blocked_when_catalog_exhausted() {
        let mut editor = DocumentEditor::new(DocumentKind::Order);
        let catalog = vec![product(1, dec!(10))];
        editor.select_product(0, &catalog[0]).unwrap();
        assert!(!editor.can_add_product(&catalog));
        assert_matches!(
            editor.add_product(&catalog),
            Err(ServiceError::InvalidOperation(_))
        );
    }

    #[test]
    fn status_must_match_document_kind() {
        let mut editor = DocumentEditor::new(DocumentKind::Production);
        assert_matches!(
            editor.set_status(DocumentStatus::Delivered),
            Err(ServiceError::InvalidStatus(_))
        );
        editor.set_status(DocumentStatus::Finished).unwrap();
        assert_eq!(
            editor.document().status,
            Some(DocumentStatus::Finished)
        );
    }
}
