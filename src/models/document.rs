//! The canonical in-memory document tree edited by the console.
//!
//! A [`Document`] is either a sales order or a production run: header
//! fields plus an ordered list of [`ProductLine`]s, each owning an ordered
//! list of [`ComponentLine`]s. Both backend detail shapes (flat and
//! nested) are reconciled into this one tree by the dto adapters; nothing
//! outside `dto` ever sees a wire shape.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type VendorId = i64;
pub type ProductId = i64;
pub type ComponentId = i64;

/// Which kind of document the editor is working on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum DocumentKind {
    Order,
    Production,
}

/// Document lifecycle status. Orders and production runs share one
/// vocabulary; [`DocumentStatus::options`] narrows it per kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
pub enum DocumentStatus {
    Pending,
    Processing,
    Delivered,
    Finished,
    Cancelled,
}

impl DocumentStatus {
    /// Statuses a document of the given kind may take.
    pub fn options(kind: DocumentKind) -> &'static [DocumentStatus] {
        match kind {
            DocumentKind::Order => &[
                DocumentStatus::Pending,
                DocumentStatus::Processing,
                DocumentStatus::Delivered,
                DocumentStatus::Cancelled,
            ],
            DocumentKind::Production => &[
                DocumentStatus::Pending,
                DocumentStatus::Finished,
                DocumentStatus::Cancelled,
            ],
        }
    }

    pub fn valid_for(self, kind: DocumentKind) -> bool {
        Self::options(kind).contains(&self)
    }
}

/// Server identity of a line: `New` lines exist only in memory and are
/// spliced out without a round trip; `Persisted` lines are only removed
/// after the backend confirms the delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineId {
    #[default]
    New,
    Persisted(i64),
}

impl LineId {
    pub fn from_option(id: Option<i64>) -> Self {
        match id {
            Some(id) if id > 0 => LineId::Persisted(id),
            _ => LineId::New,
        }
    }

    pub fn persisted(self) -> Option<i64> {
        match self {
            LineId::Persisted(id) => Some(id),
            LineId::New => None,
        }
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, LineId::Persisted(_))
    }
}

/// The party a document references: the buyer for orders, the source
/// order for production runs composed from an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Counterparty {
    #[default]
    None,
    Buyer(VendorId),
    OrderRef(String),
}

impl Counterparty {
    pub fn is_set(&self) -> bool {
        !matches!(self, Counterparty::None)
    }

    pub fn buyer(&self) -> Option<VendorId> {
        match self {
            Counterparty::Buyer(id) => Some(*id),
            _ => None,
        }
    }

    pub fn order_ref(&self) -> Option<&str> {
        match self {
            Counterparty::OrderRef(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for Counterparty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Counterparty::None => write!(f, "-"),
            Counterparty::Buyer(id) => write!(f, "buyer {}", id),
            Counterparty::OrderRef(r) => write!(f, "order {}", r),
        }
    }
}

/// One component row under a product line. `amount` is always derived
/// (quantity × rate) and never user-settable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLine {
    pub id: LineId,
    pub component_id: Option<ComponentId>,
    pub quantity: Decimal,
    pub unit: String,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl ComponentLine {
    /// A fresh, unselected row: quantity 1, everything else empty/zero.
    pub fn empty() -> Self {
        Self {
            id: LineId::New,
            component_id: None,
            quantity: Decimal::ONE,
            unit: String::new(),
            rate: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }
}

impl Default for ComponentLine {
    fn default() -> Self {
        Self::empty()
    }
}

/// One product row of a document, owning its component rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductLine {
    pub id: LineId,
    pub product_id: Option<ProductId>,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub components: Vec<ComponentLine>,
    /// Monotonic counter bumped on every (re-)selection; BOM responses
    /// carrying a stale generation are discarded.
    #[serde(skip)]
    bom_generation: u64,
}

impl ProductLine {
    /// A fresh, unselected row holding one empty component row.
    pub fn empty() -> Self {
        Self {
            id: LineId::New,
            product_id: None,
            quantity: Decimal::ONE,
            amount: Decimal::ZERO,
            components: vec![ComponentLine::empty()],
            bom_generation: 0,
        }
    }

    pub fn new(
        id: LineId,
        product_id: Option<ProductId>,
        quantity: Decimal,
        amount: Decimal,
        components: Vec<ComponentLine>,
    ) -> Self {
        Self {
            id,
            product_id,
            quantity,
            amount,
            components,
            bom_generation: 0,
        }
    }

    /// Sum of the component amounts (the aggregation direction).
    pub fn component_total(&self) -> Decimal {
        self.components.iter().map(|c| c.amount).sum()
    }

    pub fn bom_generation(&self) -> u64 {
        self.bom_generation
    }

    pub(crate) fn next_bom_generation(&mut self) -> u64 {
        self.bom_generation += 1;
        self.bom_generation
    }
}

impl Default for ProductLine {
    fn default() -> Self {
        Self::empty()
    }
}

/// An editable order or production run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub kind: DocumentKind,
    pub id: Option<i64>,
    pub document_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    pub counterparty: Counterparty,
    /// The document's own business reference (order number), when the
    /// backend assigns one. Production runs composed from an order cite it
    /// through their counterparty instead.
    pub reference: Option<String>,
    pub note: String,
    pub status: Option<DocumentStatus>,
    pub products: Vec<ProductLine>,
}

impl Document {
    /// A new document: one empty product line with one empty component line.
    pub fn new(kind: DocumentKind) -> Self {
        Self {
            kind,
            id: None,
            document_date: None,
            delivery_date: None,
            counterparty: Counterparty::None,
            reference: None,
            note: String::new(),
            status: None,
            products: vec![ProductLine::empty()],
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Product ids assigned across all lines, position-aligned with
    /// `products` (None for unselected lines).
    pub fn assigned_product_ids(&self) -> Vec<Option<ProductId>> {
        self.products.iter().map(|p| p.product_id).collect()
    }

    /// Sum of all product-line amounts, for display-time footers.
    pub fn grand_total(&self) -> Decimal {
        self.products.iter().map(|p| p.amount).sum()
    }
}
