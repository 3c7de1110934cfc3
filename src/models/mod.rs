pub mod bom;
pub mod catalog;
pub mod document;

pub use bom::BomRow;
pub use catalog::{Component, Product, Vendor};
pub use document::{
    ComponentLine, Counterparty, Document, DocumentKind, DocumentStatus, LineId, ProductLine,
};
