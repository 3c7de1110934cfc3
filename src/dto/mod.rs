//! Wire shapes for the backing REST API.
//!
//! Everything the backend sends or accepts lives here; the canonical
//! [`crate::models::document::Document`] tree never leaks wire field names
//! and the editor never sees a raw payload.

pub mod envelope;
pub(crate) mod lax;
pub mod order_wire;
pub mod production_wire;
pub mod report_wire;

pub use envelope::{Envelope, SUCCESS_CODE};
pub use order_wire::{OrderDetail, OrderSubmitPayload, OrderSummary};
pub use production_wire::{
    ProductionDetail, ProductionHeaderUpdate, ProductionSubmitPayload, ProductionSummary,
};
pub use report_wire::{OrderReportRow, StockFilter, StockRow};
