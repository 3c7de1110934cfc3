//! mfgops-console core library
//!
//! Headless core for a manufacturing-operations admin console: the nested
//! order/production composition editor (product lines owning component
//! lines, with amount derivation, catalog availability filtering, BOM
//! template expansion and a validation-gated submit) plus typed clients
//! for the backing REST API of record.
//!
//! Rendering, routing and authentication stay outside; the UI layer calls
//! the synchronous [`editor::DocumentEditor`] for field edits and the
//! async [`session::EditorSession`] for everything that touches the
//! backend.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod clients;
pub mod config;
pub mod dto;
pub mod editor;
pub mod errors;
pub mod events;
pub mod models;
pub mod reports;
pub mod session;

pub use errors::ServiceError;

pub mod prelude {
    pub use crate::clients::{
        ApiClient, BomApi, BomClient, CatalogClient, DocumentApi, OrderClient, ProductionClient,
        ReportClient,
    };
    pub use crate::editor::{ComponentEdit, DocumentEditor, ExpansionOutcome};
    pub use crate::errors::ServiceError;
    pub use crate::events::{EditorEvent, EventSender};
    pub use crate::models::document::{
        ComponentLine, Counterparty, Document, DocumentKind, DocumentStatus, LineId, ProductLine,
    };
    pub use crate::session::{EditorSession, SubmitOutcome};
}
