//! Derived report arithmetic.
//!
//! The backend returns raw movement buckets; the console derives the
//! displayed figures. Opening stock is everything that entered before the
//! report window minus what was dispatched before it; closing stock adds
//! the window's own movements on top.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::dto::report_wire::{OrderReportRow, StockRow};

/// One component's derived stock position.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSummary {
    pub component_id: Option<i64>,
    pub component_name: String,
    pub opening: Decimal,
    pub closing: Decimal,
}

impl StockSummary {
    /// Closing stock below zero means more was dispatched than received;
    /// the report highlights these rows.
    pub fn is_negative(&self) -> bool {
        self.closing < Decimal::ZERO
    }
}

/// Derives opening/closing stock for one raw report row.
pub fn stock_summary(row: &StockRow) -> StockSummary {
    let opening = row.openpurch + row.openproduction - row.dispatchorder;
    let closing = opening + row.purch + row.production - row.dispatch;
    StockSummary {
        component_id: row.component_id,
        component_name: row.component_name.clone().unwrap_or_default(),
        opening,
        closing,
    }
}

pub fn summarize_stock(rows: &[StockRow]) -> Vec<StockSummary> {
    rows.iter().map(stock_summary).collect()
}

/// Quantity/amount totals for one vendor in the order report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VendorTotals {
    pub lines: usize,
    pub quantity: Decimal,
    pub amount: Decimal,
}

/// Groups order report rows by vendor and accumulates totals. Rows with
/// no vendor land under an empty key.
pub fn vendor_totals(rows: &[OrderReportRow]) -> BTreeMap<String, VendorTotals> {
    let mut totals: BTreeMap<String, VendorTotals> = BTreeMap::new();
    for row in rows {
        let entry = totals
            .entry(row.vendor_name.clone().unwrap_or_default())
            .or_default();
        entry.lines += 1;
        entry.quantity += row.quantity;
        entry.amount += row.amount;
    }
    totals
}
