// ==========================================
// Raw row builders for integration tests
// ==========================================

#![allow(dead_code)]

use offshore_logistics::RawRow;

/// Fluent builder over a header → cell map.
#[derive(Default, Clone)]
pub struct RowBuilder {
    row: RawRow,
}

impl RowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, header: &str, value: &str) -> Self {
        self.row.insert(header.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> RawRow {
        self.row
    }
}

// ==========================================
// Per-source shortcuts
// ==========================================

pub fn cost_row(lc: &str, location: &str, month: &str, days: &str, cost: &str) -> RawRow {
    RowBuilder::new()
        .cell("LC Number", lc)
        .cell("Rig Location", location)
        .cell("Month", month)
        .cell("Allocated Days", days)
        .cell("Total Cost", cost)
        .build()
}

pub fn event_row(category: &str, parent: &str, location: &str, start: &str, hours: &str) -> RawRow {
    RowBuilder::new()
        .cell("Event Category", category)
        .cell("Parent Event", parent)
        .cell("Location", location)
        .cell("Event Start", start)
        .cell("Hours", hours)
        .cell("Vessel", "Pelican Island")
        .build()
}

pub fn bulk_row(fluid: &str, action: &str, location: &str, qty: &str) -> RawRow {
    RowBuilder::new()
        .cell("Bulk Type", fluid)
        .cell("Action", action)
        .cell("Location", location)
        .cell("Quantity", qty)
        .cell("Action Date", "2024-01-15")
        .cell("Vessel", "Harvey Carrier")
        .build()
}

pub fn manifest_row(voyage: &str, vessel: &str, destination: &str, date: &str) -> RawRow {
    RowBuilder::new()
        .cell("Voyage Number", voyage)
        .cell("Vessel", vessel)
        .cell("Destination", destination)
        .cell("Manifest Date", date)
        .build()
}
