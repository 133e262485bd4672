// ==========================================
// Offshore Logistics - Field Extractor
// ==========================================
// Scope: raw row + canonical field → cell value
// Rule: ordered alias list per canonical field, first alias whose
// value is present wins; exact header first, then a header match
// ignoring case and spacing
// Absent: empty, whitespace, "N/A", "#N/A", "NULL", "NaN"
// ==========================================

use std::collections::HashMap;
use std::fmt;

/// One raw tabular row: column header → cell text.
pub type RawRow = HashMap<String, String>;

const ABSENT_MARKERS: &[&str] = &["n/a", "#n/a", "null", "nan"];

/// Canonical fields understood by the normalizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    // shared
    Location,
    Vessel,
    VoyageNumber,
    Quantity,
    // cost allocation
    LcNumber,
    Department,
    Month,
    AllocatedDays,
    TotalCost,
    // voyage events
    EventCategory,
    ParentEvent,
    EventStart,
    EventEnd,
    DurationHours,
    // manifests
    ManifestId,
    ManifestDate,
    Origin,
    Destination,
    CargoType,
    WeightLbs,
    // bulk actions
    TransferId,
    ActionDate,
    FluidType,
    Direction,
    Unit,
    // rig schedule
    RigName,
    WellName,
    Activity,
    StartDate,
    EndDate,
    DurationDays,
}

impl CanonicalField {
    /// Accepted source headers, in precedence order.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Location => &[
                "Rig Location",
                "Location Reference",
                "Rig Reference",
                "Location",
                "Facility",
                "Installation",
                "Rig",
            ],
            CanonicalField::Vessel => &["Vessel", "Vessel Name", "Transporter", "Ship", "Boat"],
            CanonicalField::VoyageNumber => &["Voyage Number", "Voyage #", "Voyage No", "Voyage"],
            CanonicalField::Quantity => &[
                "Quantity",
                "Qty",
                "Volume (bbl)",
                "Volume",
                "Qty (bbl)",
                "Amount",
            ],
            CanonicalField::LcNumber => &["LC Number", "LC", "LC No", "LC Code", "Cost Code"],
            CanonicalField::Department => &["Department", "Dept", "Cost Category", "Category"],
            CanonicalField::Month => &["Month", "Period", "Month-Year", "Cost Month", "Date"],
            CanonicalField::AllocatedDays => &["Allocated Days", "Alloc Days", "Days Allocated", "Days"],
            CanonicalField::TotalCost => &["Total Cost", "Cost", "Total Cost (USD)", "Amount (USD)"],
            CanonicalField::EventCategory => &["Event Category", "Event", "Event Type", "Activity Category"],
            CanonicalField::ParentEvent => &["Parent Event", "Parent Event Category", "Parent"],
            CanonicalField::EventStart => &["Event Start", "Start Time", "Start Date", "Start"],
            CanonicalField::EventEnd => &["Event End", "End Time", "End Date", "End"],
            CanonicalField::DurationHours => &["Duration (hrs)", "Hours", "Event Hours", "Duration"],
            CanonicalField::ManifestId => &["Manifest Number", "Manifest #", "Manifest ID", "Manifest"],
            CanonicalField::ManifestDate => &["Manifest Date", "Sail Date", "Date"],
            CanonicalField::Origin => &["Origin", "From", "From Location"],
            CanonicalField::Destination => &["Destination", "To", "To Location", "Offshore Location"],
            CanonicalField::CargoType => &["Cargo Type", "Cargo", "Cargo Description"],
            CanonicalField::WeightLbs => &["Weight (lbs)", "Deck Lbs", "Weight"],
            CanonicalField::TransferId => &["Transfer ID", "Bulk Transfer ID", "Ticket Number", "Ticket"],
            CanonicalField::ActionDate => &["Action Date", "Transfer Date", "Date"],
            CanonicalField::FluidType => &["Bulk Type", "Fluid Type", "Fluid", "Product", "Bulk Description"],
            CanonicalField::Direction => &["Action", "Direction", "Transfer Type"],
            CanonicalField::Unit => &["Unit", "UOM", "Units"],
            CanonicalField::RigName => &["Rig Name", "Rig", "Asset"],
            CanonicalField::WellName => &["Well Name", "Well"],
            CanonicalField::Activity => &["Activity", "Operation", "Scope"],
            CanonicalField::StartDate => &["Start Date", "Start"],
            CanonicalField::EndDate => &["End Date", "End", "Finish"],
            CanonicalField::DurationDays => &["Duration (days)", "Days", "Duration"],
        }
    }

    /// snake_case name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Location => "location",
            CanonicalField::Vessel => "vessel",
            CanonicalField::VoyageNumber => "voyage_number",
            CanonicalField::Quantity => "quantity",
            CanonicalField::LcNumber => "lc_number",
            CanonicalField::Department => "department",
            CanonicalField::Month => "month",
            CanonicalField::AllocatedDays => "allocated_days",
            CanonicalField::TotalCost => "total_cost",
            CanonicalField::EventCategory => "event_category",
            CanonicalField::ParentEvent => "parent_event",
            CanonicalField::EventStart => "event_start",
            CanonicalField::EventEnd => "event_end",
            CanonicalField::DurationHours => "duration_hours",
            CanonicalField::ManifestId => "manifest_id",
            CanonicalField::ManifestDate => "manifest_date",
            CanonicalField::Origin => "origin",
            CanonicalField::Destination => "destination",
            CanonicalField::CargoType => "cargo_type",
            CanonicalField::WeightLbs => "weight_lbs",
            CanonicalField::TransferId => "transfer_id",
            CanonicalField::ActionDate => "action_date",
            CanonicalField::FluidType => "fluid_type",
            CanonicalField::Direction => "direction",
            CanonicalField::Unit => "unit",
            CanonicalField::RigName => "rig_name",
            CanonicalField::WellName => "well_name",
            CanonicalField::Activity => "activity",
            CanonicalField::StartDate => "start_date",
            CanonicalField::EndDate => "end_date",
            CanonicalField::DurationDays => "duration_days",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// True for cells that carry no value.
pub fn is_absent_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || ABSENT_MARKERS
            .iter()
            .any(|m| trimmed.eq_ignore_ascii_case(m))
}

fn header_key(header: &str) -> String {
    header
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

pub struct FieldExtractor;

impl FieldExtractor {
    /// First present value among the canonical field's aliases.
    pub fn extract(&self, row: &RawRow, field: CanonicalField) -> Option<String> {
        self.extract_with_aliases(row, field.aliases())
    }

    /// Same rule over an explicit alias list.
    pub fn extract_with_aliases(&self, row: &RawRow, aliases: &[&str]) -> Option<String> {
        let mut loose: Option<HashMap<String, &String>> = None;

        for alias in aliases {
            if let Some(v) = row.get(*alias) {
                if !is_absent_value(v) {
                    return Some(v.trim().to_string());
                }
                continue;
            }
            // header spelled differently ("LC number", "Rig  Location")
            let index = loose.get_or_insert_with(|| {
                row.iter().map(|(k, v)| (header_key(k), v)).collect()
            });
            if let Some(v) = index.get(&header_key(alias)) {
                if !is_absent_value(v) {
                    return Some(v.trim().to_string());
                }
            }
        }
        None
    }
}
