// ==========================================
// Offshore Logistics - Normalized Records
// ==========================================
// Scope: one normalized entity per raw row, per source type
// Invariant: records are created once by their normalizer and
// never mutated afterwards; metric calculators only read them
// ==========================================

use crate::domain::types::{
    ClassificationBasis, CostClassification, FluidCategory, LcClassification, SourceType,
    TimeClass, TransferDirection, YearMonth,
};
use crate::engine::text_match::normalize_text;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// VesselIdentity
// ==========================================
// Unresolved names are kept (third-party/unknown) so totals
// reconcile with raw row counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VesselIdentity {
    Resolved { vessel_id: String, in_fleet: bool },
    Unresolved { raw_name: String },
}

impl VesselIdentity {
    pub fn vessel_id(&self) -> Option<&str> {
        match self {
            VesselIdentity::Resolved { vessel_id, .. } => Some(vessel_id),
            VesselIdentity::Unresolved { .. } => None,
        }
    }

    /// Unresolved vessels count as third-party.
    pub fn is_in_fleet(&self) -> bool {
        matches!(self, VesselIdentity::Resolved { in_fleet: true, .. })
    }
}

/// Where a record's facility attribution came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilitySource {
    /// LC code owned by exactly one facility (or picked among owners by location)
    LcOwner,
    Location,
    None,
}

// ==========================================
// CostAllocationRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostAllocationRecord {
    pub row_number: usize,
    pub lc_number: String,
    pub location_text: Option<String>,
    pub facility_id: Option<String>,
    pub facility_source: FacilitySource,
    pub lc_classification: LcClassification, // classifier output before any fallback
    pub classification: CostClassification,
    pub classification_basis: ClassificationBasis,
    pub department: Option<String>,
    pub month: Option<YearMonth>,
    pub allocated_days: Option<f64>,
    pub total_cost: Option<f64>,
    pub average_daily_rate: Option<f64>, // total_cost / allocated_days
}

// ==========================================
// VoyageEventRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoyageEventRecord {
    pub row_number: usize,
    pub voyage_number: Option<String>,
    pub event_start: Option<NaiveDateTime>,
    pub event_end: Option<NaiveDateTime>,
    pub month: Option<YearMonth>,
    pub location_text: Option<String>,
    pub facility_id: Option<String>,
    pub vessel: Option<VesselIdentity>,
    pub event_category: String,
    pub parent_event: Option<String>,
    pub duration_hours: Option<f64>,
    pub time_class: TimeClass,
    pub npt_eligible: bool,
}

impl VoyageEventRecord {
    /// Voyage + category + start, when a voyage number exists.
    pub fn business_key(&self) -> Option<String> {
        let voyage = self.voyage_number.as_ref()?;
        let start = self
            .event_start
            .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default();
        Some(format!(
            "{}|{}|{}",
            normalize_text(voyage),
            normalize_text(&self.event_category),
            start
        ))
    }
}

// ==========================================
// ManifestRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub row_number: usize,
    pub manifest_id: Option<String>,
    pub voyage_number: Option<String>,
    pub manifest_date: Option<NaiveDateTime>,
    pub month: Option<YearMonth>,
    pub vessel: Option<VesselIdentity>,
    pub origin_text: Option<String>,
    pub destination_text: String,
    pub facility_id: Option<String>,
    pub is_offshore_destination: bool,
    pub cargo_type: Option<String>,
    pub quantity: Option<f64>,
    pub weight_lbs: Option<f64>,
}

impl ManifestRecord {
    /// Identity of one delivery: voyage number, else manifest id, else the day.
    pub fn delivery_key(&self) -> String {
        if let Some(voyage) = &self.voyage_number {
            return format!("voyage:{}", normalize_text(voyage));
        }
        if let Some(manifest) = &self.manifest_id {
            return format!("manifest:{}", normalize_text(manifest));
        }
        match self.manifest_date {
            Some(ts) => format!("date:{}", ts.date()),
            None => format!("row:{}", self.row_number),
        }
    }

    /// Manifest id + cargo line, when a manifest id exists.
    pub fn business_key(&self) -> Option<String> {
        let manifest = self.manifest_id.as_ref()?;
        Some(format!(
            "{}|{}",
            normalize_text(manifest),
            self.cargo_type
                .as_deref()
                .map(normalize_text)
                .unwrap_or_default()
        ))
    }
}

// ==========================================
// BulkActionRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkActionRecord {
    pub row_number: usize,
    pub transfer_id: Option<String>,
    pub action_date: Option<NaiveDateTime>,
    pub month: Option<YearMonth>,
    pub vessel: Option<VesselIdentity>,
    pub location_text: Option<String>,
    pub facility_id: Option<String>,
    pub fluid_type: Option<String>,
    pub fluid_category: Option<FluidCategory>,
    pub direction: TransferDirection,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

impl BulkActionRecord {
    /// Identity of the physical transfer, shared by its onload and offload
    /// rows. Only a recorded transfer id identifies a transfer; rows
    /// without one are separate transfers even when their content matches.
    pub fn transfer_key(&self) -> Option<String> {
        self.transfer_id
            .as_deref()
            .map(|id| format!("transfer:{}", normalize_text(id)))
    }

    /// Transfer id + direction, when a transfer id exists.
    pub fn business_key(&self) -> Option<String> {
        let id = self.transfer_id.as_ref()?;
        Some(format!("{}|{}", normalize_text(id), self.direction))
    }
}

// ==========================================
// RigScheduleRecord
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RigScheduleRecord {
    pub row_number: usize,
    pub rig_name: String,
    pub rig_facility_id: Option<String>,
    pub location_text: Option<String>,
    pub facility_id: Option<String>,
    pub well_name: Option<String>,
    pub activity: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub duration_days: Option<f64>,
}

impl RigScheduleRecord {
    /// Month buckets touched by the scheduled interval.
    pub fn months_active(&self) -> Vec<YearMonth> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start <= end => {
                YearMonth::range_inclusive(YearMonth::from_date(start), YearMonth::from_date(end))
            }
            (Some(start), None) => vec![YearMonth::from_date(start)],
            _ => Vec::new(),
        }
    }
}

// ==========================================
// NormalizedEntities / NormalizedDataset
// ==========================================

/// Output of one `normalize` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "source_type", content = "records", rename_all = "snake_case")]
pub enum NormalizedEntities {
    CostAllocation(Vec<CostAllocationRecord>),
    VoyageEvent(Vec<VoyageEventRecord>),
    Manifest(Vec<ManifestRecord>),
    BulkAction(Vec<BulkActionRecord>),
    RigSchedule(Vec<RigScheduleRecord>),
}

impl NormalizedEntities {
    pub fn source_type(&self) -> SourceType {
        match self {
            NormalizedEntities::CostAllocation(_) => SourceType::CostAllocation,
            NormalizedEntities::VoyageEvent(_) => SourceType::VoyageEvent,
            NormalizedEntities::Manifest(_) => SourceType::Manifest,
            NormalizedEntities::BulkAction(_) => SourceType::BulkAction,
            NormalizedEntities::RigSchedule(_) => SourceType::RigSchedule,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NormalizedEntities::CostAllocation(r) => r.len(),
            NormalizedEntities::VoyageEvent(r) => r.len(),
            NormalizedEntities::Manifest(r) => r.len(),
            NormalizedEntities::BulkAction(r) => r.len(),
            NormalizedEntities::RigSchedule(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All normalized collections of one ingestion run; input to the metric calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizedDataset {
    pub cost_allocations: Vec<CostAllocationRecord>,
    pub voyage_events: Vec<VoyageEventRecord>,
    pub manifests: Vec<ManifestRecord>,
    pub bulk_actions: Vec<BulkActionRecord>,
    pub rig_schedule: Vec<RigScheduleRecord>,
}

impl NormalizedDataset {
    pub fn absorb(&mut self, entities: NormalizedEntities) {
        match entities {
            NormalizedEntities::CostAllocation(r) => self.cost_allocations.extend(r),
            NormalizedEntities::VoyageEvent(r) => self.voyage_events.extend(r),
            NormalizedEntities::Manifest(r) => self.manifests.extend(r),
            NormalizedEntities::BulkAction(r) => self.bulk_actions.extend(r),
            NormalizedEntities::RigSchedule(r) => self.rig_schedule.extend(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(voyage: Option<&str>, manifest_id: Option<&str>) -> ManifestRecord {
        ManifestRecord {
            row_number: 4,
            manifest_id: manifest_id.map(String::from),
            voyage_number: voyage.map(String::from),
            manifest_date: NaiveDate::from_ymd_opt(2024, 2, 3)
                .and_then(|d| d.and_hms_opt(6, 0, 0)),
            month: YearMonth::new(2024, 2),
            vessel: None,
            origin_text: None,
            destination_text: "Na Kika".to_string(),
            facility_id: Some("na-kika".to_string()),
            is_offshore_destination: true,
            cargo_type: Some("Deck Cargo".to_string()),
            quantity: Some(3.0),
            weight_lbs: None,
        }
    }

    #[test]
    fn test_vessel_identity_fleet_membership() {
        let known = VesselIdentity::Resolved {
            vessel_id: "pelican-island".to_string(),
            in_fleet: true,
        };
        let unknown = VesselIdentity::Unresolved {
            raw_name: "  Some  Tug ".to_string(),
        };
        assert_eq!(known.vessel_id(), Some("pelican-island"));
        assert!(known.is_in_fleet());
        assert!(!unknown.is_in_fleet());
        assert_eq!(unknown.vessel_id(), None);
    }

    #[test]
    fn test_manifest_delivery_key_precedence() {
        assert_eq!(manifest(Some("V-100"), Some("M1")).delivery_key(), "voyage:v 100");
        assert_eq!(manifest(None, Some("M1")).delivery_key(), "manifest:m1");
        assert_eq!(manifest(None, None).delivery_key(), "date:2024-02-03");
    }

    #[test]
    fn test_rig_schedule_months_active() {
        let record = RigScheduleRecord {
            row_number: 1,
            rig_name: "Deepwater Invictus".to_string(),
            rig_facility_id: Some("deepwater-invictus".to_string()),
            location_text: None,
            facility_id: None,
            well_name: None,
            activity: None,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 20),
            end_date: NaiveDate::from_ymd_opt(2024, 3, 2),
            duration_days: Some(42.0),
        };
        let months: Vec<String> = record.months_active().iter().map(|m| m.to_string()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);
    }

    #[test]
    fn test_dataset_absorb() {
        let mut dataset = NormalizedDataset::default();
        dataset.absorb(NormalizedEntities::Manifest(vec![manifest(None, None)]));
        assert_eq!(dataset.manifests.len(), 1);
        assert!(dataset.voyage_events.is_empty());
    }
}
