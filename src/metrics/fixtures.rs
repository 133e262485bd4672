// Record builders for metric unit tests.

use crate::config::PipelineRules;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::records::{
    BulkActionRecord, CostAllocationRecord, FacilitySource, ManifestRecord, VesselIdentity,
    VoyageEventRecord,
};
use crate::domain::types::{
    ClassificationBasis, CostClassification, FluidCategory, LcClassification, TimeClass,
    TransferDirection, YearMonth,
};
use chrono::NaiveDate;

pub fn catalog() -> ReferenceCatalog {
    ReferenceCatalog::builtin().unwrap()
}

pub fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

pub fn fleet_vessel(id: &str) -> Option<VesselIdentity> {
    Some(VesselIdentity::Resolved {
        vessel_id: id.to_string(),
        in_fleet: true,
    })
}

pub fn event(
    facility: Option<&str>,
    month: YearMonth,
    hours: f64,
    time_class: TimeClass,
    npt_eligible: bool,
) -> VoyageEventRecord {
    VoyageEventRecord {
        row_number: 1,
        voyage_number: None,
        event_start: Some(month.first_day().and_hms_opt(0, 0, 0).unwrap()),
        event_end: None,
        month: Some(month),
        location_text: facility.map(String::from),
        facility_id: facility.map(String::from),
        vessel: fleet_vessel("pelican-island"),
        event_category: "Waiting on Installation".to_string(),
        parent_event: None,
        duration_hours: Some(hours),
        time_class,
        npt_eligible,
    }
}

pub fn bulk(
    facility: Option<&str>,
    fluid: &str,
    rules: &PipelineRules,
    direction: TransferDirection,
    quantity: f64,
) -> BulkActionRecord {
    BulkActionRecord {
        row_number: 1,
        transfer_id: None,
        action_date: NaiveDate::from_ymd_opt(2024, 1, 10).and_then(|d| d.and_hms_opt(8, 0, 0)),
        month: YearMonth::new(2024, 1),
        vessel: fleet_vessel("harvey-carrier"),
        location_text: facility.map(String::from),
        facility_id: facility.map(String::from),
        fluid_type: Some(fluid.to_string()),
        fluid_category: Some(if rules.is_fuel(fluid) {
            FluidCategory::Fuel
        } else {
            FluidCategory::ProductionChemical
        }),
        direction,
        quantity: Some(quantity),
        unit: Some("bbl".to_string()),
    }
}

pub fn manifest(vessel: &str, facility: &str, month: YearMonth, voyage: &str) -> ManifestRecord {
    ManifestRecord {
        row_number: 1,
        manifest_id: None,
        voyage_number: Some(voyage.to_string()),
        manifest_date: Some(month.first_day().and_hms_opt(6, 0, 0).unwrap()),
        month: Some(month),
        vessel: fleet_vessel(vessel),
        origin_text: Some("Fourchon".to_string()),
        destination_text: facility.to_string(),
        facility_id: Some(facility.to_string()),
        is_offshore_destination: true,
        cargo_type: None,
        quantity: None,
        weight_lbs: None,
    }
}

pub fn cost(
    facility: Option<&str>,
    month: YearMonth,
    days: f64,
    total: f64,
    classification: CostClassification,
) -> CostAllocationRecord {
    CostAllocationRecord {
        row_number: 1,
        lc_number: "10140".to_string(),
        location_text: facility.map(String::from),
        facility_id: facility.map(String::from),
        facility_source: if facility.is_some() {
            FacilitySource::LcOwner
        } else {
            FacilitySource::None
        },
        lc_classification: LcClassification::Drilling,
        classification,
        classification_basis: ClassificationBasis::Direct,
        department: None,
        month: Some(month),
        allocated_days: Some(days),
        total_cost: Some(total),
        average_daily_rate: if days > 0.0 { Some(total / days) } else { None },
    }
}
