// ==========================================
// Offshore Logistics - Metric Results
// ==========================================
// Scope: metric names, scope filters and result projections
// Invariant: a MetricResult is always recomputed from the current
// normalized dataset; it is never an authoritative store
// ==========================================

use crate::domain::types::YearMonth;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricName {
    NonProductiveTime,
    WaitingTimeExclWeather,
    WeatherImpact,
    ProductionChemicalVolume,
    VesselDeliveryCapability,
    AllocatedDays,
    CostByClassification,
}

impl MetricName {
    pub const ALL: [MetricName; 7] = [
        MetricName::NonProductiveTime,
        MetricName::WaitingTimeExclWeather,
        MetricName::WeatherImpact,
        MetricName::ProductionChemicalVolume,
        MetricName::VesselDeliveryCapability,
        MetricName::AllocatedDays,
        MetricName::CostByClassification,
    ];

    pub fn unit(&self) -> &'static str {
        match self {
            MetricName::NonProductiveTime
            | MetricName::WaitingTimeExclWeather
            | MetricName::WeatherImpact => "hours",
            MetricName::ProductionChemicalVolume => "bbl",
            MetricName::VesselDeliveryCapability => "deliveries/month",
            MetricName::AllocatedDays => "days",
            MetricName::CostByClassification => "usd",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MetricName::NonProductiveTime => "non_productive_time",
            MetricName::WaitingTimeExclWeather => "waiting_time_excl_weather",
            MetricName::WeatherImpact => "weather_impact",
            MetricName::ProductionChemicalVolume => "production_chemical_volume",
            MetricName::VesselDeliveryCapability => "vessel_delivery_capability",
            MetricName::AllocatedDays => "allocated_days",
            MetricName::CostByClassification => "cost_by_classification",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for MetricName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        MetricName::ALL
            .iter()
            .copied()
            .find(|m| m.to_string() == key)
            .or(match key.as_str() {
                "npt" => Some(MetricName::NonProductiveTime),
                "waiting_time" => Some(MetricName::WaitingTimeExclWeather),
                "chemical_volume" => Some(MetricName::ProductionChemicalVolume),
                "delivery_capability" => Some(MetricName::VesselDeliveryCapability),
                _ => None,
            })
            .ok_or_else(|| format!("unknown metric: {}", s))
    }
}

// ==========================================
// ScopeFilter
// ==========================================
// None = no restriction on that axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeFilter {
    #[serde(default)]
    pub facility_ids: Option<BTreeSet<String>>,
    /// Analysis window; for delivery capability it is also the divisor
    #[serde(default)]
    pub months: Option<Vec<YearMonth>>,
    #[serde(default)]
    pub vessel_ids: Option<BTreeSet<String>>,
}

impl ScopeFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_facility(facility_id: &str) -> Self {
        Self {
            facility_ids: Some(std::iter::once(facility_id.to_string()).collect()),
            ..Default::default()
        }
    }

    pub fn with_months(mut self, months: Vec<YearMonth>) -> Self {
        self.months = Some(months);
        self
    }

    pub fn with_vessels<I: IntoIterator<Item = String>>(mut self, vessel_ids: I) -> Self {
        self.vessel_ids = Some(vessel_ids.into_iter().collect());
        self
    }

    /// A record with no resolved facility passes only an unrestricted filter.
    pub fn accepts_facility(&self, facility_id: Option<&str>) -> bool {
        match (&self.facility_ids, facility_id) {
            (None, _) => true,
            (Some(ids), Some(id)) => ids.contains(id),
            (Some(_), None) => false,
        }
    }

    /// A record with no month passes only an unrestricted filter.
    pub fn accepts_month(&self, month: Option<YearMonth>) -> bool {
        match (&self.months, month) {
            (None, _) => true,
            (Some(months), Some(m)) => months.contains(&m),
            (Some(_), None) => false,
        }
    }

    pub fn accepts_vessel(&self, vessel_id: Option<&str>) -> bool {
        match (&self.vessel_ids, vessel_id) {
            (None, _) => true,
            (Some(ids), Some(id)) => ids.contains(id),
            (Some(_), None) => false,
        }
    }

    /// Human-readable description of the active restrictions.
    pub fn describe(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(ids) = &self.facility_ids {
            out.push(format!(
                "facility in [{}]",
                ids.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        if let Some(months) = &self.months {
            out.push(format!(
                "month in [{}]",
                months.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(", ")
            ));
        }
        if let Some(ids) = &self.vessel_ids {
            out.push(format!(
                "vessel in [{}]",
                ids.iter().cloned().collect::<Vec<_>>().join(", ")
            ));
        }
        out
    }
}

// ==========================================
// MetricScope / MetricBucket / MetricResult
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricScope {
    FleetWide,
    Facility { facility_id: String },
    Facilities { facility_ids: Vec<String> },
    TimeWindow { months: Vec<YearMonth> },
}

impl MetricScope {
    pub fn from_filter(filter: &ScopeFilter) -> Self {
        match (&filter.facility_ids, &filter.months) {
            (Some(ids), _) if ids.len() == 1 => MetricScope::Facility {
                facility_id: ids.iter().next().cloned().unwrap_or_default(),
            },
            (Some(ids), _) => MetricScope::Facilities {
                facility_ids: ids.iter().cloned().collect(),
            },
            (None, Some(months)) => MetricScope::TimeWindow {
                months: months.clone(),
            },
            (None, None) => MetricScope::FleetWide,
        }
    }
}

/// One grouped value inside a metric result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBucket {
    pub facility_id: Option<String>,
    pub vessel_id: Option<String>,
    pub month: Option<YearMonth>,
    pub label: Option<String>,
    pub value: f64,
    pub record_count: usize,
}

impl MetricBucket {
    pub fn new(value: f64, record_count: usize) -> Self {
        Self {
            facility_id: None,
            vessel_id: None,
            month: None,
            label: None,
            value,
            record_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: MetricName,
    pub scope: MetricScope,
    pub value: f64,
    pub unit: String,
    /// Filters and exclusions actually applied, for audit
    pub applied_filters: Vec<String>,
    pub breakdown: Vec<MetricBucket>,
    /// Records that passed every filter except facility resolution
    pub unattributed_value: f64,
    pub unattributed_count: usize,
}

impl MetricResult {
    pub fn new(metric: MetricName, filter: &ScopeFilter) -> Self {
        Self {
            metric,
            scope: MetricScope::from_filter(filter),
            value: 0.0,
            unit: metric.unit().to_string(),
            applied_filters: filter.describe(),
            breakdown: Vec::new(),
            unattributed_value: 0.0,
            unattributed_count: 0,
        }
    }

    pub fn with_exclusion(mut self, description: impl Into<String>) -> Self {
        self.applied_filters.push(description.into());
        self
    }
}
