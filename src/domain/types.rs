// ==========================================
// Offshore Logistics - Domain Types
// ==========================================
// Scope: value types and classification enums shared by the
// normalizers, resolvers and metric calculators
// ==========================================

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// YearMonth - month bucket
// ==========================================
// Serialized as "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following calendar month.
    pub fn succ(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Every month from `start` to `end`, both inclusive. Empty when start > end.
    pub fn range_inclusive(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = start;
        while current <= end {
            months.push(current);
            current = current.succ();
        }
        months
    }

    pub fn first_day(&self) -> NaiveDate {
        // month is validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("invalid month bucket: {}", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in month bucket: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in month bucket: {}", s))?;
        YearMonth::new(year, month).ok_or_else(|| format!("month out of range: {}", s))
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ==========================================
// SourceType - raw export families
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    CostAllocation,
    VoyageEvent,
    Manifest,
    BulkAction,
    RigSchedule,
}

impl SourceType {
    pub const ALL: [SourceType; 5] = [
        SourceType::CostAllocation,
        SourceType::VoyageEvent,
        SourceType::Manifest,
        SourceType::BulkAction,
        SourceType::RigSchedule,
    ];
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::CostAllocation => write!(f, "cost_allocation"),
            SourceType::VoyageEvent => write!(f, "voyage_event"),
            SourceType::Manifest => write!(f, "manifest"),
            SourceType::BulkAction => write!(f, "bulk_action"),
            SourceType::RigSchedule => write!(f, "rig_schedule"),
        }
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "cost_allocation" | "cost_allocations" | "costs" => Ok(SourceType::CostAllocation),
            "voyage_event" | "voyage_events" | "events" => Ok(SourceType::VoyageEvent),
            "manifest" | "manifests" => Ok(SourceType::Manifest),
            "bulk_action" | "bulk_actions" | "bulk" => Ok(SourceType::BulkAction),
            "rig_schedule" | "rig_schedules" | "schedule" => Ok(SourceType::RigSchedule),
            _ => Err(format!("unknown source type: {}", s)),
        }
    }
}

// ==========================================
// FacilityType
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FacilityType {
    DrillingRig,
    ProductionPlatform,
    Integrated,
}

impl FacilityType {
    /// Production platforms and integrated facilities host production operations.
    pub fn is_production(&self) -> bool {
        matches!(self, FacilityType::ProductionPlatform | FacilityType::Integrated)
    }

    pub fn is_drilling(&self) -> bool {
        matches!(self, FacilityType::DrillingRig | FacilityType::Integrated)
    }
}

impl fmt::Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityType::DrillingRig => write!(f, "drilling-rig"),
            FacilityType::ProductionPlatform => write!(f, "production-platform"),
            FacilityType::Integrated => write!(f, "integrated"),
        }
    }
}

// ==========================================
// VesselClass
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselClass {
    Psv,
    Osv,
    Fast,
    #[serde(other)]
    Other,
}

// ==========================================
// LcClassification - classifier output
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LcClassification {
    Drilling,
    Production,
    /// LC present in both pools of one facility (reference-data defect)
    Ambiguous,
    Unknown,
}

impl fmt::Display for LcClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LcClassification::Drilling => write!(f, "drilling"),
            LcClassification::Production => write!(f, "production"),
            LcClassification::Ambiguous => write!(f, "ambiguous"),
            LcClassification::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// CostClassification - stored on cost records
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostClassification {
    Drilling,
    Production,
    Ambiguous,
    Unclassified,
}

impl fmt::Display for CostClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostClassification::Drilling => write!(f, "drilling"),
            CostClassification::Production => write!(f, "production"),
            CostClassification::Ambiguous => write!(f, "ambiguous"),
            CostClassification::Unclassified => write!(f, "unclassified"),
        }
    }
}

/// How a cost classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationBasis {
    /// LC lookup against the facility's pools
    Direct,
    /// LC unknown to the facility, department column used instead
    DepartmentFallback,
    None,
}

// ==========================================
// FluidCategory / TransferDirection (bulk actions)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidCategory {
    Fuel,
    ProductionChemical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferDirection {
    Onload,
    Offload,
    Unknown,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferDirection::Onload => write!(f, "onload"),
            TransferDirection::Offload => write!(f, "offload"),
            TransferDirection::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// TimeClass - voyage event time attribution
// ==========================================
// Weather wins over waiting: an event is never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeClass {
    NonWeatherWaiting,
    WeatherImpact,
    Other,
}
