// ==========================================
// Offshore Logistics - Reference Catalog
// ==========================================
// Scope: facility and vessel reference data, validated once at
// load time and read-only afterwards
// Invariant: a facility's drilling and production LC pools never
// intersect; a violation is kept as an integrity defect (not
// repaired) so the classifier can report it as ambiguous
// ==========================================

use crate::domain::types::{FacilityType, VesselClass};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;
use tracing::{info, warn};

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/reference_catalog.json");

// ==========================================
// CatalogError - catalog load failure (fatal)
// ==========================================
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog file not found: {0}")]
    FileNotFound(String),

    #[error("catalog read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("catalog JSON invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("catalog contains no facilities")]
    Empty,

    #[error("duplicate facility id: {0}")]
    DuplicateFacilityId(String),

    #[error("duplicate vessel id: {0}")]
    DuplicateVesselId(String),

    #[error("invalid facility {facility_id}: {message}")]
    InvalidFacility {
        facility_id: String,
        message: String,
    },

    #[error("invalid vessel {vessel_id}: {message}")]
    InvalidVessel { vessel_id: String, message: String },
}

// ==========================================
// Facility
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: String,
    pub display_name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub facility_type: FacilityType,
    #[serde(default)]
    pub drilling_lcs: BTreeSet<String>,
    #[serde(default)]
    pub production_lcs: BTreeSet<String>,
    #[serde(default)]
    pub region: String,
}

impl Facility {
    /// LC codes present in both pools.
    pub fn lc_overlap(&self) -> BTreeSet<String> {
        self.drilling_lcs
            .intersection(&self.production_lcs)
            .cloned()
            .collect()
    }

    /// Display name followed by every alias.
    pub fn match_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.display_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn owns_lc(&self, lc: &str) -> bool {
        self.drilling_lcs.contains(lc) || self.production_lcs.contains(lc)
    }
}

// ==========================================
// Vessel
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub vessel_id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Owned/chartered fleet (true) vs third-party (false)
    pub in_fleet: bool,
    pub vessel_class: VesselClass,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Vessel {
    pub fn match_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// On-disk catalog shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub facilities: Vec<Facility>,
    #[serde(default)]
    pub vessels: Vec<Vessel>,
}

/// LC code assigned to both pools of one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogIntegrityDefect {
    pub facility_id: String,
    pub lc: String,
}

// ==========================================
// ReferenceCatalog
// ==========================================
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    facilities: Vec<Facility>,
    vessels: Vec<Vessel>,
    facility_index: HashMap<String, usize>,
    vessel_index: HashMap<String, usize>,
    lc_owners: BTreeMap<String, Vec<usize>>,
    integrity_defects: Vec<CatalogIntegrityDefect>,
}

impl ReferenceCatalog {
    /// Validate and index reference data.
    ///
    /// LC codes are normalized with [`normalize_lc_code`] so `"10140.0"` in a
    /// catalog behaves like `"10140"` in a cost export.
    pub fn new(facilities: Vec<Facility>, vessels: Vec<Vessel>) -> Result<Self, CatalogError> {
        if facilities.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut facility_index = HashMap::new();
        let mut normalized_facilities = Vec::with_capacity(facilities.len());
        for (idx, mut facility) in facilities.into_iter().enumerate() {
            let id = facility.facility_id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::InvalidFacility {
                    facility_id: facility.display_name.clone(),
                    message: "empty facility_id".to_string(),
                });
            }
            if facility.display_name.trim().is_empty() {
                return Err(CatalogError::InvalidFacility {
                    facility_id: id,
                    message: "empty display_name".to_string(),
                });
            }
            if facility_index.insert(id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateFacilityId(id));
            }
            facility.facility_id = id;
            facility.drilling_lcs = normalize_lc_set(&facility.drilling_lcs);
            facility.production_lcs = normalize_lc_set(&facility.production_lcs);
            normalized_facilities.push(facility);
        }

        let mut vessel_index = HashMap::new();
        let mut normalized_vessels = Vec::with_capacity(vessels.len());
        for (idx, mut vessel) in vessels.into_iter().enumerate() {
            let id = vessel.vessel_id.trim().to_string();
            if id.is_empty() {
                return Err(CatalogError::InvalidVessel {
                    vessel_id: vessel.name.clone(),
                    message: "empty vessel_id".to_string(),
                });
            }
            if vessel_index.insert(id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateVesselId(id));
            }
            vessel.vessel_id = id;
            normalized_vessels.push(vessel);
        }

        let mut lc_owners: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        let mut integrity_defects = Vec::new();
        for (idx, facility) in normalized_facilities.iter().enumerate() {
            let all_lcs: BTreeSet<&String> = facility
                .drilling_lcs
                .iter()
                .chain(facility.production_lcs.iter())
                .collect();
            for lc in all_lcs {
                lc_owners.entry(lc.clone()).or_default().push(idx);
            }
            for lc in facility.lc_overlap() {
                warn!(
                    facility_id = %facility.facility_id,
                    lc = %lc,
                    "catalog integrity defect: LC in both drilling and production pools"
                );
                integrity_defects.push(CatalogIntegrityDefect {
                    facility_id: facility.facility_id.clone(),
                    lc,
                });
            }
        }

        info!(
            facilities = normalized_facilities.len(),
            vessels = normalized_vessels.len(),
            lc_codes = lc_owners.len(),
            defects = integrity_defects.len(),
            "reference catalog loaded"
        );

        Ok(Self {
            facilities: normalized_facilities,
            vessels: normalized_vessels,
            facility_index,
            vessel_index,
            lc_owners,
            integrity_defects,
        })
    }

    pub fn from_document(document: CatalogDocument) -> Result<Self, CatalogError> {
        Self::new(document.facilities, document.vessels)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Gulf of Mexico catalog embedded at build time.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json_str(BUILTIN_CATALOG_JSON)
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn facility(&self, facility_id: &str) -> Option<&Facility> {
        self.facility_index
            .get(facility_id)
            .map(|&idx| &self.facilities[idx])
    }

    pub fn vessel(&self, vessel_id: &str) -> Option<&Vessel> {
        self.vessel_index.get(vessel_id).map(|&idx| &self.vessels[idx])
    }

    /// Facilities whose drilling or production pool contains `lc` (normalized).
    pub fn lc_owners(&self, lc: &str) -> Vec<&Facility> {
        self.lc_owners
            .get(lc)
            .map(|owners| owners.iter().map(|&idx| &self.facilities[idx]).collect())
            .unwrap_or_default()
    }

    pub fn integrity_defects(&self) -> &[CatalogIntegrityDefect] {
        &self.integrity_defects
    }

    /// Active in-fleet vessel ids, in catalog order.
    pub fn active_fleet_ids(&self) -> Vec<String> {
        self.vessels
            .iter()
            .filter(|v| v.in_fleet && v.active)
            .map(|v| v.vessel_id.clone())
            .collect()
    }
}

// ==========================================
// LC code normalization
// ==========================================

/// Canonical LC code: trimmed, upper-cased, inner spaces removed, and a
/// spreadsheet float suffix (`"10140.0"`) dropped. Empty input yields None.
pub fn normalize_lc_code(raw: &str) -> Option<String> {
    let mut code: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    if let Some(stripped) = code.strip_suffix(".0") {
        if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
            code = stripped.to_string();
        }
    }
    if code.is_empty() {
        None
    } else {
        Some(code)
    }
}

fn normalize_lc_set(codes: &BTreeSet<String>) -> BTreeSet<String> {
    codes.iter().filter_map(|c| normalize_lc_code(c)).collect()
}
