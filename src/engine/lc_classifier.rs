// ==========================================
// Offshore Logistics - LC Classifier
// ==========================================
// Scope: LC code → drilling / production pool of a facility
// Rule:
//   - in exactly one pool → that pool
//   - in both pools → ambiguous (reference-data defect, logged)
//   - in neither / facility unknown → unknown
// The department fallback is a separate, explicit step and is
// always reported with ClassificationBasis::DepartmentFallback.
// ==========================================

use crate::domain::catalog::{normalize_lc_code, ReferenceCatalog};
use crate::domain::types::{ClassificationBasis, CostClassification, LcClassification};
use crate::engine::text_match::contains_any_phrase;
use tracing::{debug, info, warn};

const DRILLING_DEPARTMENT_MARKERS: &[&str] = &["drilling", "drill", "d c", "completions", "wells"];
const PRODUCTION_DEPARTMENT_MARKERS: &[&str] = &["production", "prod", "operations", "ops"];

/// Full classification decision for one cost record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationOutcome {
    pub lc_classification: LcClassification,
    pub classification: CostClassification,
    pub basis: ClassificationBasis,
}

impl ClassificationOutcome {
    pub fn fallback_used(&self) -> bool {
        self.basis == ClassificationBasis::DepartmentFallback
    }
}

pub struct LcClassifier<'a> {
    catalog: &'a ReferenceCatalog,
}

impl<'a> LcClassifier<'a> {
    pub fn new(catalog: &'a ReferenceCatalog) -> Self {
        Self { catalog }
    }

    /// Classify `lc` against the pools of `facility_id`.
    pub fn classify(&self, lc: &str, facility_id: &str) -> LcClassification {
        let Some(code) = normalize_lc_code(lc) else {
            return LcClassification::Unknown;
        };
        let Some(facility) = self.catalog.facility(facility_id) else {
            debug!(facility_id = %facility_id, "classify: facility not in catalog");
            return LcClassification::Unknown;
        };

        let in_drilling = facility.drilling_lcs.contains(&code);
        let in_production = facility.production_lcs.contains(&code);
        match (in_drilling, in_production) {
            (true, false) => LcClassification::Drilling,
            (false, true) => LcClassification::Production,
            (true, true) => {
                warn!(
                    facility_id = %facility_id,
                    lc = %code,
                    "ambiguous LC classification: code in both drilling and production pools"
                );
                LcClassification::Ambiguous
            }
            (false, false) => LcClassification::Unknown,
        }
    }

    /// Direct classification, then the department fallback for `unknown` only.
    ///
    /// An ambiguous code is never coerced by the department column.
    pub fn classify_with_fallback(
        &self,
        lc: &str,
        facility_id: Option<&str>,
        department: Option<&str>,
    ) -> ClassificationOutcome {
        let direct = facility_id
            .map(|id| self.classify(lc, id))
            .unwrap_or(LcClassification::Unknown);

        let (classification, basis) = match direct {
            LcClassification::Drilling => (CostClassification::Drilling, ClassificationBasis::Direct),
            LcClassification::Production => {
                (CostClassification::Production, ClassificationBasis::Direct)
            }
            LcClassification::Ambiguous => {
                (CostClassification::Ambiguous, ClassificationBasis::Direct)
            }
            LcClassification::Unknown => match department.and_then(department_fallback) {
                Some(fallback) => {
                    info!(
                        lc = %lc,
                        facility_id = ?facility_id,
                        department = ?department,
                        classification = %fallback,
                        "fallback: LC unknown, classified from department"
                    );
                    (fallback, ClassificationBasis::DepartmentFallback)
                }
                None => (CostClassification::Unclassified, ClassificationBasis::None),
            },
        };

        ClassificationOutcome {
            lc_classification: direct,
            classification,
            basis,
        }
    }
}

/// Department/category text → cost pool, when it names exactly one.
pub fn department_fallback(department: &str) -> Option<CostClassification> {
    let drilling = contains_any_phrase(department, DRILLING_DEPARTMENT_MARKERS);
    let production = contains_any_phrase(department, PRODUCTION_DEPARTMENT_MARKERS);
    match (drilling, production) {
        (true, false) => Some(CostClassification::Drilling),
        (false, true) => Some(CostClassification::Production),
        _ => None,
    }
}
