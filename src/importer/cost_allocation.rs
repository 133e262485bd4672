// ==========================================
// Offshore Logistics - Cost Allocation Normalizer
// ==========================================
// Facility precedence:
//   1. LC owned by exactly one facility → that facility
//      (location text pointing elsewhere → LocationConflict)
//   2. LC owned by several facilities → location text picks one
//      of the owners, otherwise unresolved
//   3. LC owned by nobody → location text
// Classification: LC pools of the resolved facility; unknown may
// fall back to the department column, always tagged as fallback
// ==========================================

use crate::domain::catalog::normalize_lc_code;
use crate::domain::diagnostics::DiagnosticKind;
use crate::domain::records::{CostAllocationRecord, FacilitySource};
use crate::domain::types::{LcClassification, SourceType};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::CanonicalField;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};

pub struct CostAllocationNormalizer;

impl CostAllocationNormalizer {
    fn resolve_facility(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
        lc: &str,
        location_text: Option<&str>,
    ) -> (Option<String>, FacilitySource) {
        let owners = ctx.catalog.lc_owners(lc);

        match owners.as_slice() {
            [owner] => {
                if let Some(text) = location_text {
                    if let Some(located) = ctx.locations.resolve(text).facility_id() {
                        if located != owner.facility_id {
                            reader.push(
                                DiagnosticKind::LocationConflict,
                                Some(CanonicalField::Location),
                                format!(
                                    "LC {} belongs to {} but location '{}' resolves to {}",
                                    lc, owner.facility_id, text, located
                                ),
                            );
                        }
                    }
                }
                (Some(owner.facility_id.clone()), FacilitySource::LcOwner)
            }
            [] => match reader.facility(ctx, CanonicalField::Location, location_text) {
                Some(id) => (Some(id), FacilitySource::Location),
                None => (None, FacilitySource::None),
            },
            several => {
                let located = location_text.and_then(|t| {
                    ctx.locations
                        .resolve(t)
                        .facility_id()
                        .map(str::to_string)
                });
                match located {
                    Some(id) if several.iter().any(|f| f.facility_id == id) => {
                        (Some(id), FacilitySource::Location)
                    }
                    _ => {
                        let candidates: Vec<&str> =
                            several.iter().map(|f| f.facility_id.as_str()).collect();
                        reader.push(
                            DiagnosticKind::UnresolvedLocation,
                            Some(CanonicalField::Location),
                            format!(
                                "LC {} is shared by [{}] and the location does not pick one",
                                lc,
                                candidates.join(", ")
                            ),
                        );
                        (None, FacilitySource::None)
                    }
                }
            }
        }
    }
}

impl RecordNormalizer for CostAllocationNormalizer {
    type Record = CostAllocationRecord;

    fn source_type(&self) -> SourceType {
        SourceType::CostAllocation
    }

    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<CostAllocationRecord> {
        let raw_lc = reader.required(CanonicalField::LcNumber)?;
        let lc_number = normalize_lc_code(&raw_lc).ok_or_else(|| {
            ImportError::RequiredFieldMissing {
                row: reader.row_number(),
                field: CanonicalField::LcNumber.name().to_string(),
            }
        })?;

        let location_text = reader.expected(CanonicalField::Location);
        let department = reader.text(CanonicalField::Department);
        let month = reader.month(CanonicalField::Month, true);
        let allocated_days = reader.number(CanonicalField::AllocatedDays, true);
        let total_cost = reader.number(CanonicalField::TotalCost, false);

        let (facility_id, facility_source) =
            self.resolve_facility(reader, ctx, &lc_number, location_text.as_deref());

        let outcome = ctx.classifier.classify_with_fallback(
            &lc_number,
            facility_id.as_deref(),
            department.as_deref(),
        );
        if outcome.lc_classification == LcClassification::Ambiguous {
            reader.push(
                DiagnosticKind::AmbiguousLcClassification,
                Some(CanonicalField::LcNumber),
                format!(
                    "LC {} is in both drilling and production pools of {}",
                    lc_number,
                    facility_id.as_deref().unwrap_or("-")
                ),
            );
        }
        if outcome.fallback_used() {
            reader.push(
                DiagnosticKind::ClassificationFallback,
                Some(CanonicalField::Department),
                format!(
                    "LC {} unknown for {}, classified {} from department '{}'",
                    lc_number,
                    facility_id.as_deref().unwrap_or("-"),
                    outcome.classification,
                    department.as_deref().unwrap_or("")
                ),
            );
        }

        let average_daily_rate = match (total_cost, allocated_days) {
            (Some(cost), Some(days)) if days > 0.0 => Some(cost / days),
            _ => None,
        };

        Ok(CostAllocationRecord {
            row_number: reader.row_number(),
            lc_number,
            location_text,
            facility_id,
            facility_source,
            lc_classification: outcome.lc_classification,
            classification: outcome.classification,
            classification_basis: outcome.basis,
            department,
            month,
            allocated_days,
            total_cost,
            average_daily_rate,
        })
    }
}
