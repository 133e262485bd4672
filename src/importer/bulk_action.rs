// ==========================================
// Offshore Logistics - Bulk Action Normalizer
// ==========================================
// Quantity is required (a transfer without a volume is useless)
// Fluid tagging: fuel markers (diesel, fuel, gas oil, MGO ...)
// → Fuel, any other named fluid → ProductionChemical
// ==========================================

use crate::config::PipelineRules;
use crate::domain::records::BulkActionRecord;
use crate::domain::types::{FluidCategory, SourceType, TransferDirection, YearMonth};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::CanonicalField;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};

pub struct BulkActionNormalizer;

/// Fuel vs production chemical, case-insensitive on fluid text.
pub fn categorize_fluid(rules: &PipelineRules, fluid_type: &str) -> FluidCategory {
    if rules.is_fuel(fluid_type) {
        FluidCategory::Fuel
    } else {
        FluidCategory::ProductionChemical
    }
}

impl RecordNormalizer for BulkActionNormalizer {
    type Record = BulkActionRecord;

    fn source_type(&self) -> SourceType {
        SourceType::BulkAction
    }

    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<BulkActionRecord> {
        let quantity = reader.required_number(CanonicalField::Quantity)?;
        let transfer_id = reader.text(CanonicalField::TransferId);
        let action_date = reader.datetime(CanonicalField::ActionDate, true);
        let fluid_type = reader.expected(CanonicalField::FluidType);
        let direction = reader
            .expected(CanonicalField::Direction)
            .map(|d| DataCleaner.parse_direction(&d))
            .unwrap_or(TransferDirection::Unknown);
        let unit = reader.text(CanonicalField::Unit);
        let vessel = reader.vessel(ctx);
        let location_text = reader.expected(CanonicalField::Location);
        let facility_id = reader.facility(ctx, CanonicalField::Location, location_text.as_deref());

        let fluid_category = fluid_type
            .as_deref()
            .map(|f| categorize_fluid(ctx.rules, f));

        Ok(BulkActionRecord {
            row_number: reader.row_number(),
            transfer_id,
            action_date,
            month: action_date.map(|t| YearMonth::from_date(t.date())),
            vessel,
            location_text,
            facility_id,
            fluid_type,
            fluid_category,
            direction,
            quantity: Some(quantity),
            unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ReferenceCatalog;
    use crate::importer::error::ImportError;
    use crate::importer::field_mapper::RawRow;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn normalize(r: &RawRow) -> ImportResult<BulkActionRecord> {
        let catalog = ReferenceCatalog::builtin().unwrap();
        let rules = PipelineRules::default();
        let ctx = NormalizeContext::new(&catalog, &rules);
        let mut reader = RowReader::new(r, 1, SourceType::BulkAction);
        BulkActionNormalizer.normalize_row(&mut reader, &ctx)
    }

    #[test]
    fn test_fuel_tagging() {
        let rules = PipelineRules::default();
        assert_eq!(categorize_fluid(&rules, "Diesel"), FluidCategory::Fuel);
        assert_eq!(categorize_fluid(&rules, "DIESEL"), FluidCategory::Fuel);
        assert_eq!(categorize_fluid(&rules, "Marine Gas Oil"), FluidCategory::Fuel);
        assert_eq!(
            categorize_fluid(&rules, "Methanol"),
            FluidCategory::ProductionChemical
        );
    }

    #[test]
    fn test_offload_chemical() {
        let record = normalize(&row(&[
            ("Transfer ID", "BT-9"),
            ("Action Date", "45300"),
            ("Bulk Type", "Corrosion Inhibitor"),
            ("Action", "Offload"),
            ("Quantity", "120.5"),
            ("Unit", "bbl"),
            ("Location", "Na Kika"),
            ("Vessel", "Harvey Carrier"),
        ]))
        .unwrap();
        assert_eq!(record.direction, TransferDirection::Offload);
        assert_eq!(record.fluid_category, Some(FluidCategory::ProductionChemical));
        assert_eq!(record.facility_id.as_deref(), Some("na-kika"));
        assert_eq!(record.quantity, Some(120.5));
        assert_eq!(record.month, YearMonth::new(2024, 1));
    }

    #[test]
    fn test_missing_quantity_rejects() {
        let result = normalize(&row(&[("Bulk Type", "Methanol"), ("Action", "Offload")]));
        assert!(matches!(result, Err(ImportError::RequiredFieldMissing { .. })));

        let result = normalize(&row(&[("Quantity", "lots")]));
        assert!(matches!(result, Err(ImportError::TypeConversionError { .. })));
    }
}
