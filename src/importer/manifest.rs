// ==========================================
// Offshore Logistics - Manifest Normalizer
// ==========================================
// Destination is required; a shore-base destination (port marker)
// is kept but not offshore and carries no facility
// ==========================================

use crate::domain::records::ManifestRecord;
use crate::domain::types::{SourceType, YearMonth};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::CanonicalField;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};

pub struct ManifestNormalizer;

impl RecordNormalizer for ManifestNormalizer {
    type Record = ManifestRecord;

    fn source_type(&self) -> SourceType {
        SourceType::Manifest
    }

    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<ManifestRecord> {
        let destination_text = reader.required(CanonicalField::Destination)?;
        let manifest_id = reader.text(CanonicalField::ManifestId);
        let voyage_number = reader.text(CanonicalField::VoyageNumber);
        let manifest_date = reader.datetime(CanonicalField::ManifestDate, true);
        let origin_text = reader.text(CanonicalField::Origin);
        let cargo_type = reader.text(CanonicalField::CargoType);
        let quantity = reader.number(CanonicalField::Quantity, false);
        let weight_lbs = reader.number(CanonicalField::WeightLbs, false);
        let vessel = reader.vessel(ctx);

        let is_offshore_destination = !ctx.rules.is_port(&destination_text);
        let facility_id = if is_offshore_destination {
            reader.facility(ctx, CanonicalField::Destination, Some(&destination_text))
        } else {
            None
        };

        Ok(ManifestRecord {
            row_number: reader.row_number(),
            manifest_id,
            voyage_number,
            manifest_date,
            month: manifest_date.map(|t| YearMonth::from_date(t.date())),
            vessel,
            origin_text,
            destination_text,
            facility_id,
            is_offshore_destination,
            cargo_type,
            quantity,
            weight_lbs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineRules;
    use crate::domain::catalog::ReferenceCatalog;
    use crate::domain::diagnostics::DiagnosticKind;
    use crate::importer::field_mapper::RawRow;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn normalize(r: &RawRow) -> (ManifestRecord, Vec<DiagnosticKind>) {
        let catalog = ReferenceCatalog::builtin().unwrap();
        let rules = PipelineRules::default();
        let ctx = NormalizeContext::new(&catalog, &rules);
        let mut reader = RowReader::new(r, 1, SourceType::Manifest);
        let record = ManifestNormalizer.normalize_row(&mut reader, &ctx).unwrap();
        let kinds = reader.into_diagnostics().iter().map(|d| d.kind).collect();
        (record, kinds)
    }

    #[test]
    fn test_offshore_delivery() {
        let (record, kinds) = normalize(&row(&[
            ("Manifest Number", "MF-1001"),
            ("Voyage Number", "V-77"),
            ("Manifest Date", "2024-02-10"),
            ("Destination", "Mad Dog"),
            ("Vessel", "pelicanisland"),
            ("Weight (lbs)", "12,500"),
        ]));
        assert!(record.is_offshore_destination);
        assert_eq!(record.facility_id.as_deref(), Some("mad-dog-prod"));
        assert_eq!(record.vessel.as_ref().and_then(|v| v.vessel_id()), Some("pelican-island"));
        assert_eq!(record.weight_lbs, Some(12_500.0));
        assert_eq!(record.delivery_key(), "voyage:v 77");
        assert!(kinds.is_empty());
    }

    #[test]
    fn test_port_destination_is_not_offshore() {
        let (record, kinds) = normalize(&row(&[
            ("To", "Port Fourchon"),
            ("Vessel", "HOS Ridgewind"),
            ("Date", "2024-02-11"),
        ]));
        assert!(!record.is_offshore_destination);
        assert!(record.facility_id.is_none());
        assert!(!kinds.contains(&DiagnosticKind::UnresolvedLocation));
    }
}
