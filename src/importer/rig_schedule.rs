// ==========================================
// Offshore Logistics - Rig Schedule Normalizer
// ==========================================
// rig_facility_id: the rig itself as a catalog facility
// facility_id:     where the rig is working (location column)
// Duration: explicit days column, else end - start
// ==========================================

use crate::domain::records::RigScheduleRecord;
use crate::domain::types::SourceType;
use crate::engine::LocationResolution;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::CanonicalField;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};

pub struct RigScheduleNormalizer;

impl RecordNormalizer for RigScheduleNormalizer {
    type Record = RigScheduleRecord;

    fn source_type(&self) -> SourceType {
        SourceType::RigSchedule
    }

    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<RigScheduleRecord> {
        let rig_name = reader.required(CanonicalField::RigName)?;
        let well_name = reader.text(CanonicalField::WellName);
        let activity = reader.text(CanonicalField::Activity);
        let start_date = reader
            .datetime(CanonicalField::StartDate, true)
            .map(|t| t.date());
        let end_date = reader
            .datetime(CanonicalField::EndDate, false)
            .map(|t| t.date());

        // a third-party rig is legitimately absent from the catalog
        let rig_facility_id = match ctx.locations.resolve(&rig_name) {
            LocationResolution::Resolved { facility_id, .. } => Some(facility_id),
            LocationResolution::Unresolved { .. } => None,
        };

        let location_text = reader.text(CanonicalField::Location);
        let facility_id = match location_text.as_deref() {
            Some(text) if text != rig_name => {
                reader.facility(ctx, CanonicalField::Location, Some(text))
            }
            _ => rig_facility_id.clone(),
        };

        let duration_days = reader
            .number(CanonicalField::DurationDays, false)
            .or_else(|| match (start_date, end_date) {
                (Some(start), Some(end)) if end >= start => {
                    Some((end - start).num_days() as f64)
                }
                _ => None,
            });

        Ok(RigScheduleRecord {
            row_number: reader.row_number(),
            rig_name,
            rig_facility_id,
            location_text,
            facility_id,
            well_name,
            activity,
            start_date,
            end_date,
            duration_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineRules;
    use crate::domain::catalog::ReferenceCatalog;
    use crate::domain::types::YearMonth;
    use crate::importer::field_mapper::RawRow;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn normalize(r: &RawRow) -> RigScheduleRecord {
        let catalog = ReferenceCatalog::builtin().unwrap();
        let rules = PipelineRules::default();
        let ctx = NormalizeContext::new(&catalog, &rules);
        let mut reader = RowReader::new(r, 1, SourceType::RigSchedule);
        RigScheduleNormalizer.normalize_row(&mut reader, &ctx).unwrap()
    }

    #[test]
    fn test_rig_working_at_facility() {
        let record = normalize(&row(&[
            ("Rig Name", "Deepwater Invictus"),
            ("Location", "Mad Dog Drilling"),
            ("Well Name", "MD-14"),
            ("Start Date", "2024-01-20"),
            ("End Date", "2024-03-05"),
        ]));
        assert_eq!(record.rig_facility_id.as_deref(), Some("deepwater-invictus"));
        assert_eq!(record.facility_id.as_deref(), Some("mad-dog-drilling"));
        assert_eq!(record.duration_days, Some(45.0));
        assert_eq!(
            record.months_active(),
            vec![
                YearMonth::new(2024, 1).unwrap(),
                YearMonth::new(2024, 2).unwrap(),
                YearMonth::new(2024, 3).unwrap()
            ]
        );
    }

    #[test]
    fn test_location_defaults_to_rig() {
        let record = normalize(&row(&[("Rig", "Ocean BlackLion"), ("Start", "2024-04-01")]));
        assert_eq!(record.facility_id.as_deref(), Some("ocean-blacklion"));
        assert!(record.duration_days.is_none());
    }
}
