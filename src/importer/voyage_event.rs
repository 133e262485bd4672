// ==========================================
// Offshore Logistics - Voyage Event Normalizer
// ==========================================
// Time attribution:
//   - weather marker in category or parent event → WeatherImpact
//   - else category in the waiting set → NonWeatherWaiting
//   - else Other
// Weather wins, so an event is never counted in both metrics
// Duration: explicit hours column, else end - start
// ==========================================

use crate::config::PipelineRules;
use crate::domain::diagnostics::DiagnosticKind;
use crate::domain::records::VoyageEventRecord;
use crate::domain::types::{SourceType, TimeClass, YearMonth};
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::CanonicalField;
use crate::importer::normalizer::{NormalizeContext, RecordNormalizer, RowReader};

pub struct VoyageEventNormalizer;

/// Waiting / weather / other, from category and parent event text.
pub fn classify_time(rules: &PipelineRules, category: &str, parent_event: Option<&str>) -> TimeClass {
    let weather = rules.has_weather_marker(category)
        || parent_event.map(|p| rules.has_weather_marker(p)).unwrap_or(false);
    if weather {
        TimeClass::WeatherImpact
    } else if rules.is_waiting_category(category) {
        TimeClass::NonWeatherWaiting
    } else {
        TimeClass::Other
    }
}

impl RecordNormalizer for VoyageEventNormalizer {
    type Record = VoyageEventRecord;

    fn source_type(&self) -> SourceType {
        SourceType::VoyageEvent
    }

    fn normalize_row(
        &self,
        reader: &mut RowReader<'_>,
        ctx: &NormalizeContext<'_>,
    ) -> ImportResult<VoyageEventRecord> {
        let event_category = reader.required(CanonicalField::EventCategory)?;
        let parent_event = reader.text(CanonicalField::ParentEvent);
        let voyage_number = reader.text(CanonicalField::VoyageNumber);
        let event_start = reader.datetime(CanonicalField::EventStart, true);
        let event_end = reader.datetime(CanonicalField::EventEnd, false);

        let duration_hours = match reader.number(CanonicalField::DurationHours, false) {
            Some(hours) => Some(hours),
            None => match (event_start, event_end) {
                (Some(start), Some(end)) if end >= start => {
                    Some((end - start).num_seconds() as f64 / 3600.0)
                }
                _ => {
                    reader.push(
                        DiagnosticKind::FieldAbsent,
                        Some(CanonicalField::DurationHours),
                        "no duration and no usable start/end pair",
                    );
                    None
                }
            },
        };

        let location_text = reader.expected(CanonicalField::Location);
        let facility_id = reader.facility(ctx, CanonicalField::Location, location_text.as_deref());
        let vessel = reader.vessel(ctx);

        let time_class = classify_time(ctx.rules, &event_category, parent_event.as_deref());
        let npt_eligible = ctx.rules.is_npt_category(&event_category);

        Ok(VoyageEventRecord {
            row_number: reader.row_number(),
            voyage_number,
            event_start,
            event_end,
            month: event_start.map(|t| YearMonth::from_date(t.date())),
            location_text,
            facility_id,
            vessel,
            event_category,
            parent_event,
            duration_hours,
            time_class,
            npt_eligible,
        })
    }
}
