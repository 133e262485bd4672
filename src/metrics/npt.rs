// ==========================================
// Offshore Logistics - NPT Calculator
// ==========================================
// Sum of durations of NPT-eligible voyage events, grouped by
// resolved facility and month
// Events without a duration contribute nothing
// ==========================================

use crate::domain::metric::{MetricName, MetricResult, ScopeFilter};
use crate::domain::records::NormalizedDataset;
use crate::metrics::{facility_gate, BucketAccumulator, BucketKey, MetricCalculator, MetricContext};

pub struct NptCalculator;

impl MetricCalculator for NptCalculator {
    fn metric(&self) -> MetricName {
        MetricName::NonProductiveTime
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        _ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let mut acc = BucketAccumulator::default();

        for event in dataset.voyage_events.iter().filter(|e| e.npt_eligible) {
            let Some(hours) = event.duration_hours else {
                continue;
            };
            if !filter.accepts_month(event.month)
                || !filter.accepts_vessel(event.vessel.as_ref().and_then(|v| v.vessel_id()))
            {
                continue;
            }
            match facility_gate(filter, event.facility_id.as_deref()) {
                Ok(Some(facility_id)) => {
                    acc.add(BucketKey::facility_month(facility_id, event.month), hours)
                }
                Ok(None) => acc.add_unattributed(hours),
                Err(()) => {}
            }
        }

        acc.finish(MetricResult::new(self.metric(), filter).with_exclusion("npt-eligible categories only"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineRules;
    use crate::domain::types::TimeClass;
    use crate::metrics::fixtures::{catalog, event, ym};

    #[test]
    fn test_npt_groups_by_facility_and_month() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            voyage_events: vec![
                event(Some("argos"), ym(2024, 1), 4.0, TimeClass::NonWeatherWaiting, true),
                event(Some("argos"), ym(2024, 1), 2.0, TimeClass::WeatherImpact, true),
                event(Some("argos"), ym(2024, 2), 1.5, TimeClass::NonWeatherWaiting, true),
                event(Some("na-kika"), ym(2024, 1), 9.0, TimeClass::Other, false),
                event(None, ym(2024, 1), 3.0, TimeClass::NonWeatherWaiting, true),
            ],
            ..Default::default()
        };

        let result = NptCalculator.compute(&dataset, &ScopeFilter::all(), &ctx);
        assert_eq!(result.value, 7.5);
        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[0].month, Some(ym(2024, 1)));
        assert_eq!(result.breakdown[0].value, 6.0);
        assert_eq!(result.unattributed_value, 3.0);
    }

    #[test]
    fn test_npt_facility_filter_drops_unresolved() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            voyage_events: vec![
                event(Some("argos"), ym(2024, 1), 4.0, TimeClass::Other, true),
                event(None, ym(2024, 1), 3.0, TimeClass::Other, true),
            ],
            ..Default::default()
        };

        let result = NptCalculator.compute(&dataset, &ScopeFilter::for_facility("argos"), &ctx);
        assert_eq!(result.value, 4.0);
        assert_eq!(result.unattributed_count, 0);
    }
}
