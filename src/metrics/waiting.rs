// ==========================================
// Offshore Logistics - Waiting Time / Weather Impact
// ==========================================
// Both metrics read the TimeClass fixed at normalization, so
// an event lands in at most one of them
// ==========================================

use crate::domain::metric::{MetricName, MetricResult, ScopeFilter};
use crate::domain::records::NormalizedDataset;
use crate::domain::types::TimeClass;
use crate::metrics::{facility_gate, BucketAccumulator, BucketKey, MetricCalculator, MetricContext};

/// Waiting time with weather-marked events removed.
pub struct WaitingTimeCalculator;

/// Time lost to weather, the complement of the waiting exclusion.
pub struct WeatherImpactCalculator;

fn sum_time_class(
    dataset: &NormalizedDataset,
    filter: &ScopeFilter,
    time_class: TimeClass,
) -> BucketAccumulator {
    let mut acc = BucketAccumulator::default();
    let events = dataset
        .voyage_events
        .iter()
        .filter(|e| e.time_class == time_class)
        .filter(|e| filter.accepts_month(e.month))
        .filter(|e| filter.accepts_vessel(e.vessel.as_ref().and_then(|v| v.vessel_id())));

    for event in events {
        let Some(hours) = event.duration_hours else {
            continue;
        };
        match facility_gate(filter, event.facility_id.as_deref()) {
            Ok(Some(facility_id)) => acc.add(BucketKey::facility_month(facility_id, event.month), hours),
            Ok(None) => acc.add_unattributed(hours),
            Err(()) => {}
        }
    }
    acc
}

impl MetricCalculator for WaitingTimeCalculator {
    fn metric(&self) -> MetricName {
        MetricName::WaitingTimeExclWeather
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let result = MetricResult::new(self.metric(), filter)
            .with_exclusion(format!(
                "category in [{}]",
                ctx.rules.waiting_categories.join(", ")
            ))
            .with_exclusion(format!(
                "excluding weather markers [{}] in category or parent event",
                ctx.rules.weather_markers.join(", ")
            ));
        sum_time_class(dataset, filter, TimeClass::NonWeatherWaiting).finish(result)
    }
}

impl MetricCalculator for WeatherImpactCalculator {
    fn metric(&self) -> MetricName {
        MetricName::WeatherImpact
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let result = MetricResult::new(self.metric(), filter).with_exclusion(format!(
            "weather markers [{}] in category or parent event",
            ctx.rules.weather_markers.join(", ")
        ));
        sum_time_class(dataset, filter, TimeClass::WeatherImpact).finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineRules;
    use crate::metrics::fixtures::{catalog, event, ym};

    #[test]
    fn test_waiting_and_weather_are_disjoint() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            voyage_events: vec![
                event(Some("mad-dog-prod"), ym(2024, 3), 5.0, TimeClass::NonWeatherWaiting, true),
                event(Some("mad-dog-prod"), ym(2024, 3), 7.0, TimeClass::WeatherImpact, true),
                event(Some("mad-dog-prod"), ym(2024, 3), 2.0, TimeClass::Other, false),
            ],
            ..Default::default()
        };

        let waiting = WaitingTimeCalculator.compute(&dataset, &ScopeFilter::all(), &ctx);
        let weather = WeatherImpactCalculator.compute(&dataset, &ScopeFilter::all(), &ctx);
        assert_eq!(waiting.value, 5.0);
        assert_eq!(weather.value, 7.0);
        assert!(waiting.applied_filters.iter().any(|f| f.contains("weather")));
    }

    #[test]
    fn test_month_window_applies() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            voyage_events: vec![
                event(Some("argos"), ym(2024, 1), 5.0, TimeClass::NonWeatherWaiting, true),
                event(Some("argos"), ym(2024, 2), 1.0, TimeClass::NonWeatherWaiting, true),
            ],
            ..Default::default()
        };
        let filter = ScopeFilter::all().with_months(vec![ym(2024, 2)]);
        let result = WaitingTimeCalculator.compute(&dataset, &filter, &ctx);
        assert_eq!(result.value, 1.0);
        assert_eq!(result.breakdown.len(), 1);
    }
}
