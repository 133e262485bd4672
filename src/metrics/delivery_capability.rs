// ==========================================
// Offshore Logistics - Vessel Delivery Capability
// ==========================================
// 1. baseline fleet: configured list, else active in-fleet vessels
// 2. window: the filter's months, else every month between the
//    first and last qualifying manifest (offshore, baseline vessel,
//    inside the facility filter)
// 3. unique deliveries per (vessel, facility, month), offshore
//    destinations only
// 4. baseline average = window total / window length, idle months
//    included
// ==========================================

use crate::domain::metric::{MetricBucket, MetricName, MetricResult, ScopeFilter};
use crate::domain::records::{ManifestRecord, NormalizedDataset};
use crate::domain::types::YearMonth;
use crate::metrics::{facility_gate, MetricCalculator, MetricContext};
use std::collections::{BTreeMap, BTreeSet};

pub struct VesselDeliveryCapabilityCalculator;

/// Delivery counts per (vessel, facility), one slot per window month.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryMatrix {
    pub window: Vec<YearMonth>,
    pub counts: BTreeMap<(String, String), Vec<usize>>,
    /// Offshore deliveries by baseline vessels whose facility did not resolve
    pub unattributed: usize,
}

impl DeliveryMatrix {
    pub fn build(
        manifests: &[ManifestRecord],
        window: Vec<YearMonth>,
        fleet: &BTreeSet<String>,
        filter: &ScopeFilter,
    ) -> Self {
        let slots: BTreeMap<YearMonth, usize> =
            window.iter().enumerate().map(|(idx, m)| (*m, idx)).collect();
        let mut deliveries: BTreeSet<(String, Option<String>, YearMonth, String)> = BTreeSet::new();

        for manifest in manifests {
            let Some((vessel_id, facility, month)) = qualifying(manifest, fleet, filter) else {
                continue;
            };
            if !slots.contains_key(&month) {
                continue;
            }
            deliveries.insert((
                vessel_id.to_string(),
                facility.map(String::from),
                month,
                manifest.delivery_key(),
            ));
        }

        let mut counts: BTreeMap<(String, String), Vec<usize>> = BTreeMap::new();
        let mut unattributed = 0;
        for (vessel_id, facility_id, month, _) in deliveries {
            let Some(facility_id) = facility_id else {
                unattributed += 1;
                continue;
            };
            let row = counts
                .entry((vessel_id, facility_id))
                .or_insert_with(|| vec![0; window.len()]);
            if let Some(&slot) = slots.get(&month) {
                row[slot] += 1;
            }
        }

        Self {
            window,
            counts,
            unattributed,
        }
    }

    pub fn monthly_counts(&self, vessel_id: &str, facility_id: &str) -> Option<&[usize]> {
        self.counts
            .get(&(vessel_id.to_string(), facility_id.to_string()))
            .map(Vec::as_slice)
    }

    /// Window total over window length; 0 for an empty window.
    pub fn baseline_average(&self, vessel_id: &str, facility_id: &str) -> f64 {
        match self.monthly_counts(vessel_id, facility_id) {
            Some(row) if !self.window.is_empty() => {
                row.iter().sum::<usize>() as f64 / self.window.len() as f64
            }
            _ => 0.0,
        }
    }

    pub fn total_deliveries(&self) -> usize {
        self.counts.values().flat_map(|row| row.iter()).sum()
    }
}

/// Offshore manifest by a baseline vessel that passes the facility filter.
fn qualifying<'m>(
    manifest: &'m ManifestRecord,
    fleet: &BTreeSet<String>,
    filter: &ScopeFilter,
) -> Option<(&'m str, Option<&'m str>, YearMonth)> {
    if !manifest.is_offshore_destination {
        return None;
    }
    let vessel_id = manifest.vessel.as_ref().and_then(|v| v.vessel_id())?;
    let month = manifest.month?;
    if !fleet.contains(vessel_id) {
        return None;
    }
    let facility = facility_gate(filter, manifest.facility_id.as_deref()).ok()?;
    Some((vessel_id, facility, month))
}

impl VesselDeliveryCapabilityCalculator {
    /// Configured baseline fleet (or the active fleet), narrowed by the vessel filter.
    pub fn baseline_fleet(&self, filter: &ScopeFilter, ctx: &MetricContext<'_>) -> BTreeSet<String> {
        let configured: Vec<String> = if ctx.rules.baseline_fleet.is_empty() {
            ctx.catalog.active_fleet_ids()
        } else {
            ctx.rules.baseline_fleet.clone()
        };
        configured
            .into_iter()
            .filter(|id| filter.accepts_vessel(Some(id)))
            .collect()
    }

    /// Filter months sorted and de-duplicated, else the span of the
    /// qualifying manifests.
    fn window(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        fleet: &BTreeSet<String>,
    ) -> (Vec<YearMonth>, bool) {
        if let Some(months) = &filter.months {
            let unique: BTreeSet<YearMonth> = months.iter().copied().collect();
            return (unique.into_iter().collect(), false);
        }
        let months: BTreeSet<YearMonth> = dataset
            .manifests
            .iter()
            .filter_map(|m| qualifying(m, fleet, filter))
            .map(|(_, _, month)| month)
            .collect();
        match (months.first(), months.last()) {
            (Some(first), Some(last)) => (YearMonth::range_inclusive(*first, *last), true),
            _ => (Vec::new(), true),
        }
    }

    pub fn matrix(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> DeliveryMatrix {
        let fleet = self.baseline_fleet(filter, ctx);
        let (window, _) = self.window(dataset, filter, &fleet);
        DeliveryMatrix::build(&dataset.manifests, window, &fleet, filter)
    }
}

impl MetricCalculator for VesselDeliveryCapabilityCalculator {
    fn metric(&self) -> MetricName {
        MetricName::VesselDeliveryCapability
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let fleet = self.baseline_fleet(filter, ctx);
        let (window, derived) = self.window(dataset, filter, &fleet);
        let matrix = DeliveryMatrix::build(&dataset.manifests, window, &fleet, filter);

        let mut result = MetricResult::new(self.metric(), filter)
            .with_exclusion(format!(
                "baseline fleet [{}]",
                fleet.iter().cloned().collect::<Vec<_>>().join(", ")
            ))
            .with_exclusion("offshore destinations only")
            .with_exclusion("unique deliveries per vessel, facility and month");
        if derived {
            result = result.with_exclusion(format!(
                "window derived from data: {} month(s)",
                matrix.window.len()
            ));
        }

        result.breakdown = matrix
            .counts
            .iter()
            .map(|((vessel_id, facility_id), row)| MetricBucket {
                facility_id: Some(facility_id.clone()),
                vessel_id: Some(vessel_id.clone()),
                month: None,
                label: None,
                value: matrix.baseline_average(vessel_id, facility_id),
                record_count: row.iter().sum(),
            })
            .collect();
        result.value = result.breakdown.iter().map(|b| b.value).sum();
        result.unattributed_count = matrix.unattributed;
        result.unattributed_value = if matrix.window.is_empty() {
            0.0
        } else {
            matrix.unattributed as f64 / matrix.window.len() as f64
        };
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineRules;
    use crate::domain::records::VesselIdentity;
    use crate::metrics::fixtures::{catalog, manifest, ym};

    fn six_month_window() -> Vec<YearMonth> {
        (1..=6).map(|m| ym(2024, m)).collect()
    }

    /// Deliveries [3,0,2,0,1,0] from pelican-island to argos.
    fn sparse_manifests() -> Vec<ManifestRecord> {
        let mut out = Vec::new();
        for (month, count) in [(1, 3), (3, 2), (5, 1)] {
            for n in 0..count {
                out.push(manifest("pelican-island", "argos", ym(2024, month), &format!("V-{}-{}", month, n)));
            }
        }
        out
    }

    #[test]
    fn test_idle_months_count_in_baseline() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            manifests: sparse_manifests(),
            ..Default::default()
        };
        let filter = ScopeFilter::all().with_months(six_month_window());

        let matrix = VesselDeliveryCapabilityCalculator.matrix(&dataset, &filter, &ctx);
        assert_eq!(matrix.monthly_counts("pelican-island", "argos"), Some(&[3, 0, 2, 0, 1, 0][..]));
        assert_eq!(matrix.baseline_average("pelican-island", "argos"), 1.0);

        let result = VesselDeliveryCapabilityCalculator.compute(&dataset, &filter, &ctx);
        assert_eq!(result.value, 1.0);
        assert_eq!(result.breakdown[0].record_count, 6);
    }

    #[test]
    fn test_same_voyage_is_one_delivery() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let dataset = NormalizedDataset {
            manifests: vec![
                manifest("harvey-carrier", "na-kika", ym(2024, 2), "V-9"),
                manifest("harvey-carrier", "na-kika", ym(2024, 2), "V-9"),
            ],
            ..Default::default()
        };
        let matrix = VesselDeliveryCapabilityCalculator.matrix(&dataset, &ScopeFilter::all(), &ctx);
        assert_eq!(matrix.window, vec![ym(2024, 2)]);
        assert_eq!(matrix.total_deliveries(), 1);
    }

    #[test]
    fn test_fleet_and_port_restrictions() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let mut port_call = manifest("pelican-island", "argos", ym(2024, 1), "V-2");
        port_call.is_offshore_destination = false;
        let dataset = NormalizedDataset {
            manifests: vec![
                manifest("seacor-leopard", "argos", ym(2024, 1), "V-1"),
                port_call,
                manifest("pelican-island", "argos", ym(2024, 1), "V-3"),
            ],
            ..Default::default()
        };
        let result = VesselDeliveryCapabilityCalculator.compute(&dataset, &ScopeFilter::all(), &ctx);
        assert_eq!(result.value, 1.0);
        assert_eq!(result.breakdown.len(), 1);
        assert!(result.applied_filters.iter().any(|f| f.starts_with("window derived")));
    }

    #[test]
    fn test_configured_baseline_fleet() {
        let catalog = catalog();
        let rules = PipelineRules {
            baseline_fleet: vec!["seacor-leopard".to_string()],
            ..PipelineRules::default()
        };
        let ctx = MetricContext::new(&catalog, &rules);
        let fleet = VesselDeliveryCapabilityCalculator.baseline_fleet(&ScopeFilter::all(), &ctx);
        assert_eq!(fleet.into_iter().collect::<Vec<_>>(), vec!["seacor-leopard".to_string()]);
    }

    #[test]
    fn test_derived_window_ignores_non_baseline_manifests() {
        let catalog = catalog();
        let rules = PipelineRules::default();
        let ctx = MetricContext::new(&catalog, &rules);
        let mut manifests: Vec<ManifestRecord> = (1..=3)
            .map(|m| manifest("pelican-island", "argos", ym(2024, m), &format!("V-{}", m)))
            .collect();
        let mut third_party = manifest("pelican-island", "argos", ym(1905, 7), "V-90");
        third_party.vessel = Some(VesselIdentity::Unresolved {
            raw_name: "Miss Kathy".to_string(),
        });
        manifests.push(third_party);
        manifests.push(manifest("pelican-island", "na-kika", ym(2023, 1), "V-91"));
        let dataset = NormalizedDataset {
            manifests,
            ..Default::default()
        };

        let filter = ScopeFilter::for_facility("argos");
        let matrix = VesselDeliveryCapabilityCalculator.matrix(&dataset, &filter, &ctx);
        assert_eq!(matrix.window, vec![ym(2024, 1), ym(2024, 2), ym(2024, 3)]);

        let result = VesselDeliveryCapabilityCalculator.compute(&dataset, &filter, &ctx);
        assert_eq!(result.value, 1.0);
        assert!(result
            .applied_filters
            .iter()
            .any(|f| f == "window derived from data: 3 month(s)"));
    }
}
