// ==========================================
// Offshore Logistics - Derived Metric Calculators
// ==========================================
// Scope: stateless folds over a NormalizedDataset
// Rule: no state between calls; identical dataset + filter +
// rules + catalog always give an identical MetricResult
// Records without a resolved facility never enter a facility
// bucket; they are reported as unattributed
// ==========================================

pub mod chemical_volume;
pub mod cost_allocation;
pub mod delivery_capability;
pub mod npt;
pub mod waiting;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::PipelineRules;
use crate::domain::catalog::ReferenceCatalog;
use crate::domain::metric::{MetricBucket, MetricName, MetricResult, ScopeFilter};
use crate::domain::records::NormalizedDataset;
use crate::domain::types::YearMonth;
use std::collections::BTreeMap;
use tracing::debug;

pub use chemical_volume::ProductionChemicalVolumeCalculator;
pub use cost_allocation::{AllocatedDaysCalculator, CostByClassificationCalculator};
pub use delivery_capability::{DeliveryMatrix, VesselDeliveryCapabilityCalculator};
pub use npt::NptCalculator;
pub use waiting::{WaitingTimeCalculator, WeatherImpactCalculator};

/// Read-only inputs shared by every calculator.
#[derive(Clone, Copy)]
pub struct MetricContext<'a> {
    pub catalog: &'a ReferenceCatalog,
    pub rules: &'a PipelineRules,
}

impl<'a> MetricContext<'a> {
    pub fn new(catalog: &'a ReferenceCatalog, rules: &'a PipelineRules) -> Self {
        Self { catalog, rules }
    }
}

pub trait MetricCalculator {
    fn metric(&self) -> MetricName;

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> MetricResult;
}

/// Compute one metric by name.
pub fn compute_metric(
    name: MetricName,
    dataset: &NormalizedDataset,
    filter: &ScopeFilter,
    ctx: &MetricContext<'_>,
) -> MetricResult {
    let result = match name {
        MetricName::NonProductiveTime => NptCalculator.compute(dataset, filter, ctx),
        MetricName::WaitingTimeExclWeather => WaitingTimeCalculator.compute(dataset, filter, ctx),
        MetricName::WeatherImpact => WeatherImpactCalculator.compute(dataset, filter, ctx),
        MetricName::ProductionChemicalVolume => {
            ProductionChemicalVolumeCalculator.compute(dataset, filter, ctx)
        }
        MetricName::VesselDeliveryCapability => {
            VesselDeliveryCapabilityCalculator.compute(dataset, filter, ctx)
        }
        MetricName::AllocatedDays => AllocatedDaysCalculator.compute(dataset, filter, ctx),
        MetricName::CostByClassification => {
            CostByClassificationCalculator.compute(dataset, filter, ctx)
        }
    };
    debug!(
        metric = %name,
        value = result.value,
        buckets = result.breakdown.len(),
        unattributed = result.unattributed_count,
        "metric computed"
    );
    result
}

// ==========================================
// BucketAccumulator - shared grouping fold
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Default)]
pub(crate) struct BucketKey {
    pub facility_id: Option<String>,
    pub vessel_id: Option<String>,
    pub month: Option<YearMonth>,
    pub label: Option<String>,
}

impl BucketKey {
    pub fn facility_month(facility_id: &str, month: Option<YearMonth>) -> Self {
        Self {
            facility_id: Some(facility_id.to_string()),
            month,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct BucketAccumulator {
    buckets: BTreeMap<BucketKey, (f64, usize)>,
    unattributed_value: f64,
    unattributed_count: usize,
}

impl BucketAccumulator {
    pub fn add(&mut self, key: BucketKey, value: f64) {
        let entry = self.buckets.entry(key).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    pub fn add_unattributed(&mut self, value: f64) {
        self.unattributed_value += value;
        self.unattributed_count += 1;
    }

    /// Attributed buckets become the breakdown; their sum is the value.
    pub fn finish(self, mut result: MetricResult) -> MetricResult {
        result.value = self.buckets.values().map(|(v, _)| v).sum();
        result.breakdown = self
            .buckets
            .into_iter()
            .map(|(key, (value, count))| MetricBucket {
                facility_id: key.facility_id,
                vessel_id: key.vessel_id,
                month: key.month,
                label: key.label,
                value,
                record_count: count,
            })
            .collect();
        result.unattributed_value = self.unattributed_value;
        result.unattributed_count = self.unattributed_count;
        result
    }
}

/// Facility gate shared by the calculators.
///
/// `Some(id)` → attribute to `id`; `None` → unattributed (only when the
/// filter has no facility restriction); filtered-out records return Err.
pub(crate) fn facility_gate<'r>(
    filter: &ScopeFilter,
    facility_id: Option<&'r str>,
) -> Result<Option<&'r str>, ()> {
    match facility_id {
        Some(id) if filter.accepts_facility(Some(id)) => Ok(Some(id)),
        None if filter.facility_ids.is_none() => Ok(None),
        _ => Err(()),
    }
}
