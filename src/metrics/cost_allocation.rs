// ==========================================
// Offshore Logistics - Cost Allocation Rollups
// ==========================================
// AllocatedDays:        days per resolved facility and month
// CostByClassification: cost per facility and classification label
// Ambiguous rows keep their own label, never merged into a side
// Cost rows carry no vessel, so a vessel filter does not apply
// ==========================================

use crate::domain::metric::{MetricName, MetricResult, ScopeFilter};
use crate::domain::records::{CostAllocationRecord, NormalizedDataset};
use crate::metrics::{facility_gate, BucketAccumulator, BucketKey, MetricCalculator, MetricContext};

pub struct AllocatedDaysCalculator;

pub struct CostByClassificationCalculator;

fn scoped<'d>(
    dataset: &'d NormalizedDataset,
    filter: &'d ScopeFilter,
) -> impl Iterator<Item = &'d CostAllocationRecord> + 'd {
    dataset
        .cost_allocations
        .iter()
        .filter(move |r| filter.accepts_month(r.month))
}

fn base_result(metric: MetricName, filter: &ScopeFilter) -> MetricResult {
    let result = MetricResult::new(metric, filter);
    if filter.vessel_ids.is_some() {
        result.with_exclusion("vessel filter not applicable to cost allocation")
    } else {
        result
    }
}

impl MetricCalculator for AllocatedDaysCalculator {
    fn metric(&self) -> MetricName {
        MetricName::AllocatedDays
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        _ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let mut acc = BucketAccumulator::default();
        for record in scoped(dataset, filter) {
            let Some(days) = record.allocated_days else {
                continue;
            };
            match facility_gate(filter, record.facility_id.as_deref()) {
                Ok(Some(facility_id)) => {
                    acc.add(BucketKey::facility_month(facility_id, record.month), days)
                }
                Ok(None) => acc.add_unattributed(days),
                Err(()) => {}
            }
        }
        acc.finish(base_result(self.metric(), filter))
    }
}

impl MetricCalculator for CostByClassificationCalculator {
    fn metric(&self) -> MetricName {
        MetricName::CostByClassification
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        _ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let mut acc = BucketAccumulator::default();
        for record in scoped(dataset, filter) {
            let Some(cost) = record.total_cost else {
                continue;
            };
            match facility_gate(filter, record.facility_id.as_deref()) {
                Ok(Some(facility_id)) => acc.add(
                    BucketKey {
                        facility_id: Some(facility_id.to_string()),
                        label: Some(record.classification.to_string()),
                        ..Default::default()
                    },
                    cost,
                ),
                Ok(None) => acc.add_unattributed(cost),
                Err(()) => {}
            }
        }
        acc.finish(base_result(self.metric(), filter))
    }
}
