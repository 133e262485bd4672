// ==========================================
// Offshore Logistics - Production Chemical Volume
// ==========================================
// Counted: offload rows, non-fuel fluid, production facility
// (integrated facilities count as production)
// Excluded: fuel of any direction, onloads, drilling rigs,
// facilities missing from the catalog, rows without a fluid type
// Rows sharing a transfer id are one physical transfer, counted once;
// rows without a transfer id are each counted
// ==========================================

use crate::domain::metric::{MetricName, MetricResult, ScopeFilter};
use crate::domain::records::NormalizedDataset;
use crate::domain::types::{FluidCategory, TransferDirection};
use crate::metrics::{facility_gate, BucketAccumulator, BucketKey, MetricCalculator, MetricContext};
use std::collections::BTreeSet;
use tracing::debug;

pub struct ProductionChemicalVolumeCalculator;

impl MetricCalculator for ProductionChemicalVolumeCalculator {
    fn metric(&self) -> MetricName {
        MetricName::ProductionChemicalVolume
    }

    fn compute(
        &self,
        dataset: &NormalizedDataset,
        filter: &ScopeFilter,
        ctx: &MetricContext<'_>,
    ) -> MetricResult {
        let mut acc = BucketAccumulator::default();
        let mut seen_transfers = BTreeSet::new();
        let mut drilling_excluded = 0usize;
        let mut repeated_transfers = 0usize;

        for action in &dataset.bulk_actions {
            if action.direction != TransferDirection::Offload
                || action.fluid_category != Some(FluidCategory::ProductionChemical)
            {
                continue;
            }
            let Some(quantity) = action.quantity else {
                continue;
            };
            if !filter.accepts_month(action.month)
                || !filter.accepts_vessel(action.vessel.as_ref().and_then(|v| v.vessel_id()))
            {
                continue;
            }

            let facility = match facility_gate(filter, action.facility_id.as_deref()) {
                Ok(facility) => facility,
                Err(()) => continue,
            };
            if let Some(facility_id) = facility {
                let is_production = ctx
                    .catalog
                    .facility(facility_id)
                    .map(|f| f.facility_type.is_production())
                    .unwrap_or(false);
                if !is_production {
                    drilling_excluded += 1;
                    continue;
                }
            }

            if let Some(key) = action.transfer_key() {
                if !seen_transfers.insert(key) {
                    repeated_transfers += 1;
                    continue;
                }
            }
            match facility {
                Some(facility_id) => {
                    acc.add(BucketKey::facility_month(facility_id, action.month), quantity)
                }
                None => acc.add_unattributed(quantity),
            }
        }

        debug!(drilling_excluded, repeated_transfers, "production chemical volume folded");

        let result = MetricResult::new(self.metric(), filter)
            .with_exclusion("direction = offload")
            .with_exclusion(format!(
                "excluding fuel [{}]",
                ctx.rules.fuel_markers.join(", ")
            ))
            .with_exclusion("production and integrated facilities only")
            .with_exclusion("one count per transfer id");
        acc.finish(result)
    }
}
