// ==========================================
// Offshore Logistics - Derived metric integration tests
// ==========================================
// Raw rows → normalize → compute_metric, end to end
// ==========================================

mod test_helpers;

#[path = "helpers/row_builder.rs"]
mod row_builder;

use offshore_logistics::config::load_rules;
use offshore_logistics::domain::types::YearMonth;
use offshore_logistics::{
    DiagnosticKind, IngestionRun, MetricName, OffshorePipeline, ReferenceCatalog, ScopeFilter, SourceType,
};
use row_builder::{bulk_row, event_row, manifest_row, RowBuilder};

fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).unwrap()
}

#[test]
fn test_weather_parent_moves_event_out_of_waiting() {
    let pipeline = test_helpers::pipeline();
    let rows = vec![
        event_row("Waiting on Installation", "Waiting on Weather", "Mad Dog", "2024-03-02 00:00", "12"),
        event_row("Waiting on Installation", "Cargo Operations", "Mad Dog", "2024-03-03 00:00", "5"),
        event_row("Waiting on Weather", "", "Mad Dog", "2024-03-04 00:00", "8"),
    ];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::VoyageEvent), None);

    let filter = ScopeFilter::for_facility("mad-dog-prod");
    let waiting = pipeline.compute_metric(MetricName::WaitingTimeExclWeather, &run.dataset, &filter);
    let weather = pipeline.compute_metric(MetricName::WeatherImpact, &run.dataset, &filter);
    let npt = pipeline.compute_metric(MetricName::NonProductiveTime, &run.dataset, &filter);

    assert_eq!(waiting.value, 5.0);
    assert_eq!(weather.value, 20.0);
    assert_eq!(npt.value, 25.0);
}

#[test]
fn test_diesel_never_counts_as_production_chemical() {
    let pipeline = test_helpers::pipeline();
    let rows = vec![
        bulk_row("Diesel", "Offload", "Na Kika", "900"),
        bulk_row("Diesel", "Backload", "Na Kika", "100"),
        bulk_row("Diesel", "Offload", "Deepwater Invictus", "400"),
        bulk_row("Marine Gas Oil", "Offload", "Atlantis", "250"),
        bulk_row("Methanol", "Offload", "Na Kika", "60"),
        bulk_row("Methanol", "Load", "Na Kika", "60"),
        bulk_row("Corrosion Inhibitor", "Offload", "Atlantis", "15"),
        bulk_row("Corrosion Inhibitor", "Offload", "Deepwater Invictus", "33"),
    ];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::BulkAction), None);

    let result = pipeline.compute_metric(
        MetricName::ProductionChemicalVolume,
        &run.dataset,
        &ScopeFilter::all(),
    );
    assert_eq!(result.value, 75.0);
    assert!(result
        .breakdown
        .iter()
        .all(|b| b.facility_id.as_deref() != Some("deepwater-invictus")));
    assert!(result.applied_filters.iter().any(|f| f.contains("diesel")));
}

#[test]
fn test_identical_offloads_without_transfer_id_both_count() {
    let pipeline = test_helpers::pipeline();
    let offload = |voyage: &str| {
        RowBuilder::new()
            .cell("Bulk Type", "Methanol")
            .cell("Action", "Offload")
            .cell("Location", "Na Kika")
            .cell("Quantity", "100")
            .cell("Action Date", "2024-01-05")
            .cell("Vessel", "Pelican Island")
            .cell("Voyage Number", voyage)
            .build()
    };
    let rows = vec![offload("V-1"), offload("V-2")];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::BulkAction), None);
    assert_eq!(run.dataset.bulk_actions.len(), 2);

    let result = pipeline.compute_metric(
        MetricName::ProductionChemicalVolume,
        &run.dataset,
        &ScopeFilter::all(),
    );
    assert_eq!(result.value, 200.0);
    assert_eq!(result.unattributed_value, 0.0);
}

#[test]
fn test_onload_and_offload_of_one_transfer_count_once() {
    let pipeline = test_helpers::pipeline();
    let leg = |action: &str| {
        RowBuilder::new()
            .cell("Transfer ID", "BT-42")
            .cell("Bulk Type", "Scale Inhibitor")
            .cell("Action", action)
            .cell("Location", "Na Kika")
            .cell("Quantity", "30")
            .cell("Action Date", "2024-02-01")
            .build()
    };
    let rows = vec![leg("Onload"), leg("Offload")];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::BulkAction), None);
    assert_eq!(run.dataset.bulk_actions.len(), 2);

    let result = pipeline.compute_metric(
        MetricName::ProductionChemicalVolume,
        &run.dataset,
        &ScopeFilter::all(),
    );
    assert_eq!(result.value, 30.0);
}

#[test]
fn test_bare_year_date_does_not_stretch_delivery_window() {
    let pipeline = test_helpers::pipeline();
    let mut rows: Vec<_> = (1..=3)
        .map(|m| manifest_row(&format!("V-{}", m), "Pelican Island", "Argos", &format!("2024-{:02}-05", m)))
        .collect();
    rows.push(manifest_row("V-90", "Miss Kathy", "Argos", "2024"));

    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::Manifest), None);
    assert!(run
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::DateParseFailure && d.row_number == 4));
    assert_eq!(run.dataset.manifests[3].month, None);

    let result = pipeline.compute_metric(
        MetricName::VesselDeliveryCapability,
        &run.dataset,
        &ScopeFilter::all(),
    );
    assert!(result
        .applied_filters
        .iter()
        .any(|f| f == "window derived from data: 3 month(s)"));
    assert_eq!(result.value, 1.0);
}

#[test]
fn test_baseline_includes_idle_months() {
    let pipeline = test_helpers::pipeline();
    let mut rows = Vec::new();
    for (month, count) in [(1, 3), (3, 2), (5, 1)] {
        for n in 0..count {
            rows.push(manifest_row(
                &format!("V-{}-{}", month, n),
                "Pelican Island",
                "Argos",
                &format!("2024-{:02}-{:02}", month, n + 1),
            ));
        }
    }
    // port call and third-party vessel do not count
    rows.push(manifest_row("V-9-0", "Pelican Island", "Port Fourchon", "2024-02-10"));
    rows.push(manifest_row("V-9-1", "Miss Kathy", "Argos", "2024-02-11"));

    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::Manifest), None);

    let window: Vec<YearMonth> = (1..=6).map(|m| ym(2024, m)).collect();
    let filter = ScopeFilter::all().with_months(window);
    let result = pipeline.compute_metric(MetricName::VesselDeliveryCapability, &run.dataset, &filter);

    assert_eq!(result.breakdown.len(), 1);
    let bucket = &result.breakdown[0];
    assert_eq!(bucket.vessel_id.as_deref(), Some("pelican-island"));
    assert_eq!(bucket.facility_id.as_deref(), Some("argos"));
    assert_eq!(bucket.record_count, 6);
    assert_eq!(bucket.value, 1.0);
}

#[test]
fn test_metrics_are_repeatable() {
    let pipeline = test_helpers::pipeline();
    let rows = vec![
        event_row("Standby", "", "Argos", "2024-01-02 00:00", "3"),
        event_row("Breakdown", "", "Na Kika", "2024-01-05 00:00", "7"),
    ];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::VoyageEvent), None);

    let first = pipeline.compute_all(&run.dataset, &ScopeFilter::all());
    let second = pipeline.compute_all(&run.dataset, &ScopeFilter::all());
    assert_eq!(first, second);
}

#[test]
fn test_rules_file_changes_fuel_markers() {
    let file = test_helpers::temp_file(".json", r#"{ "fuel_markers": ["methanol"] }"#);
    let rules = load_rules(Some(file.path())).unwrap();
    assert!(rules.deduplicate);
    assert!(rules.is_fuel("Methanol"));
    assert!(!rules.is_fuel("Diesel"));

    let pipeline = OffshorePipeline::new(ReferenceCatalog::builtin().unwrap(), rules);
    let rows = vec![
        bulk_row("Methanol", "Offload", "Na Kika", "60"),
        bulk_row("Diesel", "Offload", "Na Kika", "40"),
    ];
    let mut run = IngestionRun::new();
    run.absorb(pipeline.normalize(&rows, SourceType::BulkAction), None);
    let result = pipeline.compute_metric(
        MetricName::ProductionChemicalVolume,
        &run.dataset,
        &ScopeFilter::all(),
    );
    assert_eq!(result.value, 40.0);
}
