// ==========================================
// Offshore Logistics - CLI entry point
// ==========================================
// Usage:
//   offshore-logistics [--catalog <file>] [--rules <file>]
//                      [--facility <id>] [--months 2024-01,2024-02]
//                      [--json-logs] <source-type>=<file> ...
// Prints one JSON run report (sources, diagnostics, metrics)
// to stdout; logs go to stderr
// ==========================================

use anyhow::{bail, Context, Result};
use offshore_logistics::domain::types::YearMonth;
use offshore_logistics::{logging, IngestionRun, OffshorePipeline, ScopeFilter, SourceType};
use std::path::PathBuf;

struct CliArgs {
    catalog: Option<PathBuf>,
    rules: Option<PathBuf>,
    json_logs: bool,
    filter: ScopeFilter,
    inputs: Vec<(SourceType, PathBuf)>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut cli = CliArgs {
        catalog: None,
        rules: None,
        json_logs: false,
        filter: ScopeFilter::all(),
        inputs: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--catalog" => {
                cli.catalog = Some(args.next().context("--catalog needs a file")?.into());
            }
            "--rules" => {
                cli.rules = Some(args.next().context("--rules needs a file")?.into());
            }
            "--json-logs" => cli.json_logs = true,
            "--facility" => {
                let id = args.next().context("--facility needs a facility id")?;
                let mut ids = cli.filter.facility_ids.take().unwrap_or_default();
                ids.insert(id);
                cli.filter.facility_ids = Some(ids);
            }
            "--months" => {
                let list = args.next().context("--months needs a comma-separated list")?;
                let months = list
                    .split(',')
                    .map(|m| m.trim().parse::<YearMonth>().map_err(anyhow::Error::msg))
                    .collect::<Result<Vec<_>>>()?;
                cli.filter.months = Some(months);
            }
            other => {
                let Some((source, file)) = other.split_once('=') else {
                    bail!("expected <source-type>=<file>, got '{}'", other);
                };
                let source_type = source.parse::<SourceType>().map_err(anyhow::Error::msg)?;
                cli.inputs.push((source_type, PathBuf::from(file)));
            }
        }
    }

    if cli.inputs.is_empty() {
        bail!(
            "usage: offshore-logistics [--catalog <file>] [--rules <file>] \
             [--facility <id>] [--months YYYY-MM,...] [--json-logs] <source-type>=<file> ..."
        );
    }
    Ok(cli)
}

fn main() -> Result<()> {
    let cli = parse_args()?;
    if cli.json_logs {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!("offshore-logistics {}", offshore_logistics::VERSION);

    let pipeline = OffshorePipeline::from_config(cli.catalog.as_deref(), cli.rules.as_deref())
        .context("cannot initialise pipeline")?;

    let mut run = IngestionRun::new();
    for (source_type, path) in &cli.inputs {
        let batch = pipeline
            .normalize_file(path, *source_type)
            .with_context(|| format!("failed to import {}", path.display()))?;
        run.absorb(batch, Some(path.display().to_string()));
    }

    let metrics = pipeline.compute_all(&run.dataset, &cli.filter);
    tracing::info!(
        run_id = %run.run_id,
        rows = run.total_rows(),
        critical = run.critical_count(),
        "run finished"
    );

    let report = serde_json::to_string_pretty(&run.report(&metrics))?;
    println!("{}", report);
    Ok(())
}
