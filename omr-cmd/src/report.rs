//! Report command: derived tables in, report table CSVs and ECDF graph
//! extracts out.
//!
//! The table CSVs mirror the figure set the legacy renderer produced
//! (FullSummaryT1, MeanFlowT2-1/2, MeanVelT3-1/2); the graph extracts carry
//! exactly the data the ECDF figures plot, one JSON file per
//! (variable, channel).

use chrono::NaiveDate;
use log::{info, warn};
use omr_core::channel::Channel;
use omr_core::observation::{Observation, Variable};
use omr_core::run_id::{resolve_window, WindowPolicy};
use omr_core::scenario::{require_baseline, select_omr_scenario, BASELINE};
use omr_core::tables::{self, HYDRO_TABLE, VAR_TOTAL};
use omr_data::ecdf::{ks_2samp, Ecdf};
use omr_data::pivot::{daily_pivot, summary_pivot, PivotTable};
use omr_data::window::{ForecastWindow, SummaryPeriod};
use serde::Serialize;
use std::path::Path;

/// The eight channels shown in the mean flow / mean velocity node tables,
/// split into two four-channel halves to keep the rendered tables legible.
pub const NODE_CHANNELS: [Channel; 8] = [
    Channel(12),
    Channel(49),
    Channel(50),
    Channel(94),
    Channel(124),
    Channel(148),
    Channel(422),
    Channel(423),
];

/// The channels the report's ECDF figures cover.
pub const REPORT_CHANNELS: [Channel; 16] = [
    Channel(6),
    Channel(9),
    Channel(12),
    Channel(21),
    Channel(49),
    Channel(50),
    Channel(54),
    Channel(81),
    Channel(94),
    Channel(107),
    Channel(124),
    Channel(148),
    Channel(160),
    Channel(173),
    Channel(310),
    Channel(434),
];

/// One ECDF curve as the renderer consumes it: step x values with the
/// cumulative fraction at each.
#[derive(Debug, Serialize)]
pub struct EcdfCurve {
    pub name: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// The data behind one ECDF comparison figure.
#[derive(Debug, Serialize)]
pub struct EcdfExtract {
    pub run_id: String,
    pub variable: Variable,
    pub channel: Channel,
    pub x_title: String,
    pub y_title: String,
    pub baseline: EcdfCurve,
    pub scenario: EcdfCurve,
    pub ks_stat: f64,
}

pub fn run_report(
    data_dir: &str,
    run_id: &str,
    forecast_start: Option<NaiveDate>,
    forecast_end: Option<NaiveDate>,
    window_policy: WindowPolicy,
    write: &str,
) -> anyhow::Result<()> {
    let (start, end) = resolve_window(run_id, forecast_start, forecast_end, window_policy)?;
    let window = ForecastWindow::new(start, end)?;
    let data_dir = Path::new(data_dir);

    write_tables(data_dir, &window, Path::new(write))?;
    write_graphs(data_dir, run_id, &window, Path::new(write))?;
    Ok(())
}

fn write_pivot_csv(table: &PivotTable, path: &Path) -> anyhow::Result<()> {
    table.write_csv(std::fs::File::create(path)?)?;
    info!("Wrote report table {}", path.display());
    Ok(())
}

fn write_tables(data_dir: &Path, window: &ForecastWindow, out: &Path) -> anyhow::Result<()> {
    let hydro_rows = tables::read_hydro_table_file(&data_dir.join(HYDRO_TABLE))?;
    let observations: Vec<Observation> = hydro_rows.iter().map(|r| r.observation()).collect();

    let tables_dir = out.join("tables");
    std::fs::create_dir_all(&tables_dir)?;

    for period in SummaryPeriod::ALL {
        let table = summary_pivot(&observations, &window.period(period))?;
        let name = match period {
            SummaryPeriod::Full => "FullSummaryT1.csv".to_string(),
            _ => format!("SummaryT1_{}.csv", period.label()),
        };
        write_pivot_csv(&table, &tables_dir.join(name))?;
    }

    for (variable, first_name, second_name) in [
        (Variable::Flow, "MeanFlowT2-1.csv", "MeanFlowT2-2.csv"),
        (Variable::Vel, "MeanVelT3-1.csv", "MeanVelT3-2.csv"),
    ] {
        let daily = daily_pivot(&observations, variable, &NODE_CHANNELS, window)?;
        let first_groups: Vec<String> =
            NODE_CHANNELS[..4].iter().map(Channel::node_label).collect();
        let second_groups: Vec<String> =
            NODE_CHANNELS[4..].iter().map(Channel::node_label).collect();
        write_pivot_csv(&daily.select_groups(&first_groups), &tables_dir.join(first_name))?;
        write_pivot_csv(&daily.select_groups(&second_groups), &tables_dir.join(second_name))?;
    }
    Ok(())
}

fn write_graphs(
    data_dir: &Path,
    run_id: &str,
    window: &ForecastWindow,
    out: &Path,
) -> anyhow::Result<()> {
    let observations = tables::read_var_total_file(&data_dir.join(VAR_TOTAL))?;
    let trimmed = window.filter(&observations);

    let scenarios: Vec<String> = trimmed
        .iter()
        .map(|o| o.scenario.clone())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    require_baseline(&scenarios)?;
    let omr = select_omr_scenario(&scenarios)?.to_string();

    let graphs_dir = out.join("graphs");
    std::fs::create_dir_all(&graphs_dir)?;

    for variable in Variable::ALL {
        for channel in REPORT_CHANNELS {
            let sample = |scenario: &str| -> Vec<f32> {
                trimmed
                    .iter()
                    .filter(|o| {
                        o.variable == variable && o.channel == channel && o.scenario == scenario
                    })
                    .map(|o| o.value)
                    .collect()
            };
            let baseline_sample = sample(BASELINE);
            let scenario_sample = sample(&omr);
            if baseline_sample.is_empty() || scenario_sample.is_empty() {
                warn!(
                    "Skipping ECDF extract for ({variable}, channel {channel}): \
                     no data in VarTotal for one or both scenarios"
                );
                continue;
            }

            let baseline_ecdf = Ecdf::new(&baseline_sample)?;
            let scenario_ecdf = Ecdf::new(&scenario_sample)?;
            let ks_stat = (ks_2samp(&baseline_ecdf, &scenario_ecdf) * 10_000.0).round() / 10_000.0;

            let extract = EcdfExtract {
                run_id: run_id.to_string(),
                variable,
                channel,
                x_title: format!("{} in {}", variable.display_name(), variable.unit()),
                y_title: "Fraction of Data".to_string(),
                baseline: curve(BASELINE, &baseline_ecdf),
                scenario: curve(&omr, &scenario_ecdf),
                ks_stat,
            };

            let path = graphs_dir.join(format!("ecdf_{variable}_{channel}.json"));
            serde_json::to_writer_pretty(std::fs::File::create(&path)?, &extract)?;
            info!("Wrote ECDF extract {}", path.display());
        }
    }
    Ok(())
}

fn curve(name: &str, ecdf: &Ecdf) -> EcdfCurve {
    let points = ecdf.step_points();
    EcdfCurve {
        name: name.to_string(),
        x: points.iter().map(|(x, _)| *x).collect(),
        y: points.iter().map(|(_, y)| *y).collect(),
    }
}
