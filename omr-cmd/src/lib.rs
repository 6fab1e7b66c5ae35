//! Command implementations for the OMR post-processing CLI.
//!
//! Provides subcommands for turning raw DSM2 run exports into the
//! HydroTable/VarTotal/VarSummary/VarKS tables and the report extracts the
//! dashboard and figure renderer consume.

use chrono::NaiveDate;
use clap::Subcommand;
use omr_core::run_id::WindowPolicy;
use omr_core::scenario::ScenarioMap;

pub mod hydro;
pub mod report;
pub mod summarize;

fn parse_cli_date(s: &str) -> Result<NaiveDate, String> {
    omr_utils::dates::parse_date(s)
        .map_err(|_| format!("Not a valid date: '{s}'. Must be YYYY-MM-DD."))
}

fn parse_scenario_map(s: &str) -> Result<ScenarioMap, String> {
    s.parse().map_err(|e| format!("{e}"))
}

fn parse_window_policy(s: &str) -> Result<WindowPolicy, String> {
    s.parse().map_err(|e| format!("{e}"))
}

#[derive(Subcommand)]
pub enum Command {
    /// Build HydroTable.csv from a raw long-format DSS export
    Hydro {
        /// Path to the raw export CSV (path,unit,datetime,value)
        #[arg(short = 'i', long)]
        raw_csv: String,

        /// Unique model run id; its last two _-tokens are the YYYYMMDD
        /// forecast start and end dates
        #[arg(short = 'r', long)]
        run_id: String,

        /// Scenario letter to name mapping, e.g. A=Baseline,B=OMR-7000
        #[arg(short = 'n', long, value_parser = parse_scenario_map)]
        names: ScenarioMap,

        /// Forecast start date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_start: Option<NaiveDate>,

        /// Forecast end date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_end: Option<NaiveDate>,

        /// How to reconcile CLI dates with run-id dates: strict or
        /// prefer-run-id
        #[arg(long, default_value = "strict", value_parser = parse_window_policy)]
        window_policy: WindowPolicy,

        /// Output directory; tables land in <out>/<run_id>/
        #[arg(short = 'o', long)]
        out: String,
    },

    /// Derive VarSummary.csv and VarKS.csv from VarTotal.csv
    Summarize {
        /// Path to VarTotal.csv
        #[arg(short = 't', long)]
        var_total: String,

        /// Unique model run id
        #[arg(short = 'r', long)]
        run_id: String,

        /// Forecast start date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_start: Option<NaiveDate>,

        /// Forecast end date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_end: Option<NaiveDate>,

        /// How to reconcile CLI dates with run-id dates: strict or
        /// prefer-run-id
        #[arg(long, default_value = "strict", value_parser = parse_window_policy)]
        window_policy: WindowPolicy,

        /// Output directory; tables land in <out>/<run_id>/
        #[arg(short = 'o', long)]
        out: String,
    },

    /// Write report table CSVs and ECDF graph extracts from the derived
    /// tables
    Report {
        /// Directory containing HydroTable.csv and VarTotal.csv
        #[arg(short = 'd', long)]
        data_dir: String,

        /// Unique model run id
        #[arg(short = 'r', long)]
        run_id: String,

        /// Forecast start date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_start: Option<NaiveDate>,

        /// Forecast end date (YYYY-MM-DD); defaults to the run-id date
        #[arg(long, value_parser = parse_cli_date)]
        forecast_end: Option<NaiveDate>,

        /// How to reconcile CLI dates with run-id dates: strict or
        /// prefer-run-id
        #[arg(long, default_value = "strict", value_parser = parse_window_policy)]
        window_policy: WindowPolicy,

        /// Output directory for tables/ and graphs/
        #[arg(short = 'w', long)]
        write: String,
    },
}

pub fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Hydro {
            raw_csv,
            run_id,
            names,
            forecast_start,
            forecast_end,
            window_policy,
            out,
        } => hydro::run_hydro(
            &raw_csv,
            &run_id,
            &names,
            forecast_start,
            forecast_end,
            window_policy,
            &out,
        ),
        Command::Summarize {
            var_total,
            run_id,
            forecast_start,
            forecast_end,
            window_policy,
            out,
        } => summarize::run_summarize(
            &var_total,
            &run_id,
            forecast_start,
            forecast_end,
            window_policy,
            &out,
        ),
        Command::Report {
            data_dir,
            run_id,
            forecast_start,
            forecast_end,
            window_policy,
            write,
        } => report::run_report(
            &data_dir,
            &run_id,
            forecast_start,
            forecast_end,
            window_policy,
            &write,
        ),
    }
}
