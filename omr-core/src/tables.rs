//! Readers and writers for the CSV tables that flow between pipeline stages.
//!
//! Four tables cross the toolkit's boundaries: the raw DSS export
//! (`path,unit,datetime,value`) coming in, and `HydroTable.csv`,
//! `VarTotal.csv`, `VarSummary.csv`, `VarKS.csv` going out (the latter three
//! mirror the web application's database tables of the same names).

use crate::channel::Channel;
use crate::error::Result;
use crate::observation::{table_datetime, Observation, Variable};
use chrono::NaiveDateTime;
use log::info;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

pub const HYDRO_TABLE: &str = "HydroTable.csv";
pub const VAR_TOTAL: &str = "VarTotal.csv";
pub const VAR_SUMMARY: &str = "VarSummary.csv";
pub const VAR_KS: &str = "VarKS.csv";

/// One row of the raw long-format DSS export, the boundary with the
/// external time-series reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawExportRow {
    pub path: String,
    pub unit: String,
    #[serde(with = "table_datetime")]
    pub datetime: NaiveDateTime,
    pub value: f32,
}

/// One row of `HydroTable.csv`. The channel keeps its `CHANnnn` spelling in
/// this table to match the legacy file and the DSS B-part it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HydroRow {
    pub run_id: String,
    pub path: String,
    pub variable: Variable,
    #[serde(with = "channel_label")]
    pub channel: Channel,
    pub scenario: String,
    pub unit: String,
    #[serde(with = "table_datetime")]
    pub datetime: NaiveDateTime,
    pub value: f32,
}

impl HydroRow {
    pub fn observation(&self) -> Observation {
        Observation {
            run_id: self.run_id.clone(),
            variable: self.variable,
            scenario: self.scenario.clone(),
            channel: self.channel,
            datetime: self.datetime,
            value: self.value,
        }
    }
}

/// One row of `VarSummary.csv`: descriptive statistics per
/// (run_id, variable, scenario, channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub run_id: String,
    pub variable: Variable,
    pub scenario: String,
    pub channel: Channel,
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub quant1: f64,
    pub median: f64,
    pub quant3: f64,
    pub max: f64,
}

/// One row of `VarKS.csv`: the Kolmogorov-Smirnov distance between the
/// Baseline sample and the OMR scenario sample for one (variable, channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KsRow {
    pub run_id: String,
    pub variable: Variable,
    pub channel: Channel,
    pub scenario0: String,
    pub scenario1: String,
    pub ks_stat: f64,
}

/// Serde adapter keeping the `CHANnnn` channel spelling in HydroTable.
mod channel_label {
    use crate::channel::Channel;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(channel: &Channel, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&channel.node_label())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<Channel, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub fn read_raw_export<R: Read>(reader: R) -> Result<Vec<RawExportRow>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<RawExportRow>, _>>()?;
    info!("Read {} raw export rows", rows.len());
    Ok(rows)
}

pub fn read_raw_export_file(path: &Path) -> Result<Vec<RawExportRow>> {
    read_raw_export(std::fs::File::open(path)?)
}

pub fn read_hydro_table<R: Read>(reader: R) -> Result<Vec<HydroRow>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<HydroRow>, _>>()?;
    info!("Read {} HydroTable rows", rows.len());
    Ok(rows)
}

pub fn read_hydro_table_file(path: &Path) -> Result<Vec<HydroRow>> {
    read_hydro_table(std::fs::File::open(path)?)
}

pub fn read_var_total<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let rows = rdr
        .deserialize()
        .collect::<std::result::Result<Vec<Observation>, _>>()?;
    info!("Read {} VarTotal rows", rows.len());
    Ok(rows)
}

pub fn read_var_total_file(path: &Path) -> Result<Vec<Observation>> {
    read_var_total(std::fs::File::open(path)?)
}

fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_hydro_table_file(path: &Path, rows: &[HydroRow]) -> Result<()> {
    write_rows(std::fs::File::create(path)?, rows)?;
    info!("Wrote {} HydroTable rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_var_total_file(path: &Path, rows: &[Observation]) -> Result<()> {
    write_rows(std::fs::File::create(path)?, rows)?;
    info!("Wrote {} VarTotal rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_var_summary_file(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    write_rows(std::fs::File::create(path)?, rows)?;
    info!("Wrote {} VarSummary rows to {}", rows.len(), path.display());
    Ok(())
}

pub fn write_var_ks_file(path: &Path, rows: &[KsRow]) -> Result<()> {
    write_rows(std::fs::File::create(path)?, rows)?;
    info!("Wrote {} VarKS rows to {}", rows.len(), path.display());
    Ok(())
}
