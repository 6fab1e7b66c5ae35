use crate::window::ForecastWindow;
use chrono::NaiveDate;
use log::info;
use omr_core::channel::Channel;
use omr_core::error::Result;
use omr_core::observation::{Observation, Variable};
use omr_core::scenario::{require_baseline, select_omr_scenario, BASELINE};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

/// Name of the derived scenario-difference column.
pub const DIFFERENCE: &str = "Difference";

/// One column of a pivoted table: a group (variable title or channel label)
/// and a series within it (`Baseline`, the OMR scenario name, or
/// `Difference`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotColumn {
    pub group: String,
    pub series: String,
}

/// A pivoted scenario-comparison table ready for rendering.
///
/// Columns keep each group contiguous in sorted group order, with series
/// ordered `Baseline, <OMR scenario>, Difference`. The Difference series is
/// always OMR minus Baseline. Cells are rounded to 2 decimals; a cell with
/// data missing on either side is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub row_key: String,
    pub row_labels: Vec<String>,
    pub columns: Vec<PivotColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl PivotTable {
    /// Write the table as CSV with a two-row header (group row, then the
    /// series row carrying the row-key name in its first cell).
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut group_header = vec![String::new()];
        group_header.extend(self.columns.iter().map(|c| c.group.clone()));
        wtr.write_record(&group_header)?;
        let mut series_header = vec![self.row_key.clone()];
        series_header.extend(self.columns.iter().map(|c| c.series.clone()));
        wtr.write_record(&series_header)?;
        for (label, row) in self.row_labels.iter().zip(&self.values) {
            let mut record = vec![label.clone()];
            record.extend(
                row.iter()
                    .map(|cell| cell.map_or(String::new(), |v| format!("{v:.2}"))),
            );
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Keep only the columns whose group is in `groups`, preserving order.
    pub fn select_groups(&self, groups: &[String]) -> PivotTable {
        let keep: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| groups.contains(&c.group))
            .map(|(i, _)| i)
            .collect();
        PivotTable {
            row_key: self.row_key.clone(),
            row_labels: self.row_labels.clone(),
            columns: keep.iter().map(|&i| self.columns[i].clone()).collect(),
            values: self
                .values
                .iter()
                .map(|row| keep.iter().map(|&i| row[i]).collect())
                .collect(),
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Running mean accumulator keyed by group.
#[derive(Default)]
struct MeanAcc {
    sum: f64,
    count: u64,
}

impl MeanAcc {
    fn push(&mut self, v: f32) {
        self.sum += v as f64;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Distinct scenario names in a set, with the OMR/Baseline cardinality
/// invariant enforced. Returns the OMR scenario name.
pub(crate) fn checked_omr_scenario(observations: &[Observation]) -> Result<String> {
    let scenarios: Vec<String> = observations
        .iter()
        .map(|o| o.scenario.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    require_baseline(&scenarios)?;
    Ok(select_omr_scenario(&scenarios)?.to_string())
}

fn series_order(omr: &str) -> [String; 3] {
    [
        BASELINE.to_string(),
        omr.to_string(),
        DIFFERENCE.to_string(),
    ]
}

/// The full summary pivot: rows are channels, column groups are variables,
/// cells are the mean of all 15-minute samples in the window.
pub fn summary_pivot(observations: &[Observation], window: &ForecastWindow) -> Result<PivotTable> {
    let filtered = window.filter(observations);
    let omr = checked_omr_scenario(&filtered)?;

    let mut means: BTreeMap<(Variable, Channel, String), MeanAcc> = BTreeMap::new();
    let mut channels: BTreeSet<Channel> = BTreeSet::new();
    let mut variables: BTreeSet<Variable> = BTreeSet::new();
    for obs in &filtered {
        channels.insert(obs.channel);
        variables.insert(obs.variable);
        means
            .entry((obs.variable, obs.channel, obs.scenario.clone()))
            .or_default()
            .push(obs.value);
    }

    let mut columns = Vec::new();
    for variable in &variables {
        for series in series_order(&omr) {
            columns.push(PivotColumn {
                group: variable.summary_title().to_string(),
                series,
            });
        }
    }

    let mut values = Vec::with_capacity(channels.len());
    for channel in &channels {
        let mut row = Vec::with_capacity(columns.len());
        for variable in &variables {
            let get = |scenario: &str| {
                means
                    .get(&(*variable, *channel, scenario.to_string()))
                    .map(MeanAcc::mean)
            };
            let baseline = get(BASELINE);
            let scenario = get(&omr);
            let diff = match (baseline, scenario) {
                (Some(b), Some(s)) => Some(s - b),
                _ => None,
            };
            row.push(baseline.map(round2));
            row.push(scenario.map(round2));
            row.push(diff.map(round2));
        }
        values.push(row);
    }

    info!(
        "Summary pivot: {} channels x {} columns over {}..{}",
        channels.len(),
        columns.len(),
        window.start(),
        window.end()
    );
    Ok(PivotTable {
        row_key: "Channel".to_string(),
        row_labels: channels.iter().map(|c| c.to_string()).collect(),
        columns,
        values,
    })
}

/// The daily node pivot for one variable: rows are calendar days, column
/// groups are the designated channels, cells are daily means of the
/// 15-minute samples.
pub fn daily_pivot(
    observations: &[Observation],
    variable: Variable,
    channels: &[Channel],
    window: &ForecastWindow,
) -> Result<PivotTable> {
    let mut wanted: Vec<Channel> = channels.to_vec();
    wanted.sort();
    wanted.dedup();

    let filtered: Vec<Observation> = window
        .filter(observations)
        .into_iter()
        .filter(|o| o.variable == variable && wanted.contains(&o.channel))
        .collect();
    let omr = checked_omr_scenario(&filtered)?;

    let mut means: BTreeMap<(Channel, String, NaiveDate), MeanAcc> = BTreeMap::new();
    let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
    for obs in &filtered {
        let day = obs.datetime.date();
        days.insert(day);
        means
            .entry((obs.channel, obs.scenario.clone(), day))
            .or_default()
            .push(obs.value);
    }

    let mut columns = Vec::new();
    for channel in &wanted {
        for series in series_order(&omr) {
            columns.push(PivotColumn {
                group: channel.node_label(),
                series,
            });
        }
    }

    let mut values = Vec::with_capacity(days.len());
    for day in &days {
        let mut row = Vec::with_capacity(columns.len());
        for channel in &wanted {
            let get = |scenario: &str| {
                means
                    .get(&(*channel, scenario.to_string(), *day))
                    .map(MeanAcc::mean)
            };
            let baseline = get(BASELINE);
            let scenario = get(&omr);
            let diff = match (baseline, scenario) {
                (Some(b), Some(s)) => Some(s - b),
                _ => None,
            };
            row.push(baseline.map(round2));
            row.push(scenario.map(round2));
            row.push(diff.map(round2));
        }
        values.push(row);
    }

    info!(
        "Daily pivot for {}: {} days x {} columns",
        variable,
        days.len(),
        columns.len()
    );
    Ok(PivotTable {
        row_key: "Date".to_string(),
        row_labels: days
            .iter()
            .map(|d| omr_utils::dates::format_date(d))
            .collect(),
        columns,
        values,
    })
}
