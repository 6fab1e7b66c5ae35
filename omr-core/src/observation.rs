use crate::channel::Channel;
use crate::error::{OmrError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The simulated quantity a record carries: channel flow or channel velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variable {
    #[serde(rename = "FLOW")]
    Flow,
    #[serde(rename = "VEL")]
    Vel,
}

impl Variable {
    pub const ALL: [Variable; 2] = [Variable::Flow, Variable::Vel];

    /// The table/CSV spelling: `FLOW` or `VEL`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Variable::Flow => "FLOW",
            Variable::Vel => "VEL",
        }
    }

    /// Human-readable name used in report figures.
    pub fn display_name(&self) -> &'static str {
        match self {
            Variable::Flow => "Flow",
            Variable::Vel => "Velocity",
        }
    }

    /// Reporting unit for the variable.
    pub fn unit(&self) -> &'static str {
        match self {
            Variable::Flow => "CFS",
            Variable::Vel => "FT/S",
        }
    }

    /// Column-group title used in the full summary table.
    pub fn summary_title(&self) -> &'static str {
        match self {
            Variable::Flow => "Average Daily Flow (cfs)",
            Variable::Vel => "Average Daily Velocity (ft/s)",
        }
    }
}

impl FromStr for Variable {
    type Err = OmrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FLOW" => Ok(Variable::Flow),
            "VEL" => Ok(Variable::Vel),
            other => Err(OmrError::InputShape(format!(
                "Unknown variable label: {other}"
            ))),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single long-format simulation record.
///
/// One value per (run_id, variable, scenario, channel, datetime); datetimes
/// sit on the fixed 15-minute tidefile grid. Observations are produced once
/// per ingestion run and never mutated; every derived table is recomputed
/// from them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub run_id: String,
    pub variable: Variable,
    pub scenario: String,
    pub channel: Channel,
    #[serde(with = "table_datetime")]
    pub datetime: NaiveDateTime,
    pub value: f32,
}

/// Serde adapter for the `YYYY-MM-DD HH:MM:SS` timestamp spelling used in
/// the legacy CSV tables (the short `HH:MM` form is accepted on read).
pub mod table_datetime {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S>(dt: &NaiveDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&dt.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        omr_utils::dates::parse_datetime(&s).map_err(serde::de::Error::custom)
    }
}
