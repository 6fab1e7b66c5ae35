use crate::error::{OmrError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A DSM2 network channel identifier.
///
/// Channels appear in two spellings across the legacy tables: the bare
/// number (`12`) in VarTotal/VarSummary/VarKS, and the zero-padded DSS
/// B-part label (`CHAN012`) in HydroTable. Both parse to the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(pub u32);

impl Channel {
    /// The DSS B-part label form, e.g. `CHAN012`.
    pub fn node_label(&self) -> String {
        format!("CHAN{:03}", self.0)
    }
}

impl FromStr for Channel {
    type Err = OmrError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("CHAN").unwrap_or(s);
        digits
            .parse::<u32>()
            .map(Channel)
            .map_err(|_| OmrError::InputShape(format!("Unrecognized channel label: {s}")))
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
