use crate::error::{OmrError, Result};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The reserved name of the baseline run.
pub const BASELINE: &str = "Baseline";

/// Substring marking the non-baseline scenario in any comparison.
pub const OMR_MARKER: &str = "OMR";

/// Mapping of scenario letter (from DSS F-parts / tidefile basenames) to the
/// human-readable scenario name, e.g. `A=Baseline,B=OMR-7000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioMap(BTreeMap<char, String>);

impl ScenarioMap {
    pub fn get(&self, letter: char) -> Option<&str> {
        self.0.get(&letter).map(String::as_str)
    }

    /// Resolve a scenario letter, failing with an input-shape error on a miss.
    pub fn resolve(&self, letter: char) -> Result<&str> {
        self.get(letter).ok_or_else(|| {
            OmrError::InputShape(format!(
                "Cannot find scenario letter {letter} as a key in the scenario name map"
            ))
        })
    }

    /// The single OMR-marked scenario name in the map.
    pub fn omr_name(&self) -> Result<&str> {
        let mut matches = self
            .0
            .values()
            .map(String::as_str)
            .filter(|name| name.contains(OMR_MARKER));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only),
            (None, _) => Err(OmrError::ScenarioCardinality(format!(
                "No scenario name in the map contains the {OMR_MARKER} marker"
            ))),
            (Some(a), Some(b)) => Err(OmrError::ScenarioCardinality(format!(
                "More than one scenario name in the map contains the {OMR_MARKER} marker: {a}, {b}"
            ))),
        }
    }
}

impl FromStr for ScenarioMap {
    type Err = OmrError;

    /// Parse the `A=Baseline,B=OMR-7000` command-line form.
    fn from_str(s: &str) -> Result<Self> {
        let mut map = BTreeMap::new();
        for pair in s.split(',') {
            let (letter, name) = pair.split_once('=').ok_or_else(|| {
                OmrError::Validation(format!(
                    "Scenario map entry {pair:?} is not of the form LETTER=NAME"
                ))
            })?;
            let mut chars = letter.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => c,
                _ => {
                    return Err(OmrError::Validation(format!(
                        "Scenario map key {letter:?} must be a single capital letter A-Z"
                    )))
                }
            };
            if map.insert(c, name.to_string()).is_some() {
                return Err(OmrError::Validation(format!(
                    "Scenario map letter {c} given more than once"
                )));
            }
        }
        if map.is_empty() {
            return Err(OmrError::Validation(
                "Scenario name map is empty".to_string(),
            ));
        }
        Ok(ScenarioMap(map))
    }
}

/// Pick the single scenario whose name contains the [`OMR_MARKER`].
///
/// Zero matches or more than one match is a structural precondition failure
/// for every pivot/diff/KS step, so it aborts rather than picking one.
pub fn select_omr_scenario<'a, S: AsRef<str>>(scenarios: &'a [S]) -> Result<&'a str> {
    let mut matches = scenarios
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| name.contains(OMR_MARKER));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only),
        (None, _) => Err(OmrError::ScenarioCardinality(format!(
            "No scenario name contains the {OMR_MARKER} marker"
        ))),
        (Some(a), Some(b)) => Err(OmrError::ScenarioCardinality(format!(
            "More than one scenario name contains the {OMR_MARKER} marker: {a}, {b}"
        ))),
    }
}

/// Check that the [`BASELINE`] scenario is present.
pub fn require_baseline<S: AsRef<str>>(scenarios: &[S]) -> Result<()> {
    if scenarios.iter().any(|s| s.as_ref() == BASELINE) {
        Ok(())
    } else {
        Err(OmrError::ScenarioCardinality(format!(
            "No scenario is named {BASELINE}"
        )))
    }
}
