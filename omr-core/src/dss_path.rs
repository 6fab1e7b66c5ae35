use crate::channel::Channel;
use crate::error::{OmrError, Result};
use crate::observation::Variable;
use crate::scenario::ScenarioMap;

/// Number of `/`-delimited segments in a DSS pathname, counting the empty
/// leading and trailing segments of `/A/B/C/D/E/F/`.
pub const DSS_PATH_SEGMENTS: usize = 8;

/// The fields of a DSS pathname this toolkit cares about: the B-part channel
/// label, the C-part variable, and the scenario resolved from the F-part.
#[derive(Debug, Clone, PartialEq)]
pub struct DssPathParts {
    pub channel: Channel,
    pub variable: Variable,
    pub scenario: String,
}

/// Decompose a DSS pathname and resolve its scenario through the name map.
///
/// Pathnames look like `/HYDRO/CHAN012/FLOW/01JAN2021/15MIN/DSM2-RUN-B/`.
/// A wrong segment count, an undetectable scenario letter, or a name-map
/// miss all abort the run: a mis-tagged record would poison every derived
/// table downstream.
pub fn decompose(path: &str, names: &ScenarioMap) -> Result<DssPathParts> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() != DSS_PATH_SEGMENTS {
        return Err(OmrError::InputShape(format!(
            "DSS pathname {path:?} has {} segments, expected {DSS_PATH_SEGMENTS}",
            segments.len()
        )));
    }
    let channel: Channel = segments[2].parse()?;
    let variable: Variable = segments[3].parse()?;
    let fpart = segments[6];
    let letter = scenario_letter(fpart).map_err(|e| {
        OmrError::InputShape(format!("{e} (while decomposing DSS pathname {path:?})"))
    })?;
    let scenario = names.resolve(letter)?.to_string();
    Ok(DssPathParts {
        channel,
        variable,
        scenario,
    })
}

/// Detect the scenario letter in an F-part.
///
/// A trailing capital letter wins; otherwise the F-part must contain exactly
/// one capital letter anywhere.
pub fn scenario_letter(fpart: &str) -> Result<char> {
    if let Some(last) = fpart.chars().last() {
        if last.is_ascii_uppercase() {
            return Ok(last);
        }
    }
    let mut capitals = fpart.chars().filter(|c| c.is_ascii_uppercase());
    match (capitals.next(), capitals.next()) {
        (Some(only), None) => Ok(only),
        _ => Err(OmrError::InputShape(format!(
            "Cannot find a single capital letter A-Z in the F-part {fpart:?} \
             for detecting a scenario letter"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::observation::Variable;
    use crate::scenario::ScenarioMap;

    fn names() -> ScenarioMap {
        "A=Baseline,B=OMR-7000".parse().unwrap()
    }

    #[test]
    fn test_decompose_trailing_letter() {
        let parts =
            decompose("/HYDRO/CHAN012/FLOW/01JAN2021/15MIN/dsm2-run-B/", &names()).unwrap();
        assert_eq!(parts.channel, Channel(12));
        assert_eq!(parts.variable, Variable::Flow);
        assert_eq!(parts.scenario, "OMR-7000");
    }

    #[test]
    fn test_decompose_single_interior_letter() {
        // No trailing capital, but exactly one capital overall.
        let parts = decompose("/HYDRO/CHAN049/VEL/01JAN2021/15MIN/runA-out/", &names()).unwrap();
        assert_eq!(parts.variable, Variable::Vel);
        assert_eq!(parts.scenario, "Baseline");
    }

    #[test]
    fn test_decompose_wrong_segment_count() {
        let err = decompose("/HYDRO/CHAN012/FLOW/15MIN/runA/", &names()).unwrap_err();
        assert!(err.to_string().contains("segments"));
    }

    #[test]
    fn test_decompose_ambiguous_letter() {
        // Two interior capitals and a lowercase tail: undetectable.
        assert!(decompose("/HYDRO/CHAN012/FLOW/01jan2021/15min/rAunBx/", &names()).is_err());
    }

    #[test]
    fn test_decompose_map_miss() {
        assert!(decompose("/HYDRO/CHAN012/FLOW/01jan2021/15min/run-Z/", &names()).is_err());
    }

    #[test]
    fn test_scenario_letter_prefers_trailing() {
        // Both A and B present; the trailing letter wins.
        assert_eq!(scenario_letter("runA-B").unwrap(), 'B');
        assert_eq!(scenario_letter("runAx").unwrap(), 'A');
        assert!(scenario_letter("run").is_err());
    }
}
