use crate::error::{OmrError, Result};
use chrono::NaiveDate;
use log::warn;
use std::str::FromStr;

/// How to reconcile the forecast dates embedded in a run id with the
/// forecast dates supplied on the command line.
///
/// The legacy tooling asserted equality in one place and silently took the
/// run-id dates in another; here the choice is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Any disagreement between the run id and the CLI dates is fatal.
    #[default]
    Strict,
    /// Log a warning on disagreement and proceed with the run-id dates.
    PreferRunId,
}

impl FromStr for WindowPolicy {
    type Err = OmrError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(WindowPolicy::Strict),
            "prefer-run-id" => Ok(WindowPolicy::PreferRunId),
            other => Err(OmrError::Validation(format!(
                "Unknown window policy {other:?}, expected strict or prefer-run-id"
            ))),
        }
    }
}

/// Parse the forecast start/end dates from a run id.
///
/// By convention the last two `_`-delimited tokens of a run id are the
/// forecast start and end as `YYYYMMDD`, e.g. `WIIN_OMR_20210315_20210331`.
pub fn dates_from_run_id(run_id: &str) -> Result<(NaiveDate, NaiveDate)> {
    let tokens: Vec<&str> = run_id.split('_').collect();
    if tokens.len() < 3 {
        return Err(OmrError::InputShape(format!(
            "Run id {run_id:?} has too few underscore-delimited tokens to \
             carry forecast dates"
        )));
    }
    let parse = |token: &str| {
        omr_utils::dates::parse_date_compact(token).map_err(|_| {
            OmrError::InputShape(format!(
                "Run id token {token:?} is not a YYYYMMDD date (run id {run_id:?})"
            ))
        })
    };
    let start = parse(tokens[tokens.len() - 2])?;
    let end = parse(tokens[tokens.len() - 1])?;
    if start > end {
        return Err(OmrError::InputShape(format!(
            "Run id {run_id:?} forecast start {start} is after forecast end {end}"
        )));
    }
    Ok((start, end))
}

/// Reconcile run-id dates with optional CLI dates under the given policy.
///
/// Missing CLI dates always fall back to the run-id dates.
pub fn resolve_window(
    run_id: &str,
    cli_start: Option<NaiveDate>,
    cli_end: Option<NaiveDate>,
    policy: WindowPolicy,
) -> Result<(NaiveDate, NaiveDate)> {
    let (id_start, id_end) = dates_from_run_id(run_id)?;
    let mismatch = cli_start.is_some_and(|s| s != id_start) || cli_end.is_some_and(|e| e != id_end);
    if mismatch {
        match policy {
            WindowPolicy::Strict => {
                return Err(OmrError::Validation(format!(
                    "Forecast window {:?}..{:?} from the command line disagrees \
                     with {id_start}..{id_end} from run id {run_id:?}",
                    cli_start, cli_end
                )));
            }
            WindowPolicy::PreferRunId => {
                warn!(
                    "Forecast window {:?}..{:?} from the command line disagrees with \
                     {}..{} from run id {}; proceeding with the run-id dates",
                    cli_start, cli_end, id_start, id_end, run_id
                );
            }
        }
    }
    Ok((id_start, id_end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_dates_from_run_id() {
        let (start, end) = dates_from_run_id("WIIN_OMR_20210315_20210331").unwrap();
        assert_eq!(start, d(2021, 3, 15));
        assert_eq!(end, d(2021, 3, 31));
    }

    #[test]
    fn test_dates_from_run_id_bad_shapes() {
        assert!(dates_from_run_id("20210315_20210331").is_err()); // too few tokens
        assert!(dates_from_run_id("WIIN_OMR_2021_0331").is_err()); // unparseable token
        assert!(dates_from_run_id("WIIN_OMR_20210331_20210315").is_err()); // start after end
    }

    #[test]
    fn test_resolve_window_agreement() {
        let (start, end) = resolve_window(
            "WIIN_OMR_20210315_20210331",
            Some(d(2021, 3, 15)),
            Some(d(2021, 3, 31)),
            WindowPolicy::Strict,
        )
        .unwrap();
        assert_eq!((start, end), (d(2021, 3, 15), d(2021, 3, 31)));
    }

    #[test]
    fn test_resolve_window_strict_mismatch() {
        let err = resolve_window(
            "WIIN_OMR_20210315_20210331",
            Some(d(2021, 4, 15)),
            None,
            WindowPolicy::Strict,
        )
        .unwrap_err();
        assert!(err.to_string().contains("disagrees"));
    }

    #[test]
    fn test_resolve_window_prefer_run_id() {
        let (start, _) = resolve_window(
            "WIIN_OMR_20210315_20210331",
            Some(d(2021, 4, 15)),
            None,
            WindowPolicy::PreferRunId,
        )
        .unwrap();
        assert_eq!(start, d(2021, 3, 15));
    }

    #[test]
    fn test_resolve_window_no_cli_dates() {
        let (start, end) =
            resolve_window("WIIN_OMR_20210315_20210331", None, None, WindowPolicy::Strict).unwrap();
        assert_eq!((start, end), (d(2021, 3, 15), d(2021, 3, 31)));
    }

    #[test]
    fn test_window_policy_parse() {
        assert_eq!(
            "prefer-run-id".parse::<WindowPolicy>().unwrap(),
            WindowPolicy::PreferRunId
        );
        assert!("lenient".parse::<WindowPolicy>().is_err());
    }
}
