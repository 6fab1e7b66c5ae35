use log::info;
use omr_core::channel::Channel;
use omr_core::error::{OmrError, Result};
use omr_core::observation::{Observation, Variable};
use omr_core::tables::SummaryRow;
use std::collections::BTreeMap;

/// Descriptive statistics over one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub quant1: f64,
    pub median: f64,
    pub quant3: f64,
    pub max: f64,
}

/// Compute count/mean/std/min/quartiles/max for a sample.
///
/// The standard deviation is the population form (divide by n). Percentiles
/// interpolate linearly between order statistics.
pub fn describe(values: &[f32]) -> Result<Describe> {
    if values.is_empty() {
        return Err(OmrError::EmptySample(
            "Cannot describe an empty sample".to_string(),
        ));
    }
    let mut sorted: Vec<f64> = values.iter().map(|v| *v as f64).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Ok(Describe {
        count: sorted.len() as u64,
        mean,
        std: variance.sqrt(),
        min: sorted[0],
        quant1: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        quant3: quantile_sorted(&sorted, 0.75),
        max: sorted[sorted.len() - 1],
    })
}

/// Linear-interpolated quantile of an ascending-sorted sample, `q` in 0..=1.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// Build VarSummary rows: one [`Describe`] per
/// (run_id, variable, scenario, channel), in that sort order.
pub fn summarize(observations: &[Observation]) -> Result<Vec<SummaryRow>> {
    let mut groups: BTreeMap<(String, Variable, String, Channel), Vec<f32>> = BTreeMap::new();
    for obs in observations {
        groups
            .entry((
                obs.run_id.clone(),
                obs.variable,
                obs.scenario.clone(),
                obs.channel,
            ))
            .or_default()
            .push(obs.value);
    }
    let mut rows = Vec::with_capacity(groups.len());
    for ((run_id, variable, scenario, channel), values) in groups {
        let d = describe(&values)?;
        rows.push(SummaryRow {
            run_id,
            variable,
            scenario,
            channel,
            count: d.count,
            mean: d.mean,
            std: d.std,
            min: d.min,
            quant1: d.quant1,
            median: d.median,
            quant3: d.quant3,
            max: d.max,
        });
    }
    info!("Summarized {} observation groups", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use omr_core::channel::Channel;
    use omr_core::observation::{Observation, Variable};

    #[test]
    fn test_describe_basic() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(d.count, 4);
        assert_eq!(d.mean, 2.5);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
        // population std of 1..4 is sqrt(1.25)
        assert!((d.std - 1.25f64.sqrt()).abs() < 1e-12);
        // linear interpolation between order statistics
        assert_eq!(d.quant1, 1.75);
        assert_eq!(d.median, 2.5);
        assert_eq!(d.quant3, 3.25);
    }

    #[test]
    fn test_describe_single_value() {
        let d = describe(&[7.5]).unwrap();
        assert_eq!(d.count, 1);
        assert_eq!(d.std, 0.0);
        assert_eq!(d.min, d.max);
        assert_eq!(d.median, 7.5);
    }

    #[test]
    fn test_describe_empty_sample() {
        assert!(describe(&[]).is_err());
    }

    #[test]
    fn test_summarize_groups_and_ordering() {
        let t = NaiveDate::from_ymd_opt(2021, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mk = |variable, scenario: &str, channel, value| Observation {
            run_id: "r".to_string(),
            variable,
            scenario: scenario.to_string(),
            channel: Channel(channel),
            datetime: t,
            value,
        };
        let obs = vec![
            mk(Variable::Vel, "Baseline", 12, 0.5),
            mk(Variable::Flow, "OMR-7000", 12, 2.0),
            mk(Variable::Flow, "Baseline", 12, 1.0),
            mk(Variable::Flow, "Baseline", 12, 3.0),
        ];
        let rows = summarize(&obs).unwrap();
        assert_eq!(rows.len(), 3);
        // sorted by (variable, scenario, channel)
        assert_eq!(rows[0].variable, Variable::Flow);
        assert_eq!(rows[0].scenario, "Baseline");
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[0].mean, 2.0);
        assert_eq!(rows[1].scenario, "OMR-7000");
        assert_eq!(rows[2].variable, Variable::Vel);
    }
}
