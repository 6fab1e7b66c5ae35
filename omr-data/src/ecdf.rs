use log::info;
use omr_core::channel::Channel;
use omr_core::error::{OmrError, Result};
use omr_core::observation::{Observation, Variable};
use omr_core::scenario::BASELINE;
use omr_core::tables::KsRow;
use std::collections::BTreeMap;

/// Empirical cumulative distribution function of one sample.
///
/// Right-continuous step function: at each distinct sample value the curve
/// jumps by (number of ties)/n; evaluation below the minimum is 0 and at or
/// above the maximum is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

impl Ecdf {
    /// Build an ECDF from a sample. An empty sample has no distribution and
    /// is rejected outright rather than yielding NaN downstream.
    pub fn new(sample: &[f32]) -> Result<Self> {
        if sample.is_empty() {
            return Err(OmrError::EmptySample(
                "Cannot build an ECDF from an empty sample".to_string(),
            ));
        }
        if sample.iter().any(|v| v.is_nan()) {
            return Err(OmrError::EmptySample(
                "Cannot build an ECDF from a sample containing NaN".to_string(),
            ));
        }
        let mut sorted: Vec<f64> = sample.iter().map(|v| *v as f64).collect();
        sorted.sort_by(f64::total_cmp);
        Ok(Ecdf { sorted })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        // never true past construction
        self.sorted.is_empty()
    }

    /// F(x): the fraction of the sample at or below `x`.
    pub fn value(&self, x: f64) -> f64 {
        let below_or_equal = self.sorted.partition_point(|v| *v <= x);
        below_or_equal as f64 / self.sorted.len() as f64
    }

    /// The step points (x, F(x)) at each distinct sample value, ascending.
    pub fn step_points(&self) -> Vec<(f64, f64)> {
        let n = self.sorted.len() as f64;
        let mut points: Vec<(f64, f64)> = Vec::new();
        for (i, x) in self.sorted.iter().enumerate() {
            let y = (i + 1) as f64 / n;
            match points.last_mut() {
                Some(last) if last.0 == *x => last.1 = y,
                _ => points.push((*x, y)),
            }
        }
        points
    }
}

/// Two-sample Kolmogorov-Smirnov statistic: the supremum of |F_a - F_b|.
///
/// The supremum over the whole real line is attained just after one of the
/// sample values, so scanning the union of step points suffices.
pub fn ks_2samp(a: &Ecdf, b: &Ecdf) -> f64 {
    let mut sup = 0.0f64;
    for (x, _) in a.step_points().iter().chain(b.step_points().iter()) {
        let gap = (a.value(*x) - b.value(*x)).abs();
        if gap > sup {
            sup = gap;
        }
    }
    sup
}

/// KS distance between a baseline and a scenario sample, rounded to 4
/// decimal places as in the legacy VarKS table.
pub fn ks_statistic(baseline: &[f32], scenario: &[f32]) -> Result<f64> {
    let b = Ecdf::new(baseline)?;
    let s = Ecdf::new(scenario)?;
    Ok(round4(ks_2samp(&b, &s)))
}

fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Build VarKS rows: one KS distance per (run_id, variable, channel),
/// Baseline vs the single OMR-marked scenario, in that sort order.
///
/// Every group the data claims to cover must have both samples; a missing
/// side is fatal rather than a silently absent row.
pub fn ks_rows(observations: &[Observation]) -> Result<Vec<KsRow>> {
    let omr = crate::pivot::checked_omr_scenario(observations)?;

    let mut groups: BTreeMap<(String, Variable, Channel), (Vec<f32>, Vec<f32>)> = BTreeMap::new();
    for obs in observations {
        let entry = groups
            .entry((obs.run_id.clone(), obs.variable, obs.channel))
            .or_default();
        if obs.scenario == BASELINE {
            entry.0.push(obs.value);
        } else if obs.scenario == omr {
            entry.1.push(obs.value);
        }
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((run_id, variable, channel), (baseline, scenario)) in groups {
        if baseline.is_empty() || scenario.is_empty() {
            return Err(OmrError::EmptySample(format!(
                "({variable}, channel {channel}) has no {} sample for the KS comparison",
                if baseline.is_empty() { BASELINE } else { omr.as_str() }
            )));
        }
        let ks_stat = ks_statistic(&baseline, &scenario)?;
        rows.push(KsRow {
            run_id,
            variable,
            channel,
            scenario0: BASELINE.to_string(),
            scenario1: omr.clone(),
            ks_stat,
        });
    }
    info!("Computed {} KS rows", rows.len());
    Ok(rows)
}
