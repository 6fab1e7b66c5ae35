//! Summarize command: VarTotal.csv in, VarSummary.csv and VarKS.csv out.

use chrono::NaiveDate;
use log::info;
use omr_core::run_id::{resolve_window, WindowPolicy};
use omr_core::tables::{self, VAR_KS, VAR_SUMMARY, VAR_TOTAL};
use omr_data::ecdf;
use omr_data::summary;
use omr_data::window::ForecastWindow;
use std::path::Path;

/// Trim VarTotal to the forecast window, then derive the descriptive
/// summary and KS tables. The trimmed VarTotal is rewritten alongside them
/// so `<out>/<run_id>/` carries a consistent set.
pub fn run_summarize(
    var_total: &str,
    run_id: &str,
    forecast_start: Option<NaiveDate>,
    forecast_end: Option<NaiveDate>,
    window_policy: WindowPolicy,
    out: &str,
) -> anyhow::Result<()> {
    let (start, end) = resolve_window(run_id, forecast_start, forecast_end, window_policy)?;
    let window = ForecastWindow::new(start, end)?;

    let observations = tables::read_var_total_file(Path::new(var_total))?;
    let trimmed = window.filter(&observations);

    let summary_rows = summary::summarize(&trimmed)?;
    let ks_rows = ecdf::ks_rows(&trimmed)?;
    info!(
        "Derived {} summary rows and {} KS rows",
        summary_rows.len(),
        ks_rows.len()
    );

    let out_folder = Path::new(out).join(run_id);
    std::fs::create_dir_all(&out_folder)?;
    tables::write_var_total_file(&out_folder.join(VAR_TOTAL), &trimmed)?;
    tables::write_var_summary_file(&out_folder.join(VAR_SUMMARY), &summary_rows)?;
    tables::write_var_ks_file(&out_folder.join(VAR_KS), &ks_rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VAR_TOTAL_FIXTURE: &str = "\
run_id,variable,scenario,channel,datetime,value
WIIN_OMR_20210315_20210331,FLOW,Baseline,12,2021-03-15 00:00:00,1.0
WIIN_OMR_20210315_20210331,FLOW,Baseline,12,2021-03-15 00:15:00,2.0
WIIN_OMR_20210315_20210331,FLOW,Baseline,12,2021-03-15 00:30:00,3.0
WIIN_OMR_20210315_20210331,FLOW,Baseline,12,2021-03-15 00:45:00,4.0
WIIN_OMR_20210315_20210331,FLOW,OMR-7000,12,2021-03-15 00:00:00,2.0
WIIN_OMR_20210315_20210331,FLOW,OMR-7000,12,2021-03-15 00:15:00,3.0
WIIN_OMR_20210315_20210331,FLOW,OMR-7000,12,2021-03-15 00:30:00,4.0
WIIN_OMR_20210315_20210331,FLOW,OMR-7000,12,2021-03-15 00:45:00,5.0
WIIN_OMR_20210315_20210331,FLOW,Baseline,12,2021-02-01 00:00:00,999.0
";

    #[test]
    fn test_run_summarize_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let total_path = dir.path().join("VarTotal.csv");
        std::fs::File::create(&total_path)
            .unwrap()
            .write_all(VAR_TOTAL_FIXTURE.as_bytes())
            .unwrap();
        let out = dir.path().join("out");

        run_summarize(
            total_path.to_str().unwrap(),
            "WIIN_OMR_20210315_20210331",
            None,
            None,
            WindowPolicy::Strict,
            out.to_str().unwrap(),
        )
        .unwrap();

        let folder = out.join("WIIN_OMR_20210315_20210331");
        // warm-up row trimmed from the rewritten VarTotal
        let total = tables::read_var_total_file(&folder.join(VAR_TOTAL)).unwrap();
        assert_eq!(total.len(), 8);

        let summary_text = std::fs::read_to_string(folder.join(VAR_SUMMARY)).unwrap();
        let mut lines = summary_text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "run_id,variable,scenario,channel,count,mean,std,min,quant1,median,quant3,max"
        );
        assert_eq!(summary_text.lines().count(), 3); // header + 2 groups

        let ks_text = std::fs::read_to_string(folder.join(VAR_KS)).unwrap();
        // the worked example: KS distance 0.25
        assert!(ks_text.contains("Baseline,OMR-7000,0.25"));
    }
}
