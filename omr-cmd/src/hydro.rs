//! Hydro command: raw DSS export CSV in, HydroTable.csv out.

use chrono::NaiveDate;
use log::info;
use omr_core::dss_path;
use omr_core::run_id::{resolve_window, WindowPolicy};
use omr_core::scenario::ScenarioMap;
use omr_core::tables::{self, HydroRow, HYDRO_TABLE};
use omr_data::window::ForecastWindow;
use std::path::Path;

/// Tag each raw export row with its run identity, trim to the forecast
/// window, and write HydroTable.csv into `<out>/<run_id>/`.
///
/// Any row whose pathname cannot be decomposed aborts the run before
/// anything is written; a mis-tagged record would flow into every
/// downstream table.
pub fn run_hydro(
    raw_csv: &str,
    run_id: &str,
    names: &ScenarioMap,
    forecast_start: Option<NaiveDate>,
    forecast_end: Option<NaiveDate>,
    window_policy: WindowPolicy,
    out: &str,
) -> anyhow::Result<()> {
    let (start, end) = resolve_window(run_id, forecast_start, forecast_end, window_policy)?;
    let window = ForecastWindow::new(start, end)?;

    let raw = tables::read_raw_export_file(Path::new(raw_csv))?;
    let mut rows = Vec::with_capacity(raw.len());
    for record in raw {
        let parts = dss_path::decompose(&record.path, names)?;
        rows.push(HydroRow {
            run_id: run_id.to_string(),
            path: record.path,
            variable: parts.variable,
            channel: parts.channel,
            scenario: parts.scenario,
            unit: record.unit,
            datetime: record.datetime,
            value: record.value,
        });
    }

    let before = rows.len();
    rows.retain(|row| window.contains(row.datetime));
    info!(
        "Hydro table reduced from {} to {} rows by the forecast window",
        before,
        rows.len()
    );

    let out_folder = Path::new(out).join(run_id);
    std::fs::create_dir_all(&out_folder)?;
    tables::write_hydro_table_file(&out_folder.join(HYDRO_TABLE), &rows)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use omr_core::channel::Channel;
    use omr_core::observation::Variable;
    use std::io::Write;

    const RAW_FIXTURE: &str = "\
path,unit,datetime,value
/HYDRO/CHAN012/FLOW/01JAN2021/15MIN/RUN-A/,CFS,2021-03-15 00:00:00,1043.5
/HYDRO/CHAN012/FLOW/01JAN2021/15MIN/RUN-B/,CFS,2021-03-15 00:00:00,998.25
/HYDRO/CHAN012/FLOW/01JAN2021/15MIN/RUN-A/,CFS,2021-02-01 00:00:00,77.0
";

    #[test]
    fn test_run_hydro_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw.csv");
        std::fs::File::create(&raw_path)
            .unwrap()
            .write_all(RAW_FIXTURE.as_bytes())
            .unwrap();
        let names: ScenarioMap = "A=Baseline,B=OMR-7000".parse().unwrap();
        let out = dir.path().join("out");

        run_hydro(
            raw_path.to_str().unwrap(),
            "WIIN_OMR_20210315_20210331",
            &names,
            None,
            None,
            WindowPolicy::Strict,
            out.to_str().unwrap(),
        )
        .unwrap();

        let written = out.join("WIIN_OMR_20210315_20210331").join(HYDRO_TABLE);
        let rows = tables::read_hydro_table_file(&written).unwrap();
        // the warm-up row from February is trimmed away
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].channel, Channel(12));
        assert_eq!(rows[0].variable, Variable::Flow);
        assert_eq!(rows[0].scenario, "Baseline");
        assert_eq!(rows[1].scenario, "OMR-7000");
    }

    #[test]
    fn test_run_hydro_bad_path_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let raw_path = dir.path().join("raw.csv");
        std::fs::File::create(&raw_path)
            .unwrap()
            .write_all(
                "path,unit,datetime,value\n/too/short/,CFS,2021-03-15 00:00:00,1.0\n".as_bytes(),
            )
            .unwrap();
        let names: ScenarioMap = "A=Baseline,B=OMR-7000".parse().unwrap();
        let out = dir.path().join("out");

        let result = run_hydro(
            raw_path.to_str().unwrap(),
            "WIIN_OMR_20210315_20210331",
            &names,
            None,
            None,
            WindowPolicy::Strict,
            out.to_str().unwrap(),
        );
        assert!(result.is_err());
        // no partial output
        assert!(!out.join("WIIN_OMR_20210315_20210331").join(HYDRO_TABLE).exists());
    }
}
