//! # Output tables
//!
//! Every processed cycle, and the synthetic `all` cycle, is persisted twice:
//!
//! * the **full** table with every local and archive column,
//! * the **reduced** table, a fixed projection on the columns used downstream
//!   ([`INITIAL_PARAMETERS`], [`PLANET_PARAMETERS`], [`STAR_PARAMETERS`]).
//!
//! Existing files are overwritten.
use std::fmt;

use camino::Utf8PathBuf;
use tracing::info;

use crate::{
    config::PipelineConfig,
    constants::{INITIAL_PARAMETERS, PLANET_PARAMETERS, STAR_PARAMETERS},
    table::Table,
    target_query_errors::TargetQueryError,
};

/// Cycle a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleId {
    /// Observation cycle parsed from the input file name
    Number(u8),
    /// Concatenation of every processed cycle
    All,
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleId::Number(n) => write!(f, "{n}"),
            CycleId::All => write!(f, "all"),
        }
    }
}

/// Columns of the reduced output, in order.
pub fn reduced_selection() -> Vec<&'static str> {
    INITIAL_PARAMETERS
        .iter()
        .chain(PLANET_PARAMETERS.iter())
        .chain(STAR_PARAMETERS.iter())
        .copied()
        .collect()
}

/// Save the full and the reduced version of a merged table.
///
/// Arguments
/// -----------------
/// * `total_frame` – Merged table of one cycle, or of all cycles.
/// * `cycle` – Cycle identifier used in the file names.
/// * `config` – Output layout.
///
/// Return
/// ----------
/// * The paths written, full table first.
/// * [`TargetQueryError::MissingColumn`] if a reduced column is absent, or an I/O / CSV error.
pub fn save_parameters(
    total_frame: &Table,
    cycle: CycleId,
    config: &PipelineConfig,
) -> Result<(Utf8PathBuf, Utf8PathBuf), TargetQueryError> {
    let cycle_label = cycle.to_string();

    let full_path = config.full_output_path(&cycle_label);
    total_frame.write_csv(&full_path)?;

    let reduced_path = config.reduced_output_path(&cycle_label);
    total_frame
        .select(&reduced_selection())?
        .write_csv(&reduced_path)?;

    info!("Saved {full_path} and {reduced_path}");
    Ok((full_path, reduced_path))
}

#[cfg(test)]
mod output_test {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_cycle_id_display() {
        assert_eq!(CycleId::Number(3).to_string(), "3");
        assert_eq!(CycleId::All.to_string(), "all");
    }

    #[test]
    fn test_reduced_selection() {
        let selection = reduced_selection();
        assert_eq!(selection.len(), 24);
        assert_eq!(selection[0], "planet_name");
        assert_eq!(selection[9], "radius_rearth");
        assert_eq!(selection[23], "star-rotvel_kms");
    }

    #[test]
    fn test_save_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = camino::Utf8Path::from_path(dir.path()).unwrap();
        let config = PipelineConfig::default().with_output_dir(output_dir);

        let mut columns = reduced_selection();
        columns.push("radius_errpos");
        let row = columns
            .iter()
            .map(|column| Cell::Text(column.to_string()))
            .collect();
        let table = Table::from_rows(columns, vec![row]).unwrap();

        let (full, reduced) = save_parameters(&table, CycleId::Number(1), &config).unwrap();
        assert_eq!(full, output_dir.join("parameters_full/jtp_full_cycle-1.csv"));
        assert_eq!(reduced, output_dir.join("jtp_cycle-1.csv"));

        let full_content = std::fs::read_to_string(&full).unwrap();
        let reduced_content = std::fs::read_to_string(&reduced).unwrap();
        assert!(full_content.lines().next().unwrap().ends_with(",radius_errpos"));
        assert!(!reduced_content.contains("radius_errpos"));
        assert_eq!(reduced_content.lines().count(), 2);
    }

    #[test]
    fn test_save_parameters_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_output_dir(camino::Utf8Path::from_path(dir.path()).unwrap());
        let table = Table::new(["planet_name"]);

        assert_eq!(
            save_parameters(&table, CycleId::All, &config),
            Err(TargetQueryError::MissingColumn("jwst_instrument".into()))
        );
    }
}
