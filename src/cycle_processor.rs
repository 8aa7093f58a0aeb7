//! # Cycle processing
//!
//! Orchestration of a full run over the input directory.
//!
//! ## Per file
//! -----------------
//! 1. Parse the cycle number from the **last character of the file stem** (`cycle3.csv` → 3).
//!    Names without a trailing digit are rejected with [`TargetQueryError::MalformedFilename`];
//!    multi-digit cycles are not supported.
//! 2. Read the table verbatim and tag every row with [`CYCLE_COLUMN`].
//! 3. Deduplicate target names, keeping first-seen order.
//! 4. Query the archive once for the whole file ([`CatalogClient::query_targets`]).
//! 5. Merge ([`reconcile`]).
//! 6. Save the full and reduced tables ([`save_parameters`]), counts as the archive sent them.
//!
//! ## Whole run
//! -----------------
//! Files are processed one at a time in file name order; anything without a `.csv`
//! extension is skipped. The planet and star counts of each merged table are recast to floats
//! ([`recast_counts`]), then the tables are concatenated, sorted by name and saved
//! once more as cycle `all`. Any error aborts the run: there is no per-file isolation.
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    catalog_client::CatalogClient,
    config::PipelineConfig,
    constants::{CYCLE_COLUMN, FLOAT_RECAST_COLUMNS, INPUT_EXTENSION, NAME_COLUMN},
    output::{save_parameters, CycleId},
    reconciler::reconcile,
    table::{Cell, Table},
    tap_service::CatalogService,
    target_query_errors::TargetQueryError,
};

/// Cycle number encoded as the last character of the file stem.
pub fn parse_cycle_number(path: &Utf8Path) -> Result<u8, TargetQueryError> {
    let malformed = || TargetQueryError::MalformedFilename(path.to_string());

    let stem = path.file_stem().ok_or_else(malformed)?;
    let digit = stem.chars().last().ok_or_else(malformed)?;

    digit
        .to_digit(10)
        .map(|n| n as u8)
        .ok_or_else(malformed)
}

/// Read one cycle file and tag its rows with the cycle number.
pub fn read_jwst_cycle(path: &Utf8Path) -> Result<(Table, u8), TargetQueryError> {
    let cycle_number = parse_cycle_number(path)?;

    let mut jwst_frame = Table::read_csv(path)?;
    jwst_frame.set_column(CYCLE_COLUMN, Cell::Int(cycle_number as i64));

    Ok((jwst_frame, cycle_number))
}

/// `.csv` files of a directory, sorted by file name.
///
/// A non UTF-8 entry name is an error rather than being skipped silently.
pub fn list_cycle_files(input_dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>, TargetQueryError> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let entry = entry?;
        let path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|path| TargetQueryError::Utf8PathError(path.display().to_string()))?;
        if path.extension() == Some(INPUT_EXTENSION) && entry.file_type()?.is_file() {
            files.push(path);
        }
    }

    Ok(files
        .into_iter()
        .sorted_by(|a, b| a.file_name().cmp(&b.file_name()))
        .collect())
}

/// Cast the planet and star counts to float, so every cycle agrees on their type.
pub fn recast_counts(frame: &mut Table) -> Result<(), TargetQueryError> {
    for column in FLOAT_RECAST_COLUMNS {
        if frame.has_column(column) {
            frame.cast_column_to_float(column)?;
        }
    }
    Ok(())
}

/// Runs the pipeline over every cycle file of the input directory.
#[derive(Debug)]
pub struct CycleProcessor<S: CatalogService> {
    client: CatalogClient<S>,
    config: PipelineConfig,
}

impl<S: CatalogService> CycleProcessor<S> {
    pub fn new(client: CatalogClient<S>, config: PipelineConfig) -> Self {
        CycleProcessor { client, config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Perform the standard query for one input file.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – Cycle file, its stem ending with the cycle digit.
    ///
    /// Return
    /// ----------
    /// * The merged table of this cycle, already saved to disk.
    /// * The first [`TargetQueryError`] met (file name, CSV, archive, output).
    ///
    /// See also
    /// ------------
    /// * [`read_jwst_cycle`] – Loading and cycle tagging.
    /// * [`reconcile`] – Merge with the archive response.
    pub fn handle_single_file(&self, path: &Utf8Path) -> Result<Table, TargetQueryError> {
        let file_name = path.file_name().unwrap_or(path.as_str());
        info!("Compiling results for {file_name}");
        println!("Compiling results for {file_name}");

        let (cycle_frame, cycle_number) = read_jwst_cycle(path)?;
        let query_names = cycle_frame.unique_keys(NAME_COLUMN)?;

        let query_result = self.client.query_targets(&query_names)?;
        let combined_frame = reconcile(&cycle_frame, &query_result)?;

        info!("Saving results...\n");
        save_parameters(&combined_frame, CycleId::Number(cycle_number), &self.config)?;

        Ok(combined_frame)
    }

    /// Process every cycle file, then save the combination of all cycles.
    ///
    /// Return
    /// ----------
    /// * The combined table, sorted by name, as saved under the `all` cycle. An input
    ///   directory without cycle files yields an empty table and no `all` output.
    pub fn run(&self) -> Result<Table, TargetQueryError> {
        let files = list_cycle_files(self.config.input_dir())?;
        info!(
            "Found {} cycle file(s) in {}",
            files.len(),
            self.config.input_dir()
        );

        let mut query_all_cycles = Vec::with_capacity(files.len());
        for path in &files {
            let mut cycle_frame = self.handle_single_file(path)?;
            recast_counts(&mut cycle_frame)?;
            query_all_cycles.push(cycle_frame);
        }

        if query_all_cycles.is_empty() {
            warn!("No cycle file to combine, the 'all' tables are not written");
            return Ok(Table::default());
        }

        let mut combined = Table::concat(&query_all_cycles);
        combined.sort_by_column(NAME_COLUMN)?;

        save_parameters(&combined, CycleId::All, &self.config)?;
        Ok(combined)
    }
}
