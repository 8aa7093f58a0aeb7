//! # Row reconciliation
//!
//! Left join of a local cycle table with the parameters returned by the archive, keyed by
//! target name ([`NAME_COLUMN`]).
//!
//! ## Algorithm
//! -----------------
//! 1. **Schema union** – the remote columns absent from the local table are computed from the
//!    actual response ([`new_columns`]); the archive schema is never assumed.
//! 2. **Extension** – the local table gets every new column, filled with [`Cell::Missing`].
//! 3. **Overwrite** – each local row looks its name up in an index of the remote rows.
//!    A hit overwrites every remote-originated column of the row; a miss leaves the row as is.
//!    A miss is the expected outcome for targets lost by the archive, not an error.
//! 4. **Sort** – the merged table is sorted by name (stable, byte-wise ascending).
//!
//! ## Invariants
//! -----------------
//! * The merged table has exactly as many rows as the local table.
//! * Local-only columns are never modified.
//! * Every new column exists on every row, matched or not.
//! * When a name appears on several remote rows, the first one wins.
//!
//! ## Error Handling
//! -----------------
//! A missing name column on either side is a programming error and is reported as
//! [`TargetQueryError::MissingColumn`].
use std::{borrow::Cow, collections::HashMap};

use ahash::RandomState;
use itertools::Itertools;
use tracing::info;

use crate::{
    constants::NAME_COLUMN,
    table::{Cell, Table},
    target_query_errors::TargetQueryError,
};

/// Remote name → index of its first row.
type RemoteIndex<'a> = HashMap<Cow<'a, str>, usize, RandomState>;

/// Columns of `remote` absent from `local`, in ascending order.
pub fn new_columns(local: &Table, remote: &Table) -> Vec<String> {
    remote
        .columns()
        .iter()
        .filter(|column| !local.has_column(column))
        .sorted()
        .dedup()
        .cloned()
        .collect()
}

/// Index the remote rows by name. Rows with a missing name are not indexed.
fn index_remote_rows(remote: &Table, name_index: usize) -> RemoteIndex<'_> {
    let mut index = RemoteIndex::default();
    for (row_index, row) in remote.rows().iter().enumerate() {
        if let Some(key) = row[name_index].as_key() {
            index.entry(key).or_insert(row_index);
        }
    }
    index
}

/// Merge the archive parameters into the local table.
///
/// Arguments
/// -----------------
/// * `local` – Cycle table, one row per observation (names may repeat).
/// * `remote` – Renamed archive response, one row per planet.
///
/// Return
/// ----------
/// * The merged table, sorted by name, with one row per local row.
/// * [`TargetQueryError::MissingColumn`] if either table lacks the name column.
///
/// See also
/// ------------
/// * [`new_columns`] – Schema union step.
/// * [`Table::sort_by_column`] – Final ordering.
pub fn reconcile(local: &Table, remote: &Table) -> Result<Table, TargetQueryError> {
    let local_name = local.require_column(NAME_COLUMN)?;
    let remote_name = remote.require_column(NAME_COLUMN)?;

    let mut merged = local.clone();
    for column in new_columns(local, remote) {
        merged.add_column(&column, Cell::Missing);
    }

    // position in the merged table of each remote column
    let targets = remote
        .columns()
        .iter()
        .map(|column| merged.require_column(column))
        .collect::<Result<Vec<usize>, _>>()?;

    let index = index_remote_rows(remote, remote_name);
    let mut matched = 0;

    for row in merged.rows_mut() {
        let found = row[local_name]
            .as_key()
            .and_then(|key| index.get(key.as_ref()).copied());

        if let Some(remote_row) = found {
            for (cell, &target) in remote.rows()[remote_row].iter().zip(&targets) {
                row[target] = cell.clone();
            }
            matched += 1;
        }
    }

    info!(
        "Reconciled {} row(s): {} matched, {} without archive parameters",
        merged.len(),
        matched,
        merged.len() - matched
    );

    merged.sort_by_column(NAME_COLUMN)?;
    Ok(merged)
}

#[cfg(test)]
mod reconciler_test {
    use super::*;

    fn text(value: &str) -> Cell {
        Cell::Text(value.into())
    }

    fn local_table(names: &[&str]) -> Table {
        Table::from_rows(
            ["planet_name", "jwst_instrument", "num_obs"],
            names
                .iter()
                .enumerate()
                .map(|(i, name)| vec![text(name), text("NIRSpec"), text(&i.to_string())])
                .collect(),
        )
        .unwrap()
    }

    fn remote_table(names: &[&str]) -> Table {
        Table::from_rows(
            ["planet_name", "radius_rearth", "host_name"],
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    vec![
                        text(name),
                        Cell::Float(1.0 + i as f64),
                        text(&format!("host of {name}")),
                    ]
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_columns() {
        let local = local_table(&[]);
        let remote = Table::new(["sma_au", "planet_name", "host_name", "num_obs"]);
        assert_eq!(new_columns(&local, &remote), vec!["host_name", "sma_au"]);
    }

    #[test]
    fn test_no_shared_names() {
        let local = local_table(&["A", "B", "A"]);
        let remote = remote_table(&["X", "Y"]);
        let merged = reconcile(&local, &remote).unwrap();

        assert_eq!(merged.len(), local.len());
        assert_eq!(
            merged.columns(),
            ["planet_name", "jwst_instrument", "num_obs", "host_name", "radius_rearth"]
        );
        for row in 0..merged.len() {
            assert!(merged.get(row, "radius_rearth").unwrap().is_missing());
            assert!(merged.get(row, "host_name").unwrap().is_missing());
        }
    }

    #[test]
    fn test_all_names_matched() {
        let local = local_table(&["C", "A", "B"]);
        let remote = remote_table(&["A", "B", "C"]);
        let merged = reconcile(&local, &remote).unwrap();

        assert_eq!(merged.len(), 3);
        let names: Vec<String> = merged.unique_keys("planet_name").unwrap();
        assert_eq!(names, vec!["A", "B", "C"]);

        assert_eq!(merged.get(0, "radius_rearth"), Some(&Cell::Float(1.0)));
        assert_eq!(merged.get(1, "radius_rearth"), Some(&Cell::Float(2.0)));
        assert_eq!(merged.get(2, "host_name"), Some(&text("host of C")));

        // local columns untouched: "C" was the first local row
        assert_eq!(merged.get(2, "num_obs"), Some(&text("0")));
        assert_eq!(merged.get(0, "jwst_instrument"), Some(&text("NIRSpec")));
    }

    #[test]
    fn test_partial_match_fills_every_row() {
        let local = local_table(&["A", "B", "B"]);
        let remote = remote_table(&["A"]);
        let merged = reconcile(&local, &remote).unwrap();

        assert_eq!(merged.len(), 3);
        assert!(merged.has_column("host_name"));
        assert_eq!(merged.get(0, "host_name"), Some(&text("host of A")));
        assert!(merged.get(1, "host_name").unwrap().is_missing());
        assert!(merged.get(2, "radius_rearth").unwrap().is_missing());
    }

    #[test]
    fn test_duplicate_local_names_share_values() {
        let local = local_table(&["Kepler-42 b", "Kepler-42 b"]);
        let remote = remote_table(&["Kepler-42 b"]);
        let merged = reconcile(&local, &remote).unwrap();

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get(0, "radius_rearth"), merged.get(1, "radius_rearth"));
        assert_eq!(merged.get(0, "num_obs"), Some(&text("0")));
        assert_eq!(merged.get(1, "num_obs"), Some(&text("1")));
    }

    #[test]
    fn test_duplicate_remote_names_first_wins() {
        let local = local_table(&["A"]);
        let remote = remote_table(&["A", "A"]);
        let merged = reconcile(&local, &remote).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get(0, "radius_rearth"), Some(&Cell::Float(1.0)));
    }

    #[test]
    fn test_input_order_independence() {
        let local = local_table(&["D", "A", "C", "B"]);
        let remote = remote_table(&["B", "A", "E"]);

        let mut local_reversed = Table::new(local.columns().iter().map(String::as_str));
        for row in local.rows().iter().rev() {
            local_reversed.push_row(row.clone()).unwrap();
        }
        let mut remote_reversed = Table::new(remote.columns().iter().map(String::as_str));
        for row in remote.rows().iter().rev() {
            remote_reversed.push_row(row.clone()).unwrap();
        }

        assert_eq!(
            reconcile(&local, &remote).unwrap(),
            reconcile(&local_reversed, &remote_reversed).unwrap()
        );
    }

    #[test]
    fn test_missing_name_column() {
        let local = Table::new(["target"]);
        let remote = remote_table(&["A"]);
        assert_eq!(
            reconcile(&local, &remote),
            Err(TargetQueryError::MissingColumn("planet_name".into()))
        );

        let local = local_table(&["A"]);
        let remote = Table::new(["pl_name"]);
        assert_eq!(
            reconcile(&local, &remote),
            Err(TargetQueryError::MissingColumn("planet_name".into()))
        );
    }
}
