//! # ADQL query construction
//!
//! Builds the single bulk query sent to the NASA Exoplanet Archive for one cycle file.
//!
//! All queries target the planetary system composite table ([`EPA_COMPOSITE_TABLE`]),
//! which holds one row per planet assembled from several publications. Its rows are therefore
//! not guaranteed to be self-consistent; this is logged as a caveat on every query.
use itertools::Itertools;
use tracing::info;

use crate::{
    constants::{EPA_COMPOSITE_DOC, EPA_COMPOSITE_TABLE, REMOTE_NAME_COLUMN},
    parameter_catalog::ExpandedCatalog,
};

/// Join values with commas, wrapping each one in `qualifier`.
pub fn string_from_list<S: AsRef<str>>(values: &[S], qualifier: &str) -> String {
    values
        .iter()
        .map(|value| format!("{qualifier}{}{qualifier}", value.as_ref()))
        .join(",")
}

/// ADQL string literal of a target name, single quotes doubled.
fn quote_name(name: &str) -> String {
    name.replace('\'', "''")
}

/// Construct the ADQL query selecting every expanded identifier for the given targets.
///
/// Arguments
/// -----------------
/// * `planet_names` – Target names, already deduplicated by the caller.
/// * `catalog` – Expanded parameter catalogue providing the `SELECT` list.
///
/// Return
/// ----------
/// * `SELECT {ids} FROM pscomppars WHERE pl_name IN ('name1','name2',...)`
///
/// See also
/// ------------
/// * [`ParameterCatalog::expand`](crate::parameter_catalog::ParameterCatalog::expand) – Source of the identifiers.
pub fn construct_adql_query<S: AsRef<str>>(planet_names: &[S], catalog: &ExpandedCatalog) -> String {
    let selection_string = string_from_list(catalog.remote_ids(), "");
    let escaped_names: Vec<String> = planet_names
        .iter()
        .map(|name| quote_name(name.as_ref()))
        .collect();
    let name_sequence = string_from_list(&escaped_names, "'");

    info!(
        "All queries are made to the '{EPA_COMPOSITE_TABLE}' table ({EPA_COMPOSITE_DOC}), \
         which means they might not be entirely self-consistent!"
    );

    format!(
        "SELECT {selection_string} FROM {EPA_COMPOSITE_TABLE} \
         WHERE {REMOTE_NAME_COLUMN} IN ({name_sequence})"
    )
}
