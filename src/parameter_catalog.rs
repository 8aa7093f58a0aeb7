//! # Parameter catalogue
//!
//! Translation layer between the column identifiers of the NASA Exoplanet Archive and the
//! column names written to the local tables.
//!
//! ## Overview
//! -----------------
//! A [`ParameterCatalog`] is the curated list of remote identifiers to query. Each identifier
//! carries a [`Designation`]:
//!
//! * [`Designation::Identity`] – pass-through columns (names, counts, letters) renamed as is.
//!   Only the identifiers listed in [`IDENTITY_IDENTIFIERS`] may use it.
//! * [`Designation::Quantity`] – physical parameters. The archive names the uncertainty and
//!   reference columns of a parameter after its base identifier, so one entry expands into
//!   four columns:
//!
//! ```text
//! pl_rade          -> radius_rearth
//! pl_radeerr1      -> radius_errpos
//! pl_radeerr2      -> radius_errneg
//! pl_rade_reflink  -> radius_ref
//! ```
//!
//! [`ParameterCatalog::expand`] produces the [`ExpandedCatalog`] used both to build the
//! `SELECT` list of the query and to rename the columns of the response.
//!
//! ## Error Handling
//! -----------------
//! Catalogue mistakes are configuration errors and surface as
//! [`TargetQueryError::MalformedCatalogEntry`] or
//! [`TargetQueryError::DuplicateRemoteIdentifier`].
use std::collections::HashMap;

use crate::{
    constants::{IDENTITY_IDENTIFIERS, QUERY_PARAMETERS},
    target_query_errors::TargetQueryError,
};

/// Local designation of a remote identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Designation<'a> {
    /// Column renamed to the given local name.
    Identity(&'a str),
    /// Physical parameter with its local base name and unit.
    Quantity { name: &'a str, unit: &'a str },
}

/// Curated list of remote identifiers and their local designation, in query order.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterCatalog<'a> {
    entries: Vec<(&'a str, Designation<'a>)>,
}

impl Default for ParameterCatalog<'static> {
    fn default() -> Self {
        ParameterCatalog::new(QUERY_PARAMETERS.to_vec())
    }
}

impl<'a> ParameterCatalog<'a> {
    pub fn new(entries: Vec<(&'a str, Designation<'a>)>) -> Self {
        ParameterCatalog { entries }
    }

    /// Append an entry to the catalogue.
    ///
    /// Validation is deferred to [`ParameterCatalog::expand`].
    pub fn with_entry(mut self, remote_id: &'a str, designation: Designation<'a>) -> Self {
        self.entries.push((remote_id, designation));
        self
    }

    pub fn entries(&self) -> &[(&'a str, Designation<'a>)] {
        &self.entries
    }

    /// Expand the catalogue into the flat remote identifier → local column mapping.
    ///
    /// Arguments
    /// -----------------
    /// *None*
    ///
    /// Return
    /// ----------
    /// * The [`ExpandedCatalog`], preserving the declaration order of the entries.
    /// * [`TargetQueryError::MalformedCatalogEntry`] if an identity designation is used outside
    ///   the identity identifiers (or a quantity designation on one of them).
    /// * [`TargetQueryError::DuplicateRemoteIdentifier`] if two expanded identifiers collide.
    ///
    /// See also
    /// ------------
    /// * [`assign_query_parameters`] – Expansion of one quantity entry.
    pub fn expand(&self) -> Result<ExpandedCatalog, TargetQueryError> {
        let mut expanded = ExpandedCatalog::default();

        for (remote_id, designation) in &self.entries {
            let is_identity = IDENTITY_IDENTIFIERS.contains(remote_id);
            match (designation, is_identity) {
                (Designation::Identity(local_name), true) => {
                    expanded.insert(remote_id.to_string(), local_name.to_string())?;
                }
                (Designation::Quantity { name, unit }, false) => {
                    for (remote, local) in assign_query_parameters(remote_id, name, unit) {
                        expanded.insert(remote, local)?;
                    }
                }
                (Designation::Identity(_), false) => {
                    return Err(TargetQueryError::MalformedCatalogEntry(
                        remote_id.to_string(),
                        "identity designation on a physical parameter".into(),
                    ))
                }
                (Designation::Quantity { .. }, true) => {
                    return Err(TargetQueryError::MalformedCatalogEntry(
                        remote_id.to_string(),
                        "quantity designation on an identity column".into(),
                    ))
                }
            }
        }

        Ok(expanded)
    }
}

/// Expand one physical parameter into its value, uncertainty and reference columns.
///
/// Limit flags (`{id}lim`) are not queried.
pub fn assign_query_parameters(remote_id: &str, name: &str, unit: &str) -> [(String, String); 4] {
    [
        (remote_id.to_string(), format!("{name}_{unit}")),
        (format!("{remote_id}err1"), format!("{name}_errpos")),
        (format!("{remote_id}err2"), format!("{name}_errneg")),
        (format!("{remote_id}_reflink"), format!("{name}_ref")),
    ]
}

/// Flat remote identifier → local column mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpandedCatalog {
    remote_ids: Vec<String>,
    local_names: HashMap<String, String>,
}

impl ExpandedCatalog {
    fn insert(&mut self, remote_id: String, local_name: String) -> Result<(), TargetQueryError> {
        if self.local_names.contains_key(&remote_id) {
            return Err(TargetQueryError::DuplicateRemoteIdentifier(remote_id));
        }
        self.local_names.insert(remote_id.clone(), local_name);
        self.remote_ids.push(remote_id);
        Ok(())
    }

    /// Remote identifiers in declaration order.
    pub fn remote_ids(&self) -> &[String] {
        &self.remote_ids
    }

    /// Local column name of a remote identifier.
    pub fn local_name(&self, remote_id: &str) -> Option<&str> {
        self.local_names.get(remote_id).map(String::as_str)
    }

    /// Local column names in declaration order.
    pub fn local_names(&self) -> Vec<&str> {
        self.remote_ids
            .iter()
            .filter_map(|id| self.local_name(id))
            .collect()
    }

    /// The mapping itself, as used by [`Table::rename_columns`](crate::table::Table::rename_columns).
    pub fn mapping(&self) -> &HashMap<String, String> {
        &self.local_names
    }

    pub fn len(&self) -> usize {
        self.remote_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remote_ids.is_empty()
    }
}
