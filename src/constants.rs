//! # Constants and type definitions for target_query
//!
//! This module centralizes the **fixed endpoints**, **column names**, **file layout** and the
//! **default parameter catalogue** used throughout the pipeline.
//!
//! ## Overview
//!
//! - NASA Exoplanet Archive (EPA) TAP endpoint and queried table
//! - Local and remote name columns used as the join key
//! - Input/output directory layout and file name patterns
//! - Column projection of the reduced output
//! - Default remote identifier → local designation catalogue
//!
//! These definitions are used by all main modules, including the query builder, the
//! reconciler and the cycle processor.

use crate::parameter_catalog::Designation;

// -------------------------------------------------------------------------------------------------
// Remote service
// -------------------------------------------------------------------------------------------------

/// Base URL of the NASA Exoplanet Archive TAP service
pub const EPA_TAP_ENDPOINT: &str = "https://exoplanetarchive.ipac.caltech.edu/TAP";

/// Planetary system composite table, one row per planet
pub const EPA_COMPOSITE_TABLE: &str = "pscomppars";

/// Documentation of the composite table columns
pub const EPA_COMPOSITE_DOC: &str =
    "https://exoplanetarchive.ipac.caltech.edu/docs/API_PS_columns.html";

/// Name column of the remote table, before renaming
pub const REMOTE_NAME_COLUMN: &str = "pl_name";

/// Remote identifiers passed through without expansion
pub const IDENTITY_IDENTIFIERS: [&str; 5] = ["pl_name", "sy_pnum", "sy_snum", "hostname", "pl_letter"];

// -------------------------------------------------------------------------------------------------
// Local tables
// -------------------------------------------------------------------------------------------------

/// Join key shared by local and renamed remote tables
pub const NAME_COLUMN: &str = "planet_name";

/// Column attached to every row with the cycle number of its input file
pub const CYCLE_COLUMN: &str = "jwst_cycle";

/// Multiplicity counts recast to float before the all-cycle concatenation
pub const FLOAT_RECAST_COLUMNS: [&str; 2] = ["system_p-num", "system_s-num"];

/// CSV rendering of [`Cell::Missing`](crate::table::Cell::Missing)
pub const MISSING_SENTINEL: &str = "NaN";

// -------------------------------------------------------------------------------------------------
// File layout
// -------------------------------------------------------------------------------------------------

/// Default directory scanned for cycle files
pub const DEFAULT_INPUT_DIR: &str = "input";

/// Default directory receiving the outputs and the log file
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Log file name, relative to the output directory
pub const LOG_FILE_NAME: &str = "target_query.log";

/// Sub-directory of the output directory holding the full tables
pub const FULL_OUTPUT_SUBDIR: &str = "parameters_full";

/// Only files with this extension are processed
pub const INPUT_EXTENSION: &str = "csv";

// -------------------------------------------------------------------------------------------------
// Reduced output projection
// -------------------------------------------------------------------------------------------------

/// Local columns kept in the reduced output
pub const INITIAL_PARAMETERS: [&str; 9] = [
    "planet_name",
    "jwst_instrument",
    "jwst_filter",
    "jwst_dispersion",
    "type",
    "num_obs",
    "jwst_cycle",
    "pid",
    "eap_months",
];

/// Planet columns kept in the reduced output
pub const PLANET_PARAMETERS: [&str; 5] = [
    "radius_rearth",
    "mass_mearth",
    "period_day",
    "sma_au",
    "eq-temp_kelvin",
];

/// Star and system columns kept in the reduced output
pub const STAR_PARAMETERS: [&str; 10] = [
    "host_name",
    "system_p-num",
    "system_s-num",
    "system-distance_pc",
    "star-teff_kelvin",
    "star-radius_rsol",
    "star-mass_msol",
    "star-log10-lbol_lsol",
    "star-age_ga",
    "star-rotvel_kms",
];

// -------------------------------------------------------------------------------------------------
// Default parameter catalogue
// -------------------------------------------------------------------------------------------------

/// EPA columns queried for every target.
///
/// Identity entries are renamed as is, quantity entries are expanded into value,
/// uncertainties and reference columns by
/// [`ParameterCatalog::expand`](crate::parameter_catalog::ParameterCatalog::expand).
pub const QUERY_PARAMETERS: [(&str, Designation<'static>); 17] = [
    // Auxiliary information
    ("pl_name", Designation::Identity("planet_name")),
    ("sy_pnum", Designation::Identity("system_p-num")),
    ("sy_snum", Designation::Identity("system_s-num")),
    ("hostname", Designation::Identity("host_name")),
    ("pl_letter", Designation::Identity("planet_id")),
    ("sy_dist", Designation::Quantity { name: "system-distance", unit: "pc" }),
    // Planet parameters
    ("pl_orbper", Designation::Quantity { name: "period", unit: "day" }),
    ("pl_orbsmax", Designation::Quantity { name: "sma", unit: "au" }),
    ("pl_rade", Designation::Quantity { name: "radius", unit: "rearth" }),
    ("pl_bmasse", Designation::Quantity { name: "mass", unit: "mearth" }),
    ("pl_eqt", Designation::Quantity { name: "eq-temp", unit: "kelvin" }),
    // Stellar parameters
    ("st_teff", Designation::Quantity { name: "star-teff", unit: "kelvin" }),
    ("st_rad", Designation::Quantity { name: "star-radius", unit: "rsol" }),
    ("st_mass", Designation::Quantity { name: "star-mass", unit: "msol" }),
    ("st_lum", Designation::Quantity { name: "star-log10-lbol", unit: "lsol" }),
    ("st_age", Designation::Quantity { name: "star-age", unit: "ga" }),
    ("st_vsin", Designation::Quantity { name: "star-rotvel", unit: "kms" }),
];
