//! # Table Access Protocol service
//!
//! [`CatalogService`] is the seam between the pipeline and the remote archive: it takes an
//! ADQL query and returns the raw result table, with the archive's own column names.
//!
//! [`TapService`] implements it against the synchronous TAP endpoint of the NASA Exoplanet
//! Archive. The query is posted as a form (`query`, `format=csv`), so hundreds of target
//! names fit in one request. The CSV response is parsed with type inference
//! ([`Table::from_csv_inferred`]), except for the name column which stays text.
use tracing::info;

use crate::{
    constants::{EPA_TAP_ENDPOINT, REMOTE_NAME_COLUMN},
    env_state::TargetQueryEnv,
    table::Table,
    target_query_errors::TargetQueryError,
};

/// A remote tabular service answering ADQL queries.
pub trait CatalogService {
    /// Run one query and return the result table with remote column names.
    ///
    /// Errors are fatal for the caller: no retry is attempted.
    fn search(&self, adql_query: &str) -> Result<Table, TargetQueryError>;
}

/// Synchronous TAP client.
#[derive(Debug, Clone)]
pub struct TapService {
    env_state: TargetQueryEnv,
    base_url: String,
}

impl Default for TapService {
    fn default() -> Self {
        TapService::new(TargetQueryEnv::new(), EPA_TAP_ENDPOINT)
    }
}

impl TapService {
    pub fn new(env_state: TargetQueryEnv, base_url: &str) -> Self {
        TapService {
            env_state,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the synchronous query resource.
    pub fn sync_url(&self) -> String {
        format!("{}/sync", self.base_url)
    }
}

impl CatalogService for TapService {
    fn search(&self, adql_query: &str) -> Result<Table, TargetQueryError> {
        let url = self.sync_url();
        info!("Sending TAP query to {url}");

        let body = self
            .env_state
            .post_form(&url, &[("query", adql_query), ("format", "csv")])?;

        let table = Table::from_csv_inferred(&body, &[REMOTE_NAME_COLUMN])?;
        info!("TAP service returned {} row(s)", table.len());
        Ok(table)
    }
}
