//! # target_query environment state
//!
//! This module defines [`TargetQueryEnv`], the **shared environment object** holding the
//! persistent HTTP client used to talk to the NASA Exoplanet Archive.
//!
//! ## Overview
//!
//! - One [`ureq::Agent`] is created per run and reused for every cycle file.
//! - No global timeout is configured: a query blocks until the archive answers or the
//!   transport fails.
//! - Non-success HTTP statuses are reported as errors by the agent and are **not** retried.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use target_query::env_state::TargetQueryEnv;
//!
//! let env = TargetQueryEnv::new();
//! let body = env.post_form(
//!     "https://exoplanetarchive.ipac.caltech.edu/TAP/sync",
//!     &[("query", "SELECT pl_name FROM pscomppars"), ("format", "csv")],
//! )?;
//! ```
use ureq::Agent;

use crate::target_query_errors::TargetQueryError;

/// HTTP state passed to the remote catalog service.
///
/// # Fields
///
/// * `http_client` - A ureq agent used to make HTTP requests
#[derive(Debug, Clone)]
pub struct TargetQueryEnv {
    pub http_client: Agent,
}

impl Default for TargetQueryEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TargetQueryEnv {
    /// Create a new environment with a default HTTP agent.
    pub fn new() -> Self {
        let config = Agent::config_builder().http_status_as_error(true).build();
        let agent: Agent = config.into();

        TargetQueryEnv { http_client: agent }
    }

    /// Perform a POST request with a form-encoded body and return the response body as text.
    ///
    /// Parameters are sent in the body, never in the URL.
    ///
    /// Arguments
    /// ---------
    /// * `url`: the endpoint
    /// * `params`: the form fields, encoded by the agent
    ///
    /// Return
    /// ------
    /// * The response body, or a [`TargetQueryError::UreqHttpError`] on transport failure,
    ///   non-success status or unreadable body
    pub fn post_form(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<String, TargetQueryError> {
        let body = self
            .http_client
            .post(url)
            .send_form(params.iter().copied())?
            .body_mut()
            .read_to_string()?;
        Ok(body)
    }
}
