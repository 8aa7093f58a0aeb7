//! # Pipeline configuration
//!
//! Paths and endpoint of one run. The binary always uses [`PipelineConfig::default`]
//! (no flags, no environment variables); the `with_*` setters exist for embedding and tests.
use camino::{Utf8Path, Utf8PathBuf};

use crate::constants::{
    DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR, EPA_TAP_ENDPOINT, FULL_OUTPUT_SUBDIR, LOG_FILE_NAME,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    input_dir: Utf8PathBuf,
    output_dir: Utf8PathBuf,
    log_file: Utf8PathBuf,
    tap_endpoint: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let output_dir = Utf8PathBuf::from(DEFAULT_OUTPUT_DIR);
        PipelineConfig {
            input_dir: Utf8PathBuf::from(DEFAULT_INPUT_DIR),
            log_file: output_dir.join(LOG_FILE_NAME),
            output_dir,
            tap_endpoint: EPA_TAP_ENDPOINT.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn with_input_dir(mut self, input_dir: impl Into<Utf8PathBuf>) -> Self {
        self.input_dir = input_dir.into();
        self
    }

    /// Change the output directory. The log file follows it.
    pub fn with_output_dir(mut self, output_dir: impl Into<Utf8PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self.log_file = self.output_dir.join(LOG_FILE_NAME);
        self
    }

    pub fn with_log_file(mut self, log_file: impl Into<Utf8PathBuf>) -> Self {
        self.log_file = log_file.into();
        self
    }

    pub fn with_tap_endpoint(mut self, tap_endpoint: &str) -> Self {
        self.tap_endpoint = tap_endpoint.to_string();
        self
    }

    pub fn input_dir(&self) -> &Utf8Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    pub fn log_file(&self) -> &Utf8Path {
        &self.log_file
    }

    pub fn tap_endpoint(&self) -> &str {
        &self.tap_endpoint
    }

    /// `{output_dir}/parameters_full/jtp_full_cycle-{cycle}.csv`
    pub fn full_output_path(&self, cycle: &str) -> Utf8PathBuf {
        self.output_dir
            .join(FULL_OUTPUT_SUBDIR)
            .join(format!("jtp_full_cycle-{cycle}.csv"))
    }

    /// `{output_dir}/jtp_cycle-{cycle}.csv`
    pub fn reduced_output_path(&self, cycle: &str) -> Utf8PathBuf {
        self.output_dir.join(format!("jtp_cycle-{cycle}.csv"))
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_layout() {
        let config = PipelineConfig::default();

        assert_eq!(config.input_dir().as_str(), "input");
        assert_eq!(config.log_file().as_str(), "output/target_query.log");
        assert_eq!(
            config.full_output_path("2").as_str(),
            "output/parameters_full/jtp_full_cycle-2.csv"
        );
        assert_eq!(config.reduced_output_path("all").as_str(), "output/jtp_cycle-all.csv");
        assert_eq!(
            config.tap_endpoint(),
            "https://exoplanetarchive.ipac.caltech.edu/TAP"
        );
    }

    #[test]
    fn test_log_follows_output_dir() {
        let config = PipelineConfig::default().with_output_dir("/tmp/run");
        assert_eq!(config.log_file().as_str(), "/tmp/run/target_query.log");

        let config = config.with_log_file("/var/log/tq.log");
        assert_eq!(config.log_file().as_str(), "/var/log/tq.log");
    }
}
