pub mod catalog_client;
pub mod config;
pub mod constants;
pub mod cycle_processor;
pub mod env_state;
pub mod output;
pub mod parameter_catalog;
pub mod query_builder;
pub mod reconciler;
pub mod run_log;
pub mod table;
pub mod tap_service;
pub mod target_query_errors;

pub use catalog_client::CatalogClient;
pub use config::PipelineConfig;
pub use cycle_processor::CycleProcessor;
pub use parameter_catalog::{Designation, ParameterCatalog};
pub use run_log::RunLog;
pub use table::{Cell, Table};
pub use tap_service::{CatalogService, TapService};
pub use target_query_errors::TargetQueryError;
