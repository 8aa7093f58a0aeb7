use target_query::{
    env_state::TargetQueryEnv, CatalogClient, CycleProcessor, ParameterCatalog, PipelineConfig,
    RunLog, TapService, TargetQueryError,
};
use tracing::error;

fn main() -> Result<(), TargetQueryError> {
    let config = PipelineConfig::default();
    let run_log = RunLog::open(config.log_file())?;

    let service = TapService::new(TargetQueryEnv::new(), config.tap_endpoint());
    let client = CatalogClient::new(service, &ParameterCatalog::default())?;
    let processor = CycleProcessor::new(client, config);

    if let Err(err) = processor.run() {
        error!("Query aborted: {err}");
        run_log.close()?;
        return Err(err);
    }

    run_log.close()?;
    println!("QUERY COMPLETED. MAKE SURE TO CHECK LOG-FILE.\n");
    Ok(())
}
